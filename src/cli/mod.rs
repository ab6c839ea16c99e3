//! Command-line interface for lprof.
//!
//! Reads an access log (file or stdin), runs the aggregation pipeline,
//! and prints the ranked per-endpoint statistics.

use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::core::{Config, ConfigBuilder, LprofError, Result};
use crate::filter::Filter;
use crate::normalize::UriNormalizer;
use crate::output::{print_stats, PrintOptions};
use crate::parse::RecordExtractor;
use crate::snapshot;
use crate::stats::{Profile, SortField};

/// Access-log profiler with per-endpoint latency and body-size statistics
#[derive(Parser, Debug)]
#[command(name = "lprof")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Access log file (reads stdin when omitted)
    #[arg(short, long, env = "LPROF_FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "LPROF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Sort field, e.g. Count, Uri, Method, P99ResponseTime
    #[arg(long, env = "LPROF_SORT")]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(short, long)]
    pub reverse: bool,

    /// Mask query-string values and keep the masked query in the grouping key
    #[arg(short = 'q', long)]
    pub query_string: bool,

    /// Regex patterns collapsing matching URIs into one key (comma separated)
    #[arg(long)]
    pub aggregates: Option<String>,

    /// URI include patterns, regex (comma separated)
    #[arg(long)]
    pub includes: Option<String>,

    /// URI exclude patterns, regex (comma separated)
    #[arg(long)]
    pub excludes: Option<String>,

    /// Statuses to admit (comma separated)
    #[arg(long)]
    pub include_statuses: Option<String>,

    /// Statuses to reject (comma separated)
    #[arg(long)]
    pub exclude_statuses: Option<String>,

    /// Absolute window start, e.g. "2026-08-01 00:00:00"
    #[arg(long)]
    pub start_time: Option<String>,

    /// Absolute window end
    #[arg(long)]
    pub end_time: Option<String>,

    /// Window start relative to now, e.g. "30m"
    #[arg(long)]
    pub start_time_duration: Option<String>,

    /// Window end relative to now
    #[arg(long)]
    pub end_time_duration: Option<String>,

    /// Percentile mode: arrival (positional) or sorted
    #[arg(long, env = "LPROF_PERCENTILE_MODE")]
    pub percentile_mode: Option<String>,

    /// Disable sample retention; percentiles and stddev report 0
    #[arg(long)]
    pub no_percentiles: bool,

    /// Output format: table or tsv
    #[arg(long, env = "LPROF_FORMAT")]
    pub format: Option<String>,

    /// Maximum number of rows to print
    #[arg(long, env = "LPROF_LIMIT")]
    pub limit: Option<usize>,

    /// Suppress the header row
    #[arg(long)]
    pub no_headers: bool,

    /// Write the aggregated snapshot as YAML
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Load a previously dumped snapshot instead of reading a log
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, env = "LPROF_DEBUG")]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Load configuration with proper precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Config file
    /// 3. Defaults (lowest priority)
    pub fn load_config(&self) -> Result<Config> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = &self.config {
            let content = std::fs::read_to_string(path).map_err(|e| {
                LprofError::config(format!("Failed to read config file {:?}: {}", path, e))
            })?;
            builder = builder.from_yaml(&content)?;
            tracing::debug!(path = %path.display(), "loaded configuration file");
        }

        self.apply_overrides(builder)
    }

    fn apply_overrides(&self, mut builder: ConfigBuilder) -> Result<Config> {
        if let Some(file) = &self.file {
            builder = builder.file(file.clone());
        }
        if let Some(sort) = &self.sort {
            builder = builder.sort(sort.clone());
        }
        if self.reverse {
            builder = builder.reverse(true);
        }
        if self.query_string {
            builder = builder.query_string(true);
        }
        if let Some(patterns) = &self.aggregates {
            builder = builder.uri_patterns(split_csv(patterns));
        }
        if let Some(patterns) = &self.includes {
            builder = builder.includes(split_csv(patterns));
        }
        if let Some(patterns) = &self.excludes {
            builder = builder.excludes(split_csv(patterns));
        }
        if let Some(statuses) = &self.include_statuses {
            builder = builder.include_statuses(parse_statuses(statuses)?);
        }
        if let Some(statuses) = &self.exclude_statuses {
            builder = builder.exclude_statuses(parse_statuses(statuses)?);
        }
        if let Some(time) = &self.start_time {
            builder = builder.start_time(time.clone());
        }
        if let Some(time) = &self.end_time {
            builder = builder.end_time(time.clone());
        }
        if let Some(duration) = &self.start_time_duration {
            builder = builder.start_time_duration(parse_duration(duration)?);
        }
        if let Some(duration) = &self.end_time_duration {
            builder = builder.end_time_duration(parse_duration(duration)?);
        }
        if let Some(mode) = &self.percentile_mode {
            builder = builder.percentile_mode(mode.parse()?);
        }
        if self.no_percentiles {
            builder = builder.percentiles(false);
        }
        if let Some(format) = &self.format {
            builder = builder.format(format.parse()?);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }
        if self.no_headers {
            builder = builder.no_headers(true);
        }

        builder.debug(self.debug).build()
    }

    /// Initialize logging based on configuration.
    ///
    /// Logs go to stderr; stdout carries the rendered statistics.
    pub fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let default_level = if self.debug { "debug" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact();

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LprofError::config(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }
}

/// Execute the lprof pipeline.
pub fn execute(cli: Cli) -> Result<()> {
    cli.init_logging()?;

    let config = cli.load_config()?;

    // resolve the sort field before touching any input
    let sort_field: SortField = config.output.sort.parse()?;

    let mut profile = if let Some(path) = &cli.load {
        tracing::info!(path = %path.display(), "loading snapshot");
        let stats = snapshot::load(File::open(path)?)?;
        Profile::from_stats(stats, config.stats.percentiles, config.stats.percentile_mode)
    } else {
        ingest(&config)?
    };

    profile.sort(sort_field, config.output.reverse);

    if let Some(path) = &cli.dump {
        snapshot::dump(profile.stats(), File::create(path)?)?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    let options = PrintOptions::from_config(&config.output);
    print_stats(profile.stats(), &options, std::io::stdout().lock())
}

/// Runs the aggregation pass over the configured input.
///
/// One record at a time: parse, filter, normalize, resolve, update. A
/// malformed or rejected record is skipped; an unreadable source aborts.
fn ingest(config: &Config) -> Result<Profile> {
    let filter = Filter::from_config(&config.filter)?;
    let normalizer = UriNormalizer::new(config.stats.query_string, &config.stats.uri_patterns)?;
    let extractor = RecordExtractor::new(config.fields.clone());
    let mut profile = Profile::new(config.stats.percentiles, config.stats.percentile_mode);

    let reader: Box<dyn BufRead> = match &config.file {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(std::io::stdin().lock()),
    };

    let mut admitted = 0u64;
    let mut skipped = 0u64;

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let record = match extractor.extract(&line) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(error = %e, "skipping record");
                skipped += 1;
                continue;
            },
        };

        if !filter.admit(&record.uri, record.status, &record.time) {
            skipped += 1;
            continue;
        }

        let uri = match normalizer.normalize(&record.uri) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::debug!(error = %e, "skipping record");
                skipped += 1;
                continue;
            },
        };

        profile.record(
            &record.method,
            &uri,
            record.status,
            record.response_time,
            record.request_body_size,
            record.response_body_size,
        );
        admitted += 1;
    }

    tracing::info!(
        admitted,
        skipped,
        endpoints = profile.endpoint_count(),
        "aggregation complete"
    );

    Ok(profile)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_statuses(value: &str) -> Result<Vec<u16>> {
    split_csv(value)
        .iter()
        .map(|s| {
            s.parse()
                .map_err(|_| LprofError::config(format!("invalid status '{}'", s)))
        })
        .collect()
}

fn parse_duration(value: &str) -> Result<std::time::Duration> {
    humantime::parse_duration(value)
        .map_err(|e| LprofError::config(format!("invalid duration '{}': {}", value, e)))
}
