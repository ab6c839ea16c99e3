//! Configuration management for lprof.
//!
//! This module provides configuration handling with:
//! - YAML file support
//! - CLI argument overrides
//! - Validation and defaults
//!
//! Precedence is CLI arguments > config file > built-in defaults; the CLI
//! layer applies its overrides through [`ConfigBuilder`] after loading the
//! file, so later sources always win field by field.

use crate::core::error::{LprofError, Result};
use crate::core::types::PercentileMode;
use crate::output::OutputFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete configuration for lprof
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Access log to read; stdin when unset
    pub file: Option<PathBuf>,
    /// Field label configuration
    pub fields: FieldConfig,
    /// Aggregation configuration
    pub stats: StatsConfig,
    /// Record admission configuration
    pub filter: FilterConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Debug mode
    #[serde(skip)]
    pub debug: bool,
}

/// Labels naming the semantic fields inside each LTSV record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Request URI label
    pub uri: String,
    /// HTTP method label
    pub method: String,
    /// Timestamp label
    pub time: String,
    /// Response time label
    pub apptime: String,
    /// Request time label, the fallback when the response time is absent
    pub reqtime: String,
    /// Response body size label
    pub size: String,
    /// Request body size label; records without it contribute 0
    pub reqsize: String,
    /// Status code label
    pub status: String,
}

/// Aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Mask query-string values and keep the masked query in the grouping key
    pub query_string: bool,
    /// Regex patterns collapsing matching URIs into one synthetic key
    pub uri_patterns: Vec<String>,
    /// Retain samples for percentile and stddev reporting
    pub percentiles: bool,
    /// Percentile rank resolution mode
    pub percentile_mode: PercentileMode,
}

/// Record admission configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// URI include patterns (regex); non-empty means only matches are admitted
    pub includes: Vec<String>,
    /// URI exclude patterns (regex)
    pub excludes: Vec<String>,
    /// Statuses to admit; non-empty means only members are admitted
    pub include_statuses: Vec<u16>,
    /// Statuses to reject
    pub exclude_statuses: Vec<u16>,
    /// Absolute window start, e.g. "2026-08-01 00:00:00"
    pub start_time: Option<String>,
    /// Absolute window end
    pub end_time: Option<String>,
    /// Window start relative to now, e.g. "30m"; absolute bounds win
    #[serde(default, with = "humantime_serde")]
    pub start_time_duration: Option<Duration>,
    /// Window end relative to now
    #[serde(default, with = "humantime_serde")]
    pub end_time_duration: Option<Duration>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Sort field identifier, e.g. "Count" or "P99ResponseTime"
    pub sort: String,
    /// Sort descending instead of ascending
    pub reverse: bool,
    /// Output format
    pub format: OutputFormat,
    /// Maximum number of rows to print
    pub limit: usize,
    /// Suppress the header row
    pub no_headers: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            uri: "uri".to_string(),
            method: "method".to_string(),
            time: "time".to_string(),
            apptime: "apptime".to_string(),
            reqtime: "reqtime".to_string(),
            size: "size".to_string(),
            reqsize: "reqsize".to_string(),
            status: "status".to_string(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        StatsConfig {
            query_string: false,
            uri_patterns: Vec::new(),
            percentiles: true,
            percentile_mode: PercentileMode::Arrival,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            sort: "MaxResponseTime".to_string(),
            reverse: false,
            format: OutputFormat::Table,
            limit: 5000,
            no_headers: false,
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Result<Self> {
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Invalid patterns and a zero row limit are configuration errors and
    /// abort before ingestion starts. Time bounds are validated when the
    /// filter resolves its window, which also happens before ingestion.
    pub fn validate(&self) -> Result<()> {
        if self.output.limit == 0 {
            return Err(LprofError::config("limit must be greater than 0"));
        }

        for pattern in self
            .stats
            .uri_patterns
            .iter()
            .chain(&self.filter.includes)
            .chain(&self.filter.excludes)
        {
            Regex::new(pattern).map_err(|e| {
                LprofError::config(format!("invalid pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| LprofError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Set the input file
    pub fn file(mut self, path: PathBuf) -> Self {
        self.config.file = Some(path);
        self
    }

    /// Set the sort field identifier
    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.config.output.sort = field.into();
        self
    }

    /// Sort descending
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.config.output.reverse = reverse;
        self
    }

    /// Enable query-string masking
    pub fn query_string(mut self, enable: bool) -> Self {
        self.config.stats.query_string = enable;
        self
    }

    /// Set URI collapsing patterns
    pub fn uri_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.stats.uri_patterns = patterns;
        self
    }

    /// Enable or disable sample retention for percentiles/stddev
    pub fn percentiles(mut self, enable: bool) -> Self {
        self.config.stats.percentiles = enable;
        self
    }

    /// Set the percentile rank resolution mode
    pub fn percentile_mode(mut self, mode: PercentileMode) -> Self {
        self.config.stats.percentile_mode = mode;
        self
    }

    /// Set URI include patterns
    pub fn includes(mut self, patterns: Vec<String>) -> Self {
        self.config.filter.includes = patterns;
        self
    }

    /// Set URI exclude patterns
    pub fn excludes(mut self, patterns: Vec<String>) -> Self {
        self.config.filter.excludes = patterns;
        self
    }

    /// Set statuses to admit
    pub fn include_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.config.filter.include_statuses = statuses;
        self
    }

    /// Set statuses to reject
    pub fn exclude_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.config.filter.exclude_statuses = statuses;
        self
    }

    /// Set the absolute window start
    pub fn start_time(mut self, time: impl Into<String>) -> Self {
        self.config.filter.start_time = Some(time.into());
        self
    }

    /// Set the absolute window end
    pub fn end_time(mut self, time: impl Into<String>) -> Self {
        self.config.filter.end_time = Some(time.into());
        self
    }

    /// Set the window start relative to now
    pub fn start_time_duration(mut self, duration: Duration) -> Self {
        self.config.filter.start_time_duration = Some(duration);
        self
    }

    /// Set the window end relative to now
    pub fn end_time_duration(mut self, duration: Duration) -> Self {
        self.config.filter.end_time_duration = Some(duration);
        self
    }

    /// Set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output row limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.output.limit = limit;
        self
    }

    /// Suppress the header row
    pub fn no_headers(mut self, suppress: bool) -> Self {
        self.config.output.no_headers = suppress;
        self
    }

    /// Set debug mode
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
