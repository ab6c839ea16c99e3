//! Rendering of the finished collection.
//!
//! Presentation is a capability interface: every output format implements
//! [`Renderer`], and the format is selected by configuration. The header
//! table lives in [`PrintOptions`], owned by this layer; the aggregation
//! engine knows nothing about columns.

mod table;
mod tsv;

pub use table::TableRenderer;
pub use tsv::TsvRenderer;

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

use crate::core::config::OutputConfig;
use crate::core::error::{LprofError, Result};
use crate::stats::EndpointStat;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Column-aligned ASCII table
    #[default]
    Table,
    /// Tab-separated values
    Tsv,
}

impl FromStr for OutputFormat {
    type Err = LprofError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "tsv" => Ok(OutputFormat::Tsv),
            _ => Err(LprofError::config(format!(
                "Unknown output format: {} (expected table or tsv)",
                s
            ))),
        }
    }
}

/// Capability interface every output format implements.
pub trait Renderer {
    /// Emits the header row
    fn render_header(&mut self, headers: &[String]) -> Result<()>;
    /// Emits one data row
    fn render_row(&mut self, row: &[String]) -> Result<()>;
    /// Flushes any buffered output
    fn finish(&mut self) -> Result<()>;
}

/// Presentation configuration, including the header table.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Column headers, matching the row layout of [`print_stats`]
    pub headers: Vec<String>,
    /// Output format
    pub format: OutputFormat,
    /// Suppress the header row
    pub no_headers: bool,
    /// Maximum number of rows to print
    pub limit: usize,
}

impl PrintOptions {
    /// Builds print options from the output configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        PrintOptions {
            headers: default_headers(),
            format: config.format,
            no_headers: config.no_headers,
            limit: config.limit,
        }
    }
}

fn default_headers() -> Vec<String> {
    [
        "Count", "Method", "Uri", "1xx", "2xx", "3xx", "4xx", "5xx", "Min", "Max", "Sum", "Avg",
        "P1", "P50", "P99", "Stddev", "Min(Body)", "Max(Body)", "Sum(Body)", "Avg(Body)",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

/// Renders the collection to `writer` in the configured format.
pub fn print_stats<W: Write>(
    stats: &[EndpointStat],
    options: &PrintOptions,
    writer: W,
) -> Result<()> {
    match options.format {
        OutputFormat::Table => render(stats, options, TableRenderer::new(writer)),
        OutputFormat::Tsv => render(stats, options, TsvRenderer::new(writer)),
    }
}

fn render<R: Renderer>(stats: &[EndpointStat], options: &PrintOptions, mut renderer: R) -> Result<()> {
    if !options.no_headers {
        renderer.render_header(&options.headers)?;
    }

    for stat in stats.iter().take(options.limit) {
        renderer.render_row(&stat_row(stat))?;
    }

    renderer.finish()
}

/// One output row; response time metrics, then response body metrics.
fn stat_row(stat: &EndpointStat) -> Vec<String> {
    vec![
        stat.count.to_string(),
        stat.method.clone(),
        stat.uri.clone(),
        stat.status_1xx.to_string(),
        stat.status_2xx.to_string(),
        stat.status_3xx.to_string(),
        stat.status_4xx.to_string(),
        stat.status_5xx.to_string(),
        round(stat.min_response_time()),
        round(stat.max_response_time()),
        round(stat.sum_response_time()),
        round(stat.avg_response_time()),
        round(stat.p1_response_time()),
        round(stat.p50_response_time()),
        round(stat.p99_response_time()),
        round(stat.stddev_response_time()),
        round(stat.min_response_body_size()),
        round(stat.max_response_body_size()),
        round(stat.sum_response_body_size()),
        round(stat.avg_response_body_size()),
    ]
}

fn round(value: f64) -> String {
    format!("{:.3}", value)
}
