//! Record admission: time window, status sets, and URI sets.
//!
//! All predicates AND-compose. A record failing any of them, or carrying
//! a timestamp that cannot be parsed while a window is configured, is
//! skipped; ingestion continues with the next record.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::core::config::FilterConfig;
use crate::core::error::{LprofError, Result};

/// Timestamp formats accepted for record fields and absolute bounds,
/// tried in order after RFC 3339: plain local-style and Apache CLF.
const TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%d/%b/%Y:%H:%M:%S %z"];

/// Resolved admission time window.
///
/// Exactly one resolved form is retained per bound: an absolute bound
/// wins over a relative duration when both are configured.
#[derive(Debug, Clone, Default)]
pub struct TimeWindow {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Resolves the configured window against `now`.
    ///
    /// An unparseable absolute bound is a configuration error.
    pub fn resolve(config: &FilterConfig, now: DateTime<Utc>) -> Result<Self> {
        let start = match (&config.start_time, config.start_time_duration) {
            (Some(bound), _) => Some(parse_bound(bound)?),
            (None, Some(duration)) => Some(now - to_chrono(duration)?),
            (None, None) => None,
        };

        let end = match (&config.end_time, config.end_time_duration) {
            (Some(bound), _) => Some(parse_bound(bound)?),
            (None, Some(duration)) => Some(now - to_chrono(duration)?),
            (None, None) => None,
        };

        Ok(TimeWindow { start, end })
    }

    /// True if neither bound is configured
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True if `t` falls inside `[start, end]`, bounds inclusive
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if t < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if t > end {
                return false;
            }
        }
        true
    }
}

/// Admission predicate run against every record before aggregation.
#[derive(Debug)]
pub struct Filter {
    include_uris: Vec<Regex>,
    exclude_uris: Vec<Regex>,
    include_statuses: Vec<u16>,
    exclude_statuses: Vec<u16>,
    window: TimeWindow,
}

impl Filter {
    /// Builds the filter from resolved options.
    ///
    /// Invalid URI patterns and unparseable time bounds are configuration
    /// errors detected here, before ingestion starts.
    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        Self::with_now(config, Utc::now())
    }

    /// Like [`Filter::from_config`] with an explicit `now` for relative
    /// bounds.
    pub fn with_now(config: &FilterConfig, now: DateTime<Utc>) -> Result<Self> {
        Ok(Filter {
            include_uris: compile(&config.includes)?,
            exclude_uris: compile(&config.excludes)?,
            include_statuses: config.include_statuses.clone(),
            exclude_statuses: config.exclude_statuses.clone(),
            window: TimeWindow::resolve(config, now)?,
        })
    }

    /// Decides whether one record enters aggregation.
    ///
    /// `uri` is the raw, pre-normalization URI. The timestamp string is
    /// only parsed when a window is configured; failure to parse it then
    /// rejects the record.
    pub fn admit(&self, uri: &str, status: u16, time: &str) -> bool {
        if !self.window.is_unbounded() {
            match parse_timestamp(time) {
                Ok(t) => {
                    if !self.window.contains(t) {
                        return false;
                    }
                },
                Err(_) => {
                    tracing::debug!(time, "unparseable timestamp, skipping record");
                    return false;
                },
            }
        }

        if !self.include_statuses.is_empty() && !self.include_statuses.contains(&status) {
            return false;
        }
        if !self.exclude_statuses.is_empty() && self.exclude_statuses.contains(&status) {
            return false;
        }

        if !self.include_uris.is_empty() && !self.include_uris.iter().any(|re| re.is_match(uri)) {
            return false;
        }
        if self.exclude_uris.iter().any(|re| re.is_match(uri)) {
            return false;
        }

        true
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

fn to_chrono(duration: std::time::Duration) -> Result<chrono::Duration> {
    chrono::Duration::from_std(duration)
        .map_err(|e| LprofError::time_bound(format!("duration out of range: {}", e)))
}

/// Parses an absolute window bound; failure is a configuration error.
fn parse_bound(s: &str) -> Result<DateTime<Utc>> {
    parse_any(s).ok_or_else(|| LprofError::time_bound(format!("unparseable time '{}'", s)))
}

/// Parses a record timestamp; failure is a per-record skip.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    parse_any(s).ok_or_else(|| LprofError::parse(format!("unparseable timestamp '{}'", s)))
}

fn parse_any(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }

    for format in TIME_FORMATS {
        if let Ok(t) = DateTime::parse_from_str(s, format) {
            return Some(t.with_timezone(&Utc));
        }
        // formats without an offset parse as naive and are taken as UTC
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    None
}
