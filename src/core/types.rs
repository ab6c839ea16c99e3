use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::{LprofError, Result};

/// The (method, normalized URI) pair identifying one aggregate.
///
/// Equal keys always route to the same aggregate slot for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    method: String,
    uri: String,
}

impl EndpointKey {
    /// Creates a new endpoint key
    pub fn new(method: &str, uri: &str) -> Self {
        EndpointKey {
            method: method.to_string(),
            uri: uri.to_string(),
        }
    }

    /// Returns the HTTP method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the normalized URI
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// One parsed access-log record, reduced to the semantic fields the
/// aggregation engine consumes.
///
/// `uri` is the raw request URI; normalization happens after admission so
/// that filters match against what was actually logged.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Raw request URI as logged
    pub uri: String,
    /// HTTP method
    pub method: String,
    /// Raw timestamp string; only parsed when a time window is configured
    pub time: String,
    /// Response time in seconds (request time when the response time label
    /// is absent)
    pub response_time: f64,
    /// Request body size in bytes
    pub request_body_size: f64,
    /// Response body size in bytes
    pub response_body_size: f64,
    /// HTTP status code
    pub status: u16,
}

/// How percentile ranks are resolved against the retained samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentileMode {
    /// The sample at the rank position in arrival order.
    #[default]
    Arrival,
    /// Magnitude-sorted order statistic at the same rank.
    Sorted,
}

impl FromStr for PercentileMode {
    type Err = LprofError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "arrival" => Ok(PercentileMode::Arrival),
            "sorted" => Ok(PercentileMode::Sorted),
            _ => Err(LprofError::config(format!(
                "Unknown percentile mode: {} (expected arrival or sorted)",
                s
            ))),
        }
    }
}
