//! Per-endpoint aggregate: status-class counters plus the three metric
//! accumulators.

use serde::{Deserialize, Serialize};

use crate::core::types::PercentileMode;
use crate::stats::accumulator::MetricAccumulator;

/// Accumulated statistics for one (method, normalized URI) endpoint.
///
/// Serializes with all raw counters so a dumped snapshot restores with
/// identical derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointStat {
    /// Normalized URI
    pub uri: String,
    /// HTTP method
    pub method: String,
    /// Total admitted updates
    pub count: usize,
    /// Responses with status 100-199
    pub status_1xx: usize,
    /// Responses with status 200-299
    pub status_2xx: usize,
    /// Responses with status 300-399
    pub status_3xx: usize,
    /// Responses with status 400-499
    pub status_4xx: usize,
    /// Responses with status 500-599
    pub status_5xx: usize,
    /// Response time series
    pub response_time: MetricAccumulator,
    /// Request body size series
    pub request_body_size: MetricAccumulator,
    /// Response body size series
    pub response_body_size: MetricAccumulator,
    #[serde(default)]
    percentile_mode: PercentileMode,
}

impl EndpointStat {
    /// Creates an empty aggregate for one endpoint
    pub fn new(uri: &str, method: &str, retain_samples: bool, percentile_mode: PercentileMode) -> Self {
        EndpointStat {
            uri: uri.to_string(),
            method: method.to_string(),
            count: 0,
            status_1xx: 0,
            status_2xx: 0,
            status_3xx: 0,
            status_4xx: 0,
            status_5xx: 0,
            response_time: MetricAccumulator::new(retain_samples),
            request_body_size: MetricAccumulator::new(retain_samples),
            response_body_size: MetricAccumulator::new(retain_samples),
            percentile_mode,
        }
    }

    /// Folds one admitted record into the aggregate.
    ///
    /// The update is atomic from the caller's perspective: the count, the
    /// status bucket, and all three accumulators move together.
    pub fn record(
        &mut self,
        status: u16,
        response_time: f64,
        request_body_size: f64,
        response_body_size: f64,
    ) {
        self.count += 1;
        self.classify_status(status);
        self.response_time.record(response_time);
        self.request_body_size.record(request_body_size);
        self.response_body_size.record(response_body_size);
    }

    /// Increments exactly one of the five status-class buckets. A status
    /// outside 100-599 increments none of them; the count still moved.
    fn classify_status(&mut self, status: u16) {
        match status {
            100..=199 => self.status_1xx += 1,
            200..=299 => self.status_2xx += 1,
            300..=399 => self.status_3xx += 1,
            400..=499 => self.status_4xx += 1,
            500..=599 => self.status_5xx += 1,
            _ => {},
        }
    }

    // response time

    /// Maximum response time
    pub fn max_response_time(&self) -> f64 {
        self.response_time.max()
    }

    /// Minimum response time
    pub fn min_response_time(&self) -> f64 {
        self.response_time.min()
    }

    /// Total response time
    pub fn sum_response_time(&self) -> f64 {
        self.response_time.sum()
    }

    /// Mean response time
    pub fn avg_response_time(&self) -> f64 {
        self.response_time.avg(self.count)
    }

    /// 1st percentile response time
    pub fn p1_response_time(&self) -> f64 {
        self.response_time.percentile(1, self.count, self.percentile_mode)
    }

    /// 50th percentile response time
    pub fn p50_response_time(&self) -> f64 {
        self.response_time.percentile(50, self.count, self.percentile_mode)
    }

    /// 90th percentile response time
    pub fn p90_response_time(&self) -> f64 {
        self.response_time.percentile(90, self.count, self.percentile_mode)
    }

    /// 99th percentile response time
    pub fn p99_response_time(&self) -> f64 {
        self.response_time.percentile(99, self.count, self.percentile_mode)
    }

    /// Response time standard deviation
    pub fn stddev_response_time(&self) -> f64 {
        self.response_time.stddev(self.count)
    }

    // request body size

    /// Maximum request body size
    pub fn max_request_body_size(&self) -> f64 {
        self.request_body_size.max()
    }

    /// Minimum request body size
    pub fn min_request_body_size(&self) -> f64 {
        self.request_body_size.min()
    }

    /// Total request body size
    pub fn sum_request_body_size(&self) -> f64 {
        self.request_body_size.sum()
    }

    /// Mean request body size
    pub fn avg_request_body_size(&self) -> f64 {
        self.request_body_size.avg(self.count)
    }

    /// 1st percentile request body size
    pub fn p1_request_body_size(&self) -> f64 {
        self.request_body_size.percentile(1, self.count, self.percentile_mode)
    }

    /// 50th percentile request body size
    pub fn p50_request_body_size(&self) -> f64 {
        self.request_body_size.percentile(50, self.count, self.percentile_mode)
    }

    /// 90th percentile request body size
    pub fn p90_request_body_size(&self) -> f64 {
        self.request_body_size.percentile(90, self.count, self.percentile_mode)
    }

    /// 99th percentile request body size
    pub fn p99_request_body_size(&self) -> f64 {
        self.request_body_size.percentile(99, self.count, self.percentile_mode)
    }

    /// Request body size standard deviation
    pub fn stddev_request_body_size(&self) -> f64 {
        self.request_body_size.stddev(self.count)
    }

    // response body size

    /// Maximum response body size
    pub fn max_response_body_size(&self) -> f64 {
        self.response_body_size.max()
    }

    /// Minimum response body size
    pub fn min_response_body_size(&self) -> f64 {
        self.response_body_size.min()
    }

    /// Total response body size
    pub fn sum_response_body_size(&self) -> f64 {
        self.response_body_size.sum()
    }

    /// Mean response body size
    pub fn avg_response_body_size(&self) -> f64 {
        self.response_body_size.avg(self.count)
    }

    /// 1st percentile response body size
    pub fn p1_response_body_size(&self) -> f64 {
        self.response_body_size.percentile(1, self.count, self.percentile_mode)
    }

    /// 50th percentile response body size
    pub fn p50_response_body_size(&self) -> f64 {
        self.response_body_size.percentile(50, self.count, self.percentile_mode)
    }

    /// 90th percentile response body size
    pub fn p90_response_body_size(&self) -> f64 {
        self.response_body_size.percentile(90, self.count, self.percentile_mode)
    }

    /// 99th percentile response body size
    pub fn p99_response_body_size(&self) -> f64 {
        self.response_body_size.percentile(99, self.count, self.percentile_mode)
    }

    /// Response body size standard deviation
    pub fn stddev_response_body_size(&self) -> f64 {
        self.response_body_size.stddev(self.count)
    }
}
