//! Ranking of the aggregate collection.

use std::str::FromStr;

use crate::core::error::{LprofError, Result};
use crate::stats::aggregate::EndpointStat;

/// A named projection the collection can be ordered by.
///
/// Identifiers are matched case-insensitively. An unrecognized name is an
/// explicit error rather than a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Total admitted updates
    Count,
    /// Normalized URI, lexicographic
    Uri,
    /// HTTP method, lexicographic
    Method,
    /// Maximum response time
    MaxResponseTime,
    /// Minimum response time
    MinResponseTime,
    /// Total response time
    SumResponseTime,
    /// Mean response time
    AvgResponseTime,
    /// 1st percentile response time
    P1ResponseTime,
    /// 50th percentile response time
    P50ResponseTime,
    /// 90th percentile response time
    P90ResponseTime,
    /// 99th percentile response time
    P99ResponseTime,
    /// Response time standard deviation
    StddevResponseTime,
    /// Maximum request body size
    MaxRequestBodySize,
    /// Minimum request body size
    MinRequestBodySize,
    /// Total request body size
    SumRequestBodySize,
    /// Mean request body size
    AvgRequestBodySize,
    /// 1st percentile request body size
    P1RequestBodySize,
    /// 50th percentile request body size
    P50RequestBodySize,
    /// 90th percentile request body size
    P90RequestBodySize,
    /// 99th percentile request body size
    P99RequestBodySize,
    /// Request body size standard deviation
    StddevRequestBodySize,
    /// Maximum response body size
    MaxResponseBodySize,
    /// Minimum response body size
    MinResponseBodySize,
    /// Total response body size
    SumResponseBodySize,
    /// Mean response body size
    AvgResponseBodySize,
    /// 1st percentile response body size
    P1ResponseBodySize,
    /// 50th percentile response body size
    P50ResponseBodySize,
    /// 90th percentile response body size
    P90ResponseBodySize,
    /// 99th percentile response body size
    P99ResponseBodySize,
    /// Response body size standard deviation
    StddevResponseBodySize,
}

impl FromStr for SortField {
    type Err = LprofError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "count" => Ok(SortField::Count),
            "uri" => Ok(SortField::Uri),
            "method" => Ok(SortField::Method),
            "maxresponsetime" => Ok(SortField::MaxResponseTime),
            "minresponsetime" => Ok(SortField::MinResponseTime),
            "sumresponsetime" => Ok(SortField::SumResponseTime),
            "avgresponsetime" => Ok(SortField::AvgResponseTime),
            "p1responsetime" => Ok(SortField::P1ResponseTime),
            "p50responsetime" => Ok(SortField::P50ResponseTime),
            "p90responsetime" => Ok(SortField::P90ResponseTime),
            "p99responsetime" => Ok(SortField::P99ResponseTime),
            "stddevresponsetime" => Ok(SortField::StddevResponseTime),
            "maxrequestbodysize" => Ok(SortField::MaxRequestBodySize),
            "minrequestbodysize" => Ok(SortField::MinRequestBodySize),
            "sumrequestbodysize" => Ok(SortField::SumRequestBodySize),
            "avgrequestbodysize" => Ok(SortField::AvgRequestBodySize),
            "p1requestbodysize" => Ok(SortField::P1RequestBodySize),
            "p50requestbodysize" => Ok(SortField::P50RequestBodySize),
            "p90requestbodysize" => Ok(SortField::P90RequestBodySize),
            "p99requestbodysize" => Ok(SortField::P99RequestBodySize),
            "stddevrequestbodysize" => Ok(SortField::StddevRequestBodySize),
            "maxresponsebodysize" => Ok(SortField::MaxResponseBodySize),
            "minresponsebodysize" => Ok(SortField::MinResponseBodySize),
            "sumresponsebodysize" => Ok(SortField::SumResponseBodySize),
            "avgresponsebodysize" => Ok(SortField::AvgResponseBodySize),
            "p1responsebodysize" => Ok(SortField::P1ResponseBodySize),
            "p50responsebodysize" => Ok(SortField::P50ResponseBodySize),
            "p90responsebodysize" => Ok(SortField::P90ResponseBodySize),
            "p99responsebodysize" => Ok(SortField::P99ResponseBodySize),
            "stddevresponsebodysize" => Ok(SortField::StddevResponseBodySize),
            _ => Err(LprofError::UnknownSortField(s.to_string())),
        }
    }
}

impl SortField {
    /// Numeric projection backing every field except `Uri` and `Method`.
    fn metric(&self, stat: &EndpointStat) -> f64 {
        match self {
            SortField::Count => stat.count as f64,
            SortField::MaxResponseTime => stat.max_response_time(),
            SortField::MinResponseTime => stat.min_response_time(),
            SortField::SumResponseTime => stat.sum_response_time(),
            SortField::AvgResponseTime => stat.avg_response_time(),
            SortField::P1ResponseTime => stat.p1_response_time(),
            SortField::P50ResponseTime => stat.p50_response_time(),
            SortField::P90ResponseTime => stat.p90_response_time(),
            SortField::P99ResponseTime => stat.p99_response_time(),
            SortField::StddevResponseTime => stat.stddev_response_time(),
            SortField::MaxRequestBodySize => stat.max_request_body_size(),
            SortField::MinRequestBodySize => stat.min_request_body_size(),
            SortField::SumRequestBodySize => stat.sum_request_body_size(),
            SortField::AvgRequestBodySize => stat.avg_request_body_size(),
            SortField::P1RequestBodySize => stat.p1_request_body_size(),
            SortField::P50RequestBodySize => stat.p50_request_body_size(),
            SortField::P90RequestBodySize => stat.p90_request_body_size(),
            SortField::P99RequestBodySize => stat.p99_request_body_size(),
            SortField::StddevRequestBodySize => stat.stddev_request_body_size(),
            SortField::MaxResponseBodySize => stat.max_response_body_size(),
            SortField::MinResponseBodySize => stat.min_response_body_size(),
            SortField::SumResponseBodySize => stat.sum_response_body_size(),
            SortField::AvgResponseBodySize => stat.avg_response_body_size(),
            SortField::P1ResponseBodySize => stat.p1_response_body_size(),
            SortField::P50ResponseBodySize => stat.p50_response_body_size(),
            SortField::P90ResponseBodySize => stat.p90_response_body_size(),
            SortField::P99ResponseBodySize => stat.p99_response_body_size(),
            SortField::StddevResponseBodySize => stat.stddev_response_body_size(),
            SortField::Uri | SortField::Method => 0.0,
        }
    }
}

/// Orders the collection by `field`, ascending; descending when `reverse`.
///
/// Tie order is unspecified.
pub fn sort_stats(stats: &mut [EndpointStat], field: SortField, reverse: bool) {
    match field {
        SortField::Uri => stats.sort_unstable_by(|a, b| a.uri.cmp(&b.uri)),
        SortField::Method => stats.sort_unstable_by(|a, b| a.method.cmp(&b.method)),
        _ => stats.sort_unstable_by(|a, b| field.metric(a).total_cmp(&field.metric(b))),
    }

    if reverse {
        stats.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PercentileMode;

    fn stat_with_counts(uri: &str, count: usize) -> EndpointStat {
        let mut s = EndpointStat::new(uri, "GET", false, PercentileMode::Arrival);
        for _ in 0..count {
            s.record(200, 0.1, 0.0, 0.0);
        }
        s
    }

    #[test]
    fn test_parse_known_fields() {
        assert_eq!("Count".parse::<SortField>().unwrap(), SortField::Count);
        assert_eq!(
            "p99responsetime".parse::<SortField>().unwrap(),
            SortField::P99ResponseTime
        );
        assert_eq!(
            "StddevResponseBodySize".parse::<SortField>().unwrap(),
            SortField::StddevResponseBodySize
        );
    }

    #[test]
    fn test_parse_unknown_field_is_an_error() {
        let err = "P75ResponseTime".parse::<SortField>().unwrap_err();
        assert!(matches!(err, LprofError::UnknownSortField(_)));
    }

    #[test]
    fn test_sort_by_count_descending() {
        let mut stats = vec![
            stat_with_counts("/a", 3),
            stat_with_counts("/b", 1),
            stat_with_counts("/c", 2),
        ];
        sort_stats(&mut stats, SortField::Count, true);

        let counts: Vec<usize> = stats.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_uri_ascending() {
        let mut stats = vec![
            stat_with_counts("/c", 1),
            stat_with_counts("/a", 1),
            stat_with_counts("/b", 1),
        ];
        sort_stats(&mut stats, SortField::Uri, false);

        let uris: Vec<&str> = stats.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_sort_by_metric() {
        let mut slow = EndpointStat::new("/slow", "GET", false, PercentileMode::Arrival);
        slow.record(200, 2.5, 0.0, 0.0);
        let mut fast = EndpointStat::new("/fast", "GET", false, PercentileMode::Arrival);
        fast.record(200, 0.1, 0.0, 0.0);

        let mut stats = vec![slow, fast];
        sort_stats(&mut stats, SortField::MaxResponseTime, false);
        assert_eq!(stats[0].uri, "/fast");

        sort_stats(&mut stats, SortField::MaxResponseTime, true);
        assert_eq!(stats[0].uri, "/slow");
    }
}
