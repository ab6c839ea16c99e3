//! The aggregate collection and its ingestion entry point.

use crate::core::types::{EndpointKey, PercentileMode};
use crate::stats::aggregate::EndpointStat;
use crate::stats::index::KeyIndex;
use crate::stats::sort::{sort_stats, SortField};

/// Append-only collection of per-endpoint aggregates.
///
/// Membership is fixed by the key index; order is mutable only through
/// [`Profile::sort`]. Aggregates are created lazily on the first admitted
/// record for their key and never deleted within a run.
///
/// Ingestion takes `&mut self`, so exactly one writer mutates a slot at a
/// time; the key index alone tolerates concurrent callers.
#[derive(Debug)]
pub struct Profile {
    index: KeyIndex,
    stats: Vec<EndpointStat>,
    retain_samples: bool,
    percentile_mode: PercentileMode,
}

impl Profile {
    /// Creates an empty profile
    pub fn new(retain_samples: bool, percentile_mode: PercentileMode) -> Self {
        Profile {
            index: KeyIndex::new(),
            stats: Vec::new(),
            retain_samples,
            percentile_mode,
        }
    }

    /// Rebuilds a profile from a restored snapshot.
    ///
    /// Every (method, uri) pair is re-registered in a fresh key index so
    /// later records still route to the right aggregate.
    pub fn from_stats(
        stats: Vec<EndpointStat>,
        retain_samples: bool,
        percentile_mode: PercentileMode,
    ) -> Self {
        let index = KeyIndex::new();
        for stat in &stats {
            index.resolve(&EndpointKey::new(&stat.method, &stat.uri));
        }

        Profile {
            index,
            stats,
            retain_samples,
            percentile_mode,
        }
    }

    /// Folds one admitted record into the aggregate for its key.
    ///
    /// `uri` must already be normalized; equal (method, uri) pairs always
    /// land in the same aggregate.
    pub fn record(
        &mut self,
        method: &str,
        uri: &str,
        status: u16,
        response_time: f64,
        request_body_size: f64,
        response_body_size: f64,
    ) {
        let key = EndpointKey::new(method, uri);
        let slot = self.index.resolve(&key);

        if slot >= self.stats.len() {
            self.stats.push(EndpointStat::new(
                uri,
                method,
                self.retain_samples,
                self.percentile_mode,
            ));
        }

        self.stats[slot].record(status, response_time, request_body_size, response_body_size);
    }

    /// The aggregates, in insertion order until sorted
    pub fn stats(&self) -> &[EndpointStat] {
        &self.stats
    }

    /// Consumes the profile, returning the aggregates
    pub fn into_stats(self) -> Vec<EndpointStat> {
        self.stats
    }

    /// Number of distinct endpoints seen
    pub fn endpoint_count(&self) -> usize {
        self.index.len()
    }

    /// Orders the collection by `field`, descending when `reverse`.
    pub fn sort(&mut self, field: SortField, reverse: bool) {
        sort_stats(&mut self.stats, field, reverse);
    }
}
