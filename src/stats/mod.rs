//! Streaming aggregation engine.
//!
//! Turns a sequence of admitted records into per-(method, normalized URI)
//! statistics: status-class counters, response time, and body sizes, with
//! optional percentile/stddev estimation, plus the ranking pass run after
//! ingestion completes.

pub mod accumulator;
pub mod aggregate;
pub mod index;
pub mod profile;
pub mod sort;

pub use accumulator::MetricAccumulator;
pub use aggregate::EndpointStat;
pub use index::KeyIndex;
pub use profile::Profile;
pub use sort::{sort_stats, SortField};
