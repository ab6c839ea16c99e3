//! lprof - access-log profiler.
//!
//! lprof ingests structured access-log records (LTSV) and produces
//! per-endpoint traffic, latency, and body-size statistics: status-class
//! counts, max/min/sum/avg, percentiles, and standard deviation, ranked
//! by any reported field.
//!
//! # Architecture
//!
//! lprof is built with a modular architecture:
//! - `parse`: LTSV log-line parsing
//! - `filter`: record admission (time window, status and URI sets)
//! - `normalize`: URI canonicalization for endpoint grouping
//! - `stats`: the streaming aggregation engine and ranking pass
//! - `output`: table/TSV rendering
//! - `snapshot`: YAML persistence of a finished profile
//! - `cli`: command-line interface
//!
//! # Example
//!
//! ```
//! use lprof::core::PercentileMode;
//! use lprof::stats::{Profile, SortField};
//!
//! let mut profile = Profile::new(true, PercentileMode::Arrival);
//! profile.record("GET", "/health", 200, 0.012, 0.0, 512.0);
//! profile.record("GET", "/health", 200, 0.009, 0.0, 512.0);
//! profile.record("POST", "/users", 201, 0.050, 128.0, 64.0);
//!
//! profile.sort(SortField::Count, true);
//! assert_eq!(profile.stats()[0].count, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod core;
pub mod filter;
pub mod normalize;
pub mod output;
pub mod parse;
pub mod snapshot;
pub mod stats;

// Re-export core types for convenience
pub use crate::core::{Config, Result};
