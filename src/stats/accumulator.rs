//! Online accumulator for one numeric series.
//!
//! Tracks max/min/sum in O(1) per update and optionally retains every
//! sample, in arrival order, for percentile and standard deviation
//! reporting. The accumulator does not count its own updates; the parent
//! aggregate owns the count and supplies it to the derived projections.

use serde::{Deserialize, Serialize};

use crate::core::types::PercentileMode;

/// Streaming aggregate of one numeric series.
///
/// The minimum is an explicit optional value rather than a zero sentinel,
/// so an observed value of exactly 0 is distinguishable from "no value
/// yet" and `min()` is the true minimum of everything recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricAccumulator {
    max: f64,
    min: Option<f64>,
    sum: f64,
    retain_samples: bool,
    samples: Vec<f64>,
}

impl MetricAccumulator {
    /// Creates an empty accumulator.
    ///
    /// `retain_samples` enables the sample list backing `percentile` and
    /// `stddev`; without it both report 0.0.
    pub fn new(retain_samples: bool) -> Self {
        MetricAccumulator {
            max: 0.0,
            min: None,
            sum: 0.0,
            retain_samples,
            samples: Vec::new(),
        }
    }

    /// Folds one value into the aggregate.
    pub fn record(&mut self, value: f64) {
        if value > self.max {
            self.max = value;
        }

        self.min = Some(match self.min {
            Some(min) if min <= value => min,
            _ => value,
        });

        self.sum += value;

        if self.retain_samples {
            self.samples.push(value);
        }
    }

    /// Maximum recorded value; 0.0 before the first update
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Minimum recorded value; 0.0 before the first update
    pub fn min(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Exact running total
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Arithmetic mean over `count` updates; 0.0 when `count` is zero
    pub fn avg(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.sum / count as f64
    }

    /// The n-th percentile over the retained samples.
    ///
    /// The rank is `max(0, floor(count * n / 100) - 1)`. In
    /// [`PercentileMode::Arrival`] the sample at that position in arrival
    /// order is returned; in [`PercentileMode::Sorted`] the
    /// magnitude-sorted order statistic at the same rank is returned.
    /// Returns 0.0 when retention is disabled.
    pub fn percentile(&self, n: usize, count: usize, mode: PercentileMode) -> f64 {
        if !self.retain_samples || self.samples.is_empty() {
            return 0.0;
        }

        let rank = percent_rank(count, n).min(self.samples.len() - 1);
        match mode {
            PercentileMode::Arrival => self.samples[rank],
            PercentileMode::Sorted => {
                let mut sorted = self.samples.clone();
                sorted.sort_unstable_by(f64::total_cmp);
                sorted[rank]
            },
        }
    }

    /// Population standard deviation over the retained samples.
    ///
    /// Returns 0.0 when retention is disabled.
    pub fn stddev(&self, count: usize) -> f64 {
        if !self.retain_samples || count == 0 {
            return 0.0;
        }

        let avg = self.avg(count);
        let sum_sq: f64 = self.samples.iter().map(|v| (v - avg) * (v - avg)).sum();

        (sum_sq / count as f64).sqrt()
    }
}

/// Zero-based rank of the n-th percentile among `count` samples.
fn percent_rank(count: usize, n: usize) -> usize {
    (count * n / 100).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(values: &[f64]) -> MetricAccumulator {
        let mut acc = MetricAccumulator::new(true);
        for &v in values {
            acc.record(v);
        }
        acc
    }

    #[test]
    fn test_extrema_and_sum() {
        let acc = filled(&[3.0, 1.0, 2.0]);
        assert_eq!(acc.max(), 3.0);
        assert_eq!(acc.min(), 1.0);
        assert_eq!(acc.sum(), 6.0);
        assert_eq!(acc.avg(3), 2.0);
    }

    #[test]
    fn test_observed_zero_is_a_real_minimum() {
        let acc = filled(&[2.0, 0.0, 5.0]);
        assert_eq!(acc.min(), 0.0);
        assert_eq!(acc.max(), 5.0);
    }

    #[test]
    fn test_empty_accumulator_reports_zero() {
        let acc = MetricAccumulator::new(true);
        assert_eq!(acc.min(), 0.0);
        assert_eq!(acc.max(), 0.0);
        assert_eq!(acc.avg(0), 0.0);
        assert_eq!(acc.stddev(0), 0.0);
    }

    #[test]
    fn test_arrival_percentiles() {
        // Arrival sequence 1..=100, already in order: arrival position and
        // magnitude rank coincide.
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let acc = filled(&values);

        assert_eq!(acc.percentile(1, 100, PercentileMode::Arrival), 1.0);
        assert_eq!(acc.percentile(50, 100, PercentileMode::Arrival), 50.0);
        assert_eq!(acc.percentile(99, 100, PercentileMode::Arrival), 99.0);
    }

    #[test]
    fn test_arrival_percentile_is_positional_not_sorted() {
        let acc = filled(&[9.0, 1.0, 5.0, 3.0]);
        // rank for p50 of 4 samples is 4*50/100-1 = 1: second arrival
        assert_eq!(acc.percentile(50, 4, PercentileMode::Arrival), 1.0);
        // the sorted mode resolves the same rank by magnitude
        assert_eq!(acc.percentile(50, 4, PercentileMode::Sorted), 3.0);
    }

    #[test]
    fn test_percentile_rank_floor() {
        // count * n / 100 below 1 clamps to the first sample
        let acc = filled(&[7.0, 8.0]);
        assert_eq!(acc.percentile(1, 2, PercentileMode::Arrival), 7.0);
    }

    #[test]
    fn test_percentiles_disabled() {
        let mut acc = MetricAccumulator::new(false);
        acc.record(10.0);
        acc.record(20.0);
        assert_eq!(acc.percentile(50, 2, PercentileMode::Arrival), 0.0);
        assert_eq!(acc.stddev(2), 0.0);
        // max/min/sum still track
        assert_eq!(acc.max(), 20.0);
        assert_eq!(acc.sum(), 30.0);
    }

    #[test]
    fn test_stddev() {
        let acc = filled(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        // classic population stddev example: mean 5, variance 4
        assert!((acc.stddev(8) - 2.0).abs() < 1e-9);
    }
}
