// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::model::CostModel;
use onsett_core::{
    OnsetError, ReproMode, SeriesView, prefix_sum_squares, prefix_sum_squares_kahan,
    prefix_sums, prefix_sums_kahan,
};

/// Squared-error segment cost around the segment mean.
///
/// Segment conventions use half-open intervals: `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostL2Mean {
    pub repro_mode: ReproMode,
}

impl CostL2Mean {
    pub const fn new(repro_mode: ReproMode) -> Self {
        Self { repro_mode }
    }
}

impl Default for CostL2Mean {
    fn default() -> Self {
        Self::new(ReproMode::Balanced)
    }
}

/// Prefix-stat cache for O(1) L2 segment-cost queries.
#[derive(Clone, Debug, PartialEq)]
pub struct L2Cache {
    prefix_sum: Vec<f64>,
    prefix_sum_sq: Vec<f64>,
    n: usize,
}

impl CostModel for CostL2Mean {
    type Cache = L2Cache;

    fn name(&self) -> &'static str {
        "l2_mean"
    }

    fn params_per_segment(&self) -> usize {
        1
    }

    fn precompute(&self, x: &SeriesView<'_>) -> Result<Self::Cache, OnsetError> {
        self.validate(x)?;

        let shift = x.values[0];
        let centred: Vec<f64> = x.values.iter().map(|v| v - shift).collect();
        let (prefix_sum, prefix_sum_sq) = if matches!(self.repro_mode, ReproMode::Strict) {
            (prefix_sums_kahan(&centred), prefix_sum_squares_kahan(&centred))
        } else {
            (prefix_sums(&centred), prefix_sum_squares(&centred))
        };

        if let Some(last) = prefix_sum_sq.last()
            && !last.is_finite()
        {
            return Err(OnsetError::numerical_issue(format!(
                "CostL2Mean prefix sum of squares overflowed for n={}",
                x.n
            )));
        }

        Ok(L2Cache {
            prefix_sum,
            prefix_sum_sq,
            n: x.n,
        })
    }

    fn segment_cost(&self, cache: &Self::Cache, start: usize, end: usize) -> f64 {
        assert!(
            start < end,
            "segment_cost requires start < end; got start={start}, end={end}"
        );
        assert!(
            end <= cache.n,
            "segment_cost end out of bounds: end={end}, n={}",
            cache.n
        );

        let m = (end - start) as f64;
        let sum = cache.prefix_sum[end] - cache.prefix_sum[start];
        let sum_sq = cache.prefix_sum_sq[end] - cache.prefix_sum_sq[start];
        (sum_sq - sum * sum / m).max(0.0)
    }
}
