// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::model::CostModel;
use onsett_core::{
    OnsetError, ReproMode, SeriesView, prefix_sum_squares, prefix_sum_squares_kahan,
    prefix_sums, prefix_sums_kahan,
};

/// Added to every segment variance so constant segments keep a finite cost.
pub const VARIANCE_REGULARIZATION: f64 = 1e-6;

/// Gaussian segment cost with a free mean and variance per segment.
///
/// Segment conventions use half-open intervals: `[start, end)`.
///
/// The cost of a segment of length `m` is `m * ln(var + 1e-6)`, where `var`
/// is the population variance of the segment. Constant terms of the
/// negative log-likelihood are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostNormalMeanVar {
    pub repro_mode: ReproMode,
}

impl CostNormalMeanVar {
    pub const fn new(repro_mode: ReproMode) -> Self {
        Self { repro_mode }
    }
}

impl Default for CostNormalMeanVar {
    fn default() -> Self {
        Self::new(ReproMode::Balanced)
    }
}

/// Prefix-stat cache for O(1) Gaussian segment-cost queries.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalCache {
    prefix_sum: Vec<f64>,
    prefix_sum_sq: Vec<f64>,
    n: usize,
}

impl NormalCache {
    fn variance(&self, start: usize, end: usize) -> f64 {
        let m = (end - start) as f64;
        let sum = self.prefix_sum[end] - self.prefix_sum[start];
        let sum_sq = self.prefix_sum_sq[end] - self.prefix_sum_sq[start];
        let mean = sum / m;
        (sum_sq / m - mean * mean).max(0.0)
    }
}

impl CostModel for CostNormalMeanVar {
    type Cache = NormalCache;

    fn name(&self) -> &'static str {
        "normal_mean_var"
    }

    fn params_per_segment(&self) -> usize {
        2
    }

    fn min_segment_len(&self) -> usize {
        2
    }

    fn precompute(&self, x: &SeriesView<'_>) -> Result<Self::Cache, OnsetError> {
        self.validate(x)?;

        // Variance is shift invariant; centring on the first sample keeps the
        // sum-of-squares difference well conditioned for large offsets.
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
                "CostNormalMeanVar prefix sum of squares overflowed for n={}",
                x.n
            )));
        }

        Ok(NormalCache {
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
        m * (cache.variance(start, end) + VARIANCE_REGULARIZATION).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::{CostNormalMeanVar, VARIANCE_REGULARIZATION};
    use crate::CostModel;
    use onsett_core::{ReproMode, SeriesView};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual} (tol={tol})"
        );
    }

    fn naive_cost(values: &[f64]) -> f64 {
        let m = values.len() as f64;
        let mean = values.iter().sum::<f64>() / m;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / m;
        m * (var + VARIANCE_REGULARIZATION).ln()
    }

    #[test]
    fn trait_contract_and_defaults() {
        let model = CostNormalMeanVar::default();
        assert_eq!(model.name(), "normal_mean_var");
        assert_eq!(model.params_per_segment(), 2);
        assert_eq!(model.min_segment_len(), 2);
        assert_eq!(model.repro_mode, ReproMode::Balanced);
    }

    #[test]
    fn matches_naive_reference_on_every_segment() {
        let values = [40.0, 40.1, 39.9, 37.0, 34.0, 31.0, 25.2, 24.8, 25.0];
        let view = SeriesView::new(&values).expect("view should be valid");
        let model = CostNormalMeanVar::default();
        let cache = model.precompute(&view).expect("precompute should succeed");

        for start in 0..values.len() {
            for end in (start + 1)..=values.len() {
                assert_close(
                    model.segment_cost(&cache, start, end),
                    naive_cost(&values[start..end]),
                    1e-6,
                );
            }
        }
    }

    #[test]
    fn constant_segment_uses_regularized_variance() {
        let values = vec![40.0; 32];
        let view = SeriesView::new(&values).expect("view should be valid");
        let model = CostNormalMeanVar::default();
        let cache = model.precompute(&view).expect("precompute should succeed");

        let cost = model.segment_cost(&cache, 0, 32);
        assert_close(cost, 32.0 * VARIANCE_REGULARIZATION.ln(), 1e-9);
        assert!(cost.is_finite());
    }

    #[test]
    fn strict_mode_agrees_with_balanced_mode() {
        let values: Vec<f64> = (0..500)
            .map(|idx| 1_000.0 + (idx as f64 * 0.37).sin())
            .collect();
        let view = SeriesView::new(&values).expect("view should be valid");
        let balanced = CostNormalMeanVar::new(ReproMode::Balanced);
        let strict = CostNormalMeanVar::new(ReproMode::Strict);
        let balanced_cache = balanced.precompute(&view).expect("balanced precompute");
        let strict_cache = strict.precompute(&view).expect("strict precompute");

        for (start, end) in [(0, 500), (10, 20), (123, 456), (498, 500)] {
            assert_close(
                balanced.segment_cost(&balanced_cache, start, end),
                strict.segment_cost(&strict_cache, start, end),
                1e-6,
            );
        }
    }

    #[test]
    fn segment_cost_batch_matches_single_queries() {
        let values = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        let view = SeriesView::new(&values).expect("view should be valid");
        let model = CostNormalMeanVar::default();
        let cache = model.precompute(&view).expect("precompute should succeed");

        let queries = [(0, 2), (1, 5), (0, 6)];
        let mut out = [0.0; 3];
        model.segment_cost_batch(&cache, &queries, &mut out);
        for (value, &(start, end)) in out.iter().zip(&queries) {
            assert_eq!(*value, model.segment_cost(&cache, start, end));
        }
    }

    #[test]
    #[should_panic(expected = "start < end")]
    fn empty_segment_panics() {
        let values = [1.0, 2.0];
        let view = SeriesView::new(&values).expect("view should be valid");
        let model = CostNormalMeanVar::default();
        let cache = model.precompute(&view).expect("precompute should succeed");
        let _ = model.segment_cost(&cache, 1, 1);
    }
}
