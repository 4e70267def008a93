// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use onsett_core::{OnsetError, SeriesView};

/// Segment cost contract used by offline detectors.
///
/// Segments are half-open intervals `[start, end)`. Implementations
/// precompute a cache once per series so that `segment_cost` is O(1).
pub trait CostModel {
    type Cache;

    fn name(&self) -> &'static str;

    /// Number of free parameters fitted per segment, used by
    /// information-criterion penalties.
    fn params_per_segment(&self) -> usize;

    /// Shortest segment for which the cost is meaningful.
    fn min_segment_len(&self) -> usize {
        1
    }

    fn validate(&self, x: &SeriesView<'_>) -> Result<(), OnsetError> {
        if x.n == 0 {
            return Err(OnsetError::invalid_input(format!(
                "{} requires n >= 1; got n=0",
                self.name()
            )));
        }
        Ok(())
    }

    fn precompute(&self, x: &SeriesView<'_>) -> Result<Self::Cache, OnsetError>;

    fn segment_cost(&self, cache: &Self::Cache, start: usize, end: usize) -> f64;

    fn segment_cost_batch(&self, cache: &Self::Cache, queries: &[(usize, usize)], out: &mut [f64]) {
        assert_eq!(
            queries.len(),
            out.len(),
            "segment_cost_batch requires matching query/output lengths"
        );
        for (slot, &(start, end)) in out.iter_mut().zip(queries) {
            *slot = self.segment_cost(cache, start, end);
        }
    }
}
