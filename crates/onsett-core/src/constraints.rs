// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::OnsetError;

/// Segmentation constraints shared by offline detectors.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraints {
    /// Minimum number of samples in any segment.
    pub min_segment_len: usize,
    /// Change points are restricted to multiples of `jump`.
    pub jump: usize,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_segment_len: 2,
            jump: 5,
        }
    }
}

/// Constraints checked against a concrete series length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConstraints {
    pub min_segment_len: usize,
    pub jump: usize,
    /// Admissible split indices in ascending order, excluding `0` and `n`.
    pub effective_candidates: Vec<usize>,
}

/// Validates `constraints` for a series of length `n` and enumerates the
/// admissible split indices.
pub fn validate_constraints(
    constraints: &Constraints,
    n: usize,
) -> Result<ValidatedConstraints, OnsetError> {
    if constraints.min_segment_len == 0 {
        return Err(OnsetError::invalid_input(
            "constraints.min_segment_len must be >= 1; got 0",
        ));
    }
    if constraints.jump == 0 {
        return Err(OnsetError::invalid_input(
            "constraints.jump must be >= 1; got 0",
        ));
    }
    if n < constraints.min_segment_len {
        return Err(OnsetError::data_insufficient(format!(
            "series has n={n} samples, fewer than min_segment_len={}",
            constraints.min_segment_len
        )));
    }

    let min_segment_len = constraints.min_segment_len;
    let effective_candidates = (constraints.jump..n)
        .step_by(constraints.jump)
        .filter(|&k| k >= min_segment_len && n - k >= min_segment_len)
        .collect();

    Ok(ValidatedConstraints {
        min_segment_len,
        jump: constraints.jump,
        effective_candidates,
    })
}
