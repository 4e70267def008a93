// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{Diagnostics, OnsetError};

/// Checks the breakpoint contract: strictly increasing, in `(0, n]`, ending
/// with `n`.
pub fn validate_breakpoints(n: usize, breakpoints: &[usize]) -> Result<(), OnsetError> {
    let Some(&last) = breakpoints.last() else {
        return Err(OnsetError::invalid_input(
            "breakpoints must contain at least the terminal index n",
        ));
    };
    if last != n {
        return Err(OnsetError::invalid_input(format!(
            "breakpoints must end with n={n}; got last={last}"
        )));
    }
    if breakpoints[0] == 0 {
        return Err(OnsetError::invalid_input(
            "breakpoints must not contain index 0",
        ));
    }
    for pair in breakpoints.windows(2) {
        if pair[0] >= pair[1] {
            return Err(OnsetError::invalid_input(format!(
                "breakpoints must be strictly increasing; got {} then {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

/// Output of an offline change-point detector.
///
/// `breakpoints` always ends with the series length `n`, which marks the end
/// of the last segment rather than a physical event; `change_points` is the
/// same list without it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ChangePointResult {
    pub breakpoints: Vec<usize>,
    pub change_points: Vec<usize>,
    pub diagnostics: Diagnostics,
}

impl ChangePointResult {
    pub fn new(
        n: usize,
        breakpoints: Vec<usize>,
        diagnostics: Diagnostics,
    ) -> Result<Self, OnsetError> {
        validate_breakpoints(n, &breakpoints)?;
        let change_points = breakpoints[..breakpoints.len() - 1].to_vec();
        Ok(Self {
            breakpoints,
            change_points,
            diagnostics,
        })
    }
}
