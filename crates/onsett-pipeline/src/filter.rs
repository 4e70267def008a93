// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use log::debug;
use onsett_core::PressureBand;

/// Keeps the change points whose pressure lies inside `band`, in input order.
///
/// Indices past the end of `pressure` are dropped rather than reported.
pub fn filter_by_band(change_points: &[usize], pressure: &[f64], band: &PressureBand) -> Vec<usize> {
    let retained: Vec<usize> = change_points
        .iter()
        .copied()
        .filter(|&idx| pressure.get(idx).is_some_and(|&p| band.contains(p)))
        .collect();

    debug!(
        "band filter [{}, {}] bar kept {}/{} change points",
        band.min_bar,
        band.max_bar,
        retained.len(),
        change_points.len()
    );
    retained
}
