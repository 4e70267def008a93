// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use log::debug;
use onsett_core::{OnsetError, OnsetWindow};

/// A change point paired with the sample where its temperature rise starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LocalizedOnset {
    pub change_point_index: usize,
    pub sample_index: usize,
}

/// Finds the last stable temperature sample before the steepest rise near
/// each change point.
///
/// For change point `i` the search covers `[max(i - R, 0), min(i + R, N))`.
/// Within it the first differences `T[k] - T[k - 1]` are scanned and the
/// sample before the largest one is returned. Ties resolve to the earliest
/// `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OnsetLocalizer {
    window: OnsetWindow,
}

impl OnsetLocalizer {
    pub fn new(window: OnsetWindow) -> Result<Self, OnsetError> {
        window.validate()?;
        Ok(Self { window })
    }

    pub fn window(&self) -> OnsetWindow {
        self.window
    }

    pub fn localize(
        &self,
        temperature: &[f64],
        change_point: usize,
    ) -> Result<LocalizedOnset, OnsetError> {
        self.window.validate()?;

        let n = temperature.len();
        let half_width = self.window.half_width;
        let lo = change_point.saturating_sub(half_width);
        let hi = change_point.saturating_add(half_width).min(n);

        if hi <= lo || hi - lo < 2 {
            return Err(OnsetError::window_too_small(format!(
                "change point {change_point}: window [{lo}, {hi}) with half-width {half_width} holds fewer than 2 of {n} samples"
            )));
        }

        let mut best_k = lo + 1;
        let mut best_rise = temperature[lo + 1] - temperature[lo];
        for k in (lo + 2)..hi {
            let rise = temperature[k] - temperature[k - 1];
            if rise > best_rise {
                best_rise = rise;
                best_k = k;
            }
        }

        Ok(LocalizedOnset {
            change_point_index: change_point,
            sample_index: best_k - 1,
        })
    }

    /// Localizes every change point in order, failing on the first window
    /// that cannot be searched.
    pub fn localize_all(
        &self,
        temperature: &[f64],
        change_points: &[usize],
    ) -> Result<Vec<LocalizedOnset>, OnsetError> {
        let onsets = change_points
            .iter()
            .map(|&cp| self.localize(temperature, cp))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "localized {} onsets with half-width {}",
            onsets.len(),
            self.window.half_width
        );
        Ok(onsets)
    }
}
