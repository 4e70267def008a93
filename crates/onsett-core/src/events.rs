// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::OnsetError;

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Decimal places used for reported onset values.
pub const REPORT_DECIMALS: u32 = 2;

/// Rounds `value` half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Closed pressure interval `[min_bar, max_bar]` used to keep only
/// physically relevant change points.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureBand {
    pub min_bar: f64,
    pub max_bar: f64,
}

impl PressureBand {
    pub fn new(min_bar: f64, max_bar: f64) -> Result<Self, OnsetError> {
        let band = Self { min_bar, max_bar };
        band.validate()?;
        Ok(band)
    }

    pub fn validate(&self) -> Result<(), OnsetError> {
        if !self.min_bar.is_finite() || !self.max_bar.is_finite() {
            return Err(OnsetError::invalid_input(format!(
                "pressure band bounds must be finite; got [{}, {}]",
                self.min_bar, self.max_bar
            )));
        }
        if self.min_bar > self.max_bar {
            return Err(OnsetError::invalid_input(format!(
                "pressure band requires min_bar <= max_bar; got [{}, {}]",
                self.min_bar, self.max_bar
            )));
        }
        Ok(())
    }

    pub fn contains(&self, pressure_bar: f64) -> bool {
        self.min_bar <= pressure_bar && pressure_bar <= self.max_bar
    }
}

impl Default for PressureBand {
    fn default() -> Self {
        Self {
            min_bar: 20.0,
            max_bar: 34.0,
        }
    }
}

/// Half-width `R`, in samples, of the search interval `[i - R, i + R)`
/// around a change point.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OnsetWindow {
    pub half_width: usize,
}

impl OnsetWindow {
    pub fn new(half_width: usize) -> Result<Self, OnsetError> {
        let window = Self { half_width };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), OnsetError> {
        if self.half_width == 0 {
            return Err(OnsetError::window_too_small(
                "onset window half-width must be >= 1; got 0",
            ));
        }
        Ok(())
    }
}

impl Default for OnsetWindow {
    fn default() -> Self {
        Self { half_width: 50 }
    }
}

/// One localized onset, kept at full precision.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OnsetEvent {
    /// Pressure change point that triggered the search.
    pub change_point_index: usize,
    /// Sample just before the steepest temperature rise.
    pub sample_index: usize,
    pub onset_temperature_c: f64,
    pub onset_temperature_k: f64,
    pub onset_time_min: f64,
}

impl OnsetEvent {
    pub fn new(
        change_point_index: usize,
        sample_index: usize,
        temperature_c: f64,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            change_point_index,
            sample_index,
            onset_temperature_c: temperature_c,
            onset_temperature_k: temperature_c + KELVIN_OFFSET,
            onset_time_min: elapsed_seconds / 60.0,
        }
    }

    /// Display form: Celsius and time rounded, Kelvin derived from the
    /// rounded Celsius value.
    pub fn rounded(&self, decimals: u32) -> RoundedOnsetEvent {
        let celsius = round_to(self.onset_temperature_c, decimals);
        RoundedOnsetEvent {
            change_point_index: self.change_point_index,
            sample_index: self.sample_index,
            onset_temperature_c: celsius,
            onset_temperature_k: round_to(celsius + KELVIN_OFFSET, decimals),
            onset_time_min: round_to(self.onset_time_min, decimals),
        }
    }
}

/// Rounded onset values for tables, plots and console output.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedOnsetEvent {
    pub change_point_index: usize,
    pub sample_index: usize,
    pub onset_temperature_c: f64,
    pub onset_temperature_k: f64,
    pub onset_time_min: f64,
}
