// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::OnsetError;

/// Zero-copy univariate view over a borrowed, validated sample buffer.
#[derive(Clone, Copy, Debug)]
pub struct SeriesView<'a> {
    pub values: &'a [f64],
    pub n: usize,
}

impl<'a> SeriesView<'a> {
    /// Constructs a validated `SeriesView`.
    pub fn new(values: &'a [f64]) -> Result<Self, OnsetError> {
        if values.is_empty() {
            return Err(OnsetError::invalid_input("n must be >= 1"));
        }
        if let Some((idx, value)) = values
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(OnsetError::invalid_input(format!(
                "series values must be finite: index {idx} has {value}"
            )));
        }

        Ok(Self {
            values,
            n: values.len(),
        })
    }

    pub fn get(&self, t: usize) -> Option<f64> {
        self.values.get(t).copied()
    }
}

/// Aligned pressure, temperature and elapsed-time samples of one log file.
///
/// Index `i` refers to the same physical sample in all three sequences.
/// Temperatures are stored in degrees Celsius, already scaled from the raw
/// instrument units.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorSeries {
    pressure: Vec<f64>,
    temperature: Vec<f64>,
    elapsed_seconds: Vec<f64>,
}

impl SensorSeries {
    /// Builds a series, enforcing equal lengths, `n >= 1` and finite values.
    pub fn new(
        pressure: Vec<f64>,
        temperature: Vec<f64>,
        elapsed_seconds: Vec<f64>,
    ) -> Result<Self, OnsetError> {
        let n = pressure.len();
        if n == 0 {
            return Err(OnsetError::data_insufficient(
                "sensor series must contain at least one sample",
            ));
        }
        if temperature.len() != n || elapsed_seconds.len() != n {
            return Err(OnsetError::invalid_input(format!(
                "sensor series length mismatch: pressure={n}, temperature={}, elapsed_seconds={}",
                temperature.len(),
                elapsed_seconds.len()
            )));
        }

        for (name, values) in [
            ("pressure", &pressure),
            ("temperature", &temperature),
            ("elapsed_seconds", &elapsed_seconds),
        ] {
            if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
                return Err(OnsetError::invalid_input(format!(
                    "{name}[{idx}] is not finite: {}",
                    values[idx]
                )));
            }
        }

        Ok(Self {
            pressure,
            temperature,
            elapsed_seconds,
        })
    }

    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn elapsed_seconds(&self) -> &[f64] {
        &self.elapsed_seconds
    }

    /// Elapsed time of sample `i` in minutes.
    pub fn elapsed_minutes(&self, i: usize) -> Option<f64> {
        self.elapsed_seconds.get(i).map(|s| s / 60.0)
    }

    /// Elapsed time of every sample in minutes.
    pub fn elapsed_minutes_all(&self) -> Vec<f64> {
        self.elapsed_seconds.iter().map(|s| s / 60.0).collect()
    }

    /// Validated view over the pressure channel.
    pub fn pressure_view(&self) -> Result<SeriesView<'_>, OnsetError> {
        SeriesView::new(&self.pressure)
    }
}
