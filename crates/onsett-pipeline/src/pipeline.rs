// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::aggregate::aggregate_events;
use crate::filter::filter_by_band;
use crate::localize::OnsetLocalizer;
use log::{debug, info};
use onsett_core::{
    ChangePointResult, Constraints, Diagnostics, OfflineDetector, OnsetError, OnsetEvent,
    OnsetWindow, Penalty, PressureBand, ReproMode, SensorSeries, SeriesView,
};
use onsett_costs::{CostL2Mean, CostNormalMeanVar};
use onsett_offline::{Pelt, PeltConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Segment cost used for pressure change-point detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostConfig {
    /// Gaussian segments with their own mean and variance.
    #[default]
    Normal,
    /// Squared error around the segment mean.
    L2,
}

impl fmt::Display for CostConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::L2 => write!(f, "l2"),
        }
    }
}

impl FromStr for CostConfig {
    type Err = OnsetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "l2" => Ok(Self::L2),
            _ => Err(OnsetError::invalid_input(format!(
                "unsupported cost '{raw}'; expected 'normal' or 'l2'"
            ))),
        }
    }
}

/// Everything needed to turn a sensor series into onset events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSpec {
    pub cost: CostConfig,
    pub penalty: Penalty,
    pub constraints: Constraints,
    pub band: PressureBand,
    pub window: OnsetWindow,
    pub repro_mode: ReproMode,
}

impl PipelineSpec {
    pub fn validate(&self) -> Result<(), OnsetError> {
        self.band.validate()?;
        self.window.validate()?;
        if self.constraints.min_segment_len == 0 || self.constraints.jump == 0 {
            return Err(OnsetError::invalid_input(format!(
                "min_segment_len and jump must be >= 1; got min_segment_len={}, jump={}",
                self.constraints.min_segment_len, self.constraints.jump
            )));
        }
        if let Penalty::Manual(value) = self.penalty
            && (!value.is_finite() || value <= 0.0)
        {
            return Err(OnsetError::invalid_input(format!(
                "penalty must be finite and > 0.0; got {value}"
            )));
        }
        Ok(())
    }
}

/// Outcome of one pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OnsetReport {
    /// Detected pressure change points, terminal index excluded.
    pub change_points: Vec<usize>,
    /// Change points whose pressure lies inside the band.
    pub retained: Vec<usize>,
    pub events: Vec<OnsetEvent>,
    pub diagnostics: Diagnostics,
}

fn detect_with<D: OfflineDetector>(
    detector: &D,
    view: &SeriesView<'_>,
    constraints: &Constraints,
) -> Result<ChangePointResult, OnsetError> {
    detector.detect(view, constraints)
}

/// Runs PELT with the configured cost over `pressure`.
pub fn detect_change_points(
    pressure: &SeriesView<'_>,
    spec: &PipelineSpec,
) -> Result<ChangePointResult, OnsetError> {
    let config = PeltConfig {
        penalty: spec.penalty,
        prune: true,
    };
    match spec.cost {
        CostConfig::Normal => detect_with(
            &Pelt::new(CostNormalMeanVar::new(spec.repro_mode), config)?,
            pressure,
            &spec.constraints,
        ),
        CostConfig::L2 => detect_with(
            &Pelt::new(CostL2Mean::new(spec.repro_mode), config)?,
            pressure,
            &spec.constraints,
        ),
    }
}

/// Detects pressure change points, keeps those inside the band, localizes
/// the temperature onset for each and returns the resulting events.
pub fn execute_pipeline(
    series: &SensorSeries,
    spec: &PipelineSpec,
) -> Result<OnsetReport, OnsetError> {
    spec.validate()?;
    let localizer = OnsetLocalizer::new(spec.window)?;

    let pressure = series.pressure_view()?;
    let detection = detect_change_points(&pressure, spec)?;
    debug!(
        "{} change points from {} samples: {:?}",
        detection.change_points.len(),
        series.len(),
        detection.change_points
    );

    let retained = filter_by_band(&detection.change_points, series.pressure(), &spec.band);
    let onsets = localizer.localize_all(series.temperature(), &retained)?;
    let events = aggregate_events(series, &onsets)?;

    info!(
        "{} change points, {} in band [{}, {}] bar, {} onset events",
        detection.change_points.len(),
        retained.len(),
        spec.band.min_bar,
        spec.band.max_bar,
        events.len()
    );

    Ok(OnsetReport {
        change_points: detection.change_points,
        retained,
        events,
        diagnostics: detection.diagnostics,
    })
}
