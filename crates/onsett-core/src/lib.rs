// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Shared types and contracts for onset-temperature extraction.
//!
//! Everything downstream (costs, detectors, the onset pipeline, I/O) speaks
//! in terms of the types defined here: validated sensor series, detector
//! constraints and penalties, change-point results and onset events.

pub mod constraints;
pub mod detectors;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod penalty;
pub mod prefix;
pub mod repro;
pub mod results;
pub mod series;

pub use constraints::{Constraints, ValidatedConstraints, validate_constraints};
pub use detectors::OfflineDetector;
pub use diagnostics::{DIAGNOSTICS_SCHEMA_VERSION, Diagnostics, PruningStats};
pub use error::OnsetError;
pub use events::{
    KELVIN_OFFSET, OnsetEvent, OnsetWindow, PressureBand, REPORT_DECIMALS, RoundedOnsetEvent,
    round_to,
};
pub use penalty::{Penalty, penalty_value};
pub use prefix::{prefix_sum_squares, prefix_sum_squares_kahan, prefix_sums, prefix_sums_kahan};
pub use repro::ReproMode;
pub use results::{ChangePointResult, validate_breakpoints};
pub use series::{SensorSeries, SeriesView};
