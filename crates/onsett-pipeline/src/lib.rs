// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Turns a validated sensor series into onset events: pressure change
//! points, band filtering, temperature-rise localization and aggregation.

pub mod aggregate;
pub mod filter;
pub mod localize;
pub mod pipeline;

pub use aggregate::aggregate_events;
pub use filter::filter_by_band;
pub use localize::{LocalizedOnset, OnsetLocalizer};
pub use pipeline::{CostConfig, OnsetReport, PipelineSpec, detect_change_points, execute_pipeline};
