// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Library side of the `onsett` binary: run configuration, flag overrides
//! and processing of a single sensor log into its result archive.

pub mod config;
pub mod error;
pub mod prompt;

pub use config::RunConfig;
pub use error::{CliError, ErrorEnvelope, ErrorPayload};

use log::{info, warn};
use onsett_core::{OnsetError, OnsetWindow, Penalty, PressureBand};
use onsett_io::{
    OutputOptions, OutputSummary, RunSummary, StorageError, load_series, pressure_sensor_column,
    temperature_sensor_column, write_outputs,
};
use onsett_pipeline::{CostConfig, OnsetReport, execute_pipeline};
use std::path::{Path, PathBuf};

/// Values given explicitly on the command line. Each one replaces the
/// corresponding field of the base [`RunConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub pressure_sensor: Option<usize>,
    pub temperature_sensor: Option<usize>,
    pub time_column: Option<usize>,
    pub pressure_column: Option<usize>,
    pub temperature_column: Option<usize>,
    pub header_rows: Option<usize>,
    pub temperature_scale: Option<f64>,
    pub min_pressure_bar: Option<f64>,
    pub max_pressure_bar: Option<f64>,
    pub window: Option<usize>,
    pub penalty: Option<Penalty>,
    pub cost: Option<CostConfig>,
    pub min_segment_len: Option<usize>,
    pub jump: Option<usize>,
}

impl Overrides {
    /// Applies the overrides and validates the result. Explicit column
    /// indices win over sensor numbers.
    pub fn apply(&self, base: RunConfig) -> Result<RunConfig, OnsetError> {
        let mut config = base;
        let schema = &mut config.schema;
        if let Some(sensor) = self.pressure_sensor {
            schema.pressure_column = pressure_sensor_column(sensor)?;
        }
        if let Some(sensor) = self.temperature_sensor {
            schema.temperature_column = temperature_sensor_column(sensor)?;
        }
        if let Some(column) = self.time_column {
            schema.time_column = column;
        }
        if let Some(column) = self.pressure_column {
            schema.pressure_column = column;
        }
        if let Some(column) = self.temperature_column {
            schema.temperature_column = column;
        }
        if let Some(rows) = self.header_rows {
            schema.header_rows = rows;
        }
        if let Some(scale) = self.temperature_scale {
            schema.temperature_scale = scale;
        }

        let pipeline = &mut config.pipeline;
        pipeline.band = PressureBand {
            min_bar: self.min_pressure_bar.unwrap_or(pipeline.band.min_bar),
            max_bar: self.max_pressure_bar.unwrap_or(pipeline.band.max_bar),
        };
        if let Some(half_width) = self.window {
            pipeline.window = OnsetWindow { half_width };
        }
        if let Some(penalty) = self.penalty {
            pipeline.penalty = penalty;
        }
        if let Some(cost) = self.cost {
            pipeline.cost = cost;
        }
        if let Some(min_segment_len) = self.min_segment_len {
            pipeline.constraints.min_segment_len = min_segment_len;
        }
        if let Some(jump) = self.jump {
            pipeline.constraints.jump = jump;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Everything produced for one input file.
#[derive(Clone, Debug)]
pub struct FileOutcome {
    pub report: OnsetReport,
    pub summary: RunSummary,
    pub output: OutputSummary,
}

fn process(
    input: &Path,
    config: &RunConfig,
    options: &OutputOptions,
) -> Result<FileOutcome, StorageError> {
    let series = load_series(input, &config.schema)?;
    let report = execute_pipeline(&series, &config.pipeline)?;
    let output = write_outputs(input, &series, &config.pipeline, &report, options)?;

    let mut summary = RunSummary::new(input, series.len(), &config.pipeline, &report);
    summary.archive = Some(output.archive.display().to_string());
    Ok(FileOutcome {
        report,
        summary,
        output,
    })
}

/// Loads, analyses and packages one sensor log. Failures carry the path.
pub fn run_file(
    input: &Path,
    config: &RunConfig,
    options: &OutputOptions,
) -> Result<FileOutcome, CliError> {
    info!("processing {}", input.display());
    process(input, config, options).map_err(|err| CliError::file(input, err))
}

/// Results of processing several files; one failure never stops the rest.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub failures: Vec<CliError>,
    pub total: usize,
}

impl BatchReport {
    /// `BatchFailed` when any file failed.
    pub fn status(&self) -> Result<(), CliError> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(CliError::BatchFailed {
            failed: self.failures.len(),
            total: self.total,
        })
    }
}

pub fn run_batch(files: &[PathBuf], config: &RunConfig, options: &OutputOptions) -> BatchReport {
    let mut outcomes = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    for input in files {
        match run_file(input, config, options) {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                warn!("skipping {}: {err}", input.display());
                failures.push(err);
            }
        }
    }
    info!("processed {} of {} files", outcomes.len(), files.len());
    BatchReport {
        outcomes,
        failures,
        total: files.len(),
    }
}

/// Initialises `env_logger`: `warn` by default, `-v` info, `-vv` debug.
/// `RUST_LOG` takes precedence.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
