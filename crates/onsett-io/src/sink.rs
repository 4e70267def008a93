// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::archive::zip_files;
use crate::error::StorageError;
use crate::plots::{
    CHANGE_POINT_PLOT_FILE, OVERVIEW_PLOT_FILE, plot_change_points, plot_onset_zoom, plot_overview,
};
use crate::report::{RunSummary, save_results_csv, save_summary_json};
use log::{info, warn};
use onsett_core::{OnsetError, SensorSeries};
use onsett_pipeline::{OnsetReport, PipelineSpec};
use std::fs;
use std::path::{Path, PathBuf};

pub const RESULTS_FILE: &str = "DATA1_onset_temperatures.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// What the reporting sink writes and keeps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    pub plots: bool,
    /// Keep the staging directory next to the archive.
    pub keep_files: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            plots: true,
            keep_files: false,
        }
    }
}

/// Where the artifacts of one run ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSummary {
    pub archive: PathBuf,
    /// Archive entry names.
    pub artifacts: Vec<String>,
    /// Present only when the staging directory was kept.
    pub staging_dir: Option<PathBuf>,
}

fn input_stem(input: &Path) -> Result<String, OnsetError> {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            OnsetError::invalid_input(format!(
                "cannot derive an output name from {}",
                input.display()
            ))
        })
}

fn write_artifacts(
    staging: &Path,
    input: &Path,
    archive: &Path,
    series: &SensorSeries,
    spec: &PipelineSpec,
    report: &OnsetReport,
    plots: bool,
) -> Result<Vec<PathBuf>, StorageError> {
    let mut written = Vec::new();

    let results = staging.join(RESULTS_FILE);
    save_results_csv(&results, &report.events)?;
    written.push(results);

    let mut summary = RunSummary::new(input, series.len(), spec, report);
    summary.archive = Some(archive.display().to_string());
    let summary_path = staging.join(SUMMARY_FILE);
    save_summary_json(&summary_path, &summary)?;
    written.push(summary_path);

    if plots {
        let overview = staging.join(OVERVIEW_PLOT_FILE);
        plot_overview(&overview, series)?;
        written.push(overview);

        let change_points = staging.join(CHANGE_POINT_PLOT_FILE);
        plot_change_points(&change_points, series, report)?;
        written.push(change_points);

        let pages = plot_onset_zoom(staging, series, &report.events, spec.window.half_width)?;
        if pages.is_empty() {
            info!("no onset events, skipping zoom plot");
        }
        written.extend(pages);
    }
    Ok(written)
}

fn discard_staging(staging: &Path) {
    if let Err(err) = fs::remove_dir_all(staging) {
        warn!("could not remove staging directory {}: {err}", staging.display());
    }
}

/// Writes the result table, summary and plots for one input into a fresh
/// staging directory named after the input stem, then zips them into
/// `<stem>.zip`.
///
/// An existing `<stem>` directory is never reused: the call fails with an
/// I/O error and leaves it untouched. Only files written by this call end
/// up in the archive. On failure the staging directory is removed.
pub fn write_outputs(
    input: &Path,
    series: &SensorSeries,
    spec: &PipelineSpec,
    report: &OnsetReport,
    options: &OutputOptions,
) -> Result<OutputSummary, StorageError> {
    let stem = input_stem(input)?;
    let staging = options.output_dir.join(&stem);
    let archive = options.output_dir.join(format!("{stem}.zip"));

    fs::create_dir_all(&options.output_dir)
        .map_err(|err| StorageError::io(&options.output_dir, err))?;
    fs::create_dir(&staging).map_err(|err| StorageError::io(&staging, err))?;

    let packaged = write_artifacts(&staging, input, &archive, series, spec, report, options.plots)
        .and_then(|written| zip_files(&written, &archive));
    let artifacts = match packaged {
        Ok(artifacts) => artifacts,
        Err(err) => {
            discard_staging(&staging);
            return Err(err);
        }
    };

    let staging_dir = if options.keep_files {
        Some(staging)
    } else {
        discard_staging(&staging);
        None
    };

    info!("stored {} artifacts in {}", artifacts.len(), archive.display());
    Ok(OutputSummary {
        archive,
        artifacts,
        staging_dir,
    })
}
