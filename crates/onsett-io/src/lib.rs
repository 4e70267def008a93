// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Reading instrument sensor logs and writing onset results: result
//! tables, JSON summaries, diagnostic plots and the zipped bundle.

pub mod archive;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod plots;
pub mod report;
pub mod schema;
pub mod sink;

pub use archive::zip_files;
pub use discovery::discover_inputs;
pub use error::StorageError;
pub use loader::{load_series, parse_series};
pub use plots::{plot_change_points, plot_onset_zoom, plot_overview, zoom_pages};
pub use report::{
    ResultRow, RunSummary, render_event_table, render_table, result_rows, save_results_csv,
    save_summary_json, write_results_csv,
};
pub use schema::{ColumnSchema, pressure_sensor_column, temperature_sensor_column};
pub use sink::{OutputOptions, OutputSummary, RESULTS_FILE, SUMMARY_FILE, write_outputs};
