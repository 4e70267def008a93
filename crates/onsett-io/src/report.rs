// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::StorageError;
use onsett_core::{Diagnostics, OnsetEvent, REPORT_DECIMALS, RoundedOnsetEvent};
use onsett_pipeline::{OnsetReport, PipelineSpec};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One line of the onset result table, values rounded for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// 1-based event number.
    pub event: usize,
    pub onset_temperature_c: f64,
    pub onset_temperature_k: f64,
    pub onset_time_min: f64,
    pub sample_index: usize,
    pub change_point_index: usize,
}

impl ResultRow {
    pub fn from_event(event_number: usize, event: &OnsetEvent) -> Self {
        let rounded = event.rounded(REPORT_DECIMALS);
        Self {
            event: event_number,
            onset_temperature_c: rounded.onset_temperature_c,
            onset_temperature_k: rounded.onset_temperature_k,
            onset_time_min: rounded.onset_time_min,
            sample_index: rounded.sample_index,
            change_point_index: rounded.change_point_index,
        }
    }
}

pub fn result_rows(events: &[OnsetEvent]) -> Vec<ResultRow> {
    events
        .iter()
        .enumerate()
        .map(|(idx, event)| ResultRow::from_event(idx + 1, event))
        .collect()
}

/// Writes the result table as CSV with a header row, even when empty.
pub fn write_results_csv<W: Write>(writer: W, events: &[OnsetEvent]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record([
        "event",
        "onset_temperature_c",
        "onset_temperature_k",
        "onset_time_min",
        "sample_index",
        "change_point_index",
    ])?;
    for row in result_rows(events) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn save_results_csv(path: &Path, events: &[OnsetEvent]) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|err| StorageError::io(path, err))?;
    write_results_csv(file, events).map_err(|err| StorageError::csv(path, err))
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (width, cell) in widths.iter().zip(cells) {
        let pad = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line
}

/// Renders a boxed plain-text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };
    let mut out = vec![border.clone()];
    out.push(render_row(&widths, headers.iter().copied()));
    out.push(border.clone());
    for row in rows {
        out.push(render_row(&widths, row.iter().map(String::as_str)));
    }
    out.push(border);
    out.join("\n")
}

/// Console table of onset events.
pub fn render_event_table(events: &[OnsetEvent]) -> String {
    let rows: Vec<Vec<String>> = result_rows(events)
        .iter()
        .map(|row| {
            vec![
                row.event.to_string(),
                format!("{:.2}", row.onset_temperature_c),
                format!("{:.2}", row.onset_temperature_k),
                format!("{:.2}", row.onset_time_min),
                row.sample_index.to_string(),
                row.change_point_index.to_string(),
            ]
        })
        .collect();
    render_table(
        &[
            "Event",
            "Onset T (degC)",
            "Onset T (K)",
            "Onset time (min)",
            "Sample",
            "Change point",
        ],
        &rows,
    )
}

/// Machine-readable summary of one processed file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub input: String,
    pub samples: usize,
    pub pipeline: PipelineSpec,
    pub change_points: Vec<usize>,
    pub retained: Vec<usize>,
    pub onsets: Vec<RoundedOnsetEvent>,
    pub diagnostics: Diagnostics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
}

impl RunSummary {
    pub fn new(input: &Path, samples: usize, pipeline: &PipelineSpec, report: &OnsetReport) -> Self {
        Self {
            input: input.display().to_string(),
            samples,
            pipeline: pipeline.clone(),
            change_points: report.change_points.clone(),
            retained: report.retained.clone(),
            onsets: report
                .events
                .iter()
                .map(|event| event.rounded(REPORT_DECIMALS))
                .collect(),
            diagnostics: report.diagnostics.clone(),
            archive: None,
        }
    }
}

pub fn save_summary_json(path: &Path, summary: &RunSummary) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|err| StorageError::io(path, err))?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RunSummary, render_event_table, render_table, result_rows, write_results_csv};
    use onsett_core::{Diagnostics, OnsetEvent};
    use onsett_pipeline::{OnsetReport, PipelineSpec};
    use std::path::Path;

    fn events() -> Vec<OnsetEvent> {
        vec![
            OnsetEvent::new(505, 502, 1.498, 30_120.0),
            OnsetEvent::new(900, 880, -0.126, 52_830.0),
        ]
    }

    #[test]
    fn rows_are_numbered_and_rounded() {
        let rows = result_rows(&events());
        assert_eq!(rows[0].event, 1);
        assert_eq!(rows[0].onset_temperature_c, 1.5);
        assert_eq!(rows[0].onset_temperature_k, 274.65);
        assert_eq!(rows[0].onset_time_min, 502.0);
        assert_eq!(rows[1].event, 2);
        assert_eq!(rows[1].onset_temperature_c, -0.13);
        assert_eq!(rows[1].onset_time_min, 880.5);
    }

    #[test]
    fn csv_has_fixed_header_and_one_line_per_event() {
        let mut out = Vec::new();
        write_results_csv(&mut out, &events()).expect("write csv");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "event,onset_temperature_c,onset_temperature_k,onset_time_min,sample_index,change_point_index"
        );
        assert_eq!(lines[1], "1,1.5,274.65,502.0,502,505");
        assert_eq!(lines.len(), 3);

        let mut empty = Vec::new();
        write_results_csv(&mut empty, &[]).expect("write empty csv");
        assert_eq!(String::from_utf8(empty).expect("utf8").lines().count(), 1);
    }

    #[test]
    fn table_columns_are_aligned() {
        let table = render_table(
            &["No", "File"],
            &[
                vec!["0".to_string(), "a.csv".to_string()],
                vec!["10".to_string(), "longer_name.csv".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
        assert_eq!(lines[1], "| No | File            |");
        assert_eq!(lines[3], "| 0  | a.csv           |");
    }

    #[test]
    fn event_table_lists_each_event() {
        let table = render_event_table(&events());
        assert!(table.contains("Onset T (degC)"));
        assert!(table.contains("| 1.50 "));
        assert!(table.contains("274.65"));
        assert_eq!(table.lines().count(), 6);
    }

    #[test]
    fn summary_roundtrips_through_json() {
        let report = OnsetReport {
            change_points: vec![500, 505],
            retained: vec![505],
            events: events()[..1].to_vec(),
            diagnostics: Diagnostics::default(),
        };
        let summary = RunSummary::new(Path::new("run.csv"), 1_000, &PipelineSpec::default(), &report);
        assert_eq!(summary.onsets[0].onset_temperature_c, 1.5);

        let encoded = serde_json::to_string(&summary).expect("serialize");
        assert!(!encoded.contains("archive"));
        let decoded: RunSummary = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, summary);
    }
}
