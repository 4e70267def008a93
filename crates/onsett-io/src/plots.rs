// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::StorageError;
use log::debug;
use onsett_core::{OnsetEvent, REPORT_DECIMALS, SensorSeries, round_to};
use onsett_pipeline::OnsetReport;
use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::drawing::IntoDrawingArea;
use plotters::element::{Circle, PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};
use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const OVERVIEW_PLOT_FILE: &str = "PLOT1_pressure_temperature_vs_time.png";
pub const CHANGE_POINT_PLOT_FILE: &str = "PLOT2_change_points.png";

pub const PLOT_WIDTH: u32 = 1600;
pub const PLOT_HEIGHT: u32 = 1000;
pub const ZOOM_PLOT_WIDTH: u32 = 1600;
pub const ZOOM_PLOT_HEIGHT: u32 = 1200;

pub const ZOOM_GRID_ROWS: usize = 3;
pub const ZOOM_GRID_COLS: usize = 3;
pub const EVENTS_PER_ZOOM_PAGE: usize = ZOOM_GRID_ROWS * ZOOM_GRID_COLS;
/// Padding around each zoom window.
pub const ZOOM_TIME_PAD_MIN: f64 = 10.0;
pub const ZOOM_TEMPERATURE_PAD_C: f64 = 3.0;

const COLOR_PRESSURE: RGBColor = RGBColor(214, 39, 40);
const COLOR_TEMPERATURE: RGBColor = RGBColor(255, 127, 14);
const COLOR_CHANGE_POINT: RGBColor = RGBColor(128, 0, 128);
const COLOR_PRESSURE_LABEL: RGBColor = RGBColor(31, 119, 180);
const COLOR_ONSET: RGBColor = RGBColor(0, 0, 0);
const LINE_WIDTH_PLOT: u32 = 2;
const LINE_WIDTH_LEGEND: u32 = 3;

/// Splits `event_count` events into pages of at most nine.
pub fn zoom_pages(event_count: usize) -> Vec<Range<usize>> {
    (0..event_count)
        .step_by(EVENTS_PER_ZOOM_PAGE)
        .map(|start| start..(start + EVENTS_PER_ZOOM_PAGE).min(event_count))
        .collect()
}

pub fn zoom_plot_file_name(page: usize) -> String {
    if page == 0 {
        "PLOT3_onset_zoom.png".to_string()
    } else {
        format!("PLOT3_onset_zoom_{}.png", page + 1)
    }
}

/// Value range with 15% padding, or +-0.5 for flat data.
pub fn padded_range(values: &[f64]) -> Range<f64> {
    let (min_val, max_val) = min_max(values).unwrap_or((0.0, 1.0));
    let span = max_val - min_val;
    let padding = if span < 1e-6 { 0.5 } else { span * 0.15 };
    (min_val - padding)..(max_val + padding)
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().copied().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn time_range(minutes: &[f64]) -> Range<f64> {
    match min_max(minutes) {
        Some((lo, hi)) if hi > lo => lo..hi,
        Some((lo, _)) => (lo - 1.0)..(lo + 1.0),
        None => 0.0..1.0,
    }
}

/// Pressure and temperature against time, optionally with change-point and
/// onset markers.
fn draw_time_series(
    path: &Path,
    series: &SensorSeries,
    report: Option<&OnsetReport>,
) -> Result<(), Box<dyn Error>> {
    let minutes = series.elapsed_minutes_all();
    let pressure = series.pressure();
    let temperature = series.temperature();

    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = if report.is_some() {
        "Pressure and temperature with change points"
    } else {
        "Pressure and temperature vs time"
    };
    let x_range = time_range(&minutes);
    let p_range = padded_range(pressure);
    let t_range = padded_range(temperature);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .right_y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), p_range.clone())?
        .set_secondary_coord(x_range, t_range);

    chart
        .configure_mesh()
        .x_desc("Time (min)")
        .y_desc("Pressure (bar)")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 14))
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("Temperature (°C)")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 14))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            minutes.iter().copied().zip(pressure.iter().copied()),
            COLOR_PRESSURE.stroke_width(LINE_WIDTH_PLOT),
        ))?
        .label("Pressure")
        .legend(|(x, y)| {
            PathElement::new(
                vec![(x, y), (x + 20, y)],
                COLOR_PRESSURE.stroke_width(LINE_WIDTH_LEGEND),
            )
        });
    chart
        .draw_secondary_series(LineSeries::new(
            minutes.iter().copied().zip(temperature.iter().copied()),
            COLOR_TEMPERATURE.stroke_width(LINE_WIDTH_PLOT),
        ))?
        .label("Temperature")
        .legend(|(x, y)| {
            PathElement::new(
                vec![(x, y), (x + 20, y)],
                COLOR_TEMPERATURE.stroke_width(LINE_WIDTH_LEGEND),
            )
        });

    if let Some(report) = report {
        let retained: Vec<(f64, f64)> = report
            .retained
            .iter()
            .filter_map(|&cp| Some((*minutes.get(cp)?, *pressure.get(cp)?)))
            .collect();

        chart
            .draw_series(retained.iter().map(|&(x, _)| {
                PathElement::new(
                    vec![(x, p_range.start), (x, p_range.end)],
                    COLOR_CHANGE_POINT.stroke_width(LINE_WIDTH_PLOT),
                )
            }))?
            .label("Change point")
            .legend(|(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 20, y)],
                    COLOR_CHANGE_POINT.stroke_width(LINE_WIDTH_LEGEND),
                )
            });
        chart.draw_series(retained.iter().map(|&(x, p)| {
            Text::new(
                format!("{:.2} bar", round_to(p, REPORT_DECIMALS)),
                (x, p),
                ("sans-serif", 16).into_font().color(&COLOR_PRESSURE_LABEL),
            )
        }))?;
        chart.draw_series(retained.iter().map(|&(x, _)| {
            Text::new(
                format!("{x:.2} min"),
                (x, p_range.start),
                ("sans-serif", 14).into_font().color(&COLOR_CHANGE_POINT),
            )
        }))?;

        let onsets: Vec<(f64, f64)> = report
            .events
            .iter()
            .filter_map(|e| Some((*minutes.get(e.sample_index)?, e.onset_temperature_c)))
            .collect();
        chart.draw_secondary_series(
            onsets
                .iter()
                .map(|&point| Circle::new(point, 5, COLOR_ONSET.filled())),
        )?;
        chart.draw_secondary_series(onsets.iter().map(|&(x, t)| {
            Text::new(
                format!("{:.2} °C", round_to(t, REPORT_DECIMALS)),
                (x, t),
                ("sans-serif", 16).into_font().color(&COLOR_TEMPERATURE),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_zoom_page(
    path: &Path,
    series: &SensorSeries,
    events: &[OnsetEvent],
    first_event_number: usize,
    half_width: usize,
) -> Result<(), Box<dyn Error>> {
    let minutes = series.elapsed_minutes_all();
    let temperature = series.temperature();
    let last = series.len() - 1;

    let root = BitMapBackend::new(path, (ZOOM_PLOT_WIDTH, ZOOM_PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Obtained onset temperatures", ("sans-serif", 30).into_font())?;
    let cells = root.split_evenly((ZOOM_GRID_ROWS, ZOOM_GRID_COLS));

    for (offset, (event, cell)) in events.iter().zip(cells.iter()).enumerate() {
        let idx = event.sample_index.min(last);
        let lo = idx.saturating_sub(half_width);
        let hi = (idx + half_width).min(last);

        let (t_lo, t_hi) = min_max(&minutes[lo..=hi]).unwrap_or((0.0, 0.0));
        let (y_lo, y_hi) = min_max(&temperature[lo..=hi]).unwrap_or((0.0, 0.0));
        let x_range = (t_lo - ZOOM_TIME_PAD_MIN)..(t_hi + ZOOM_TIME_PAD_MIN);
        let y_range = (y_lo - ZOOM_TEMPERATURE_PAD_C)..(y_hi + ZOOM_TEMPERATURE_PAD_C);

        let mut chart = ChartBuilder::on(cell)
            .caption(
                format!("Onset temperature {}", first_event_number + offset),
                ("sans-serif", 18),
            )
            .margin(8)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.clone(), y_range)?;
        chart
            .configure_mesh()
            .x_desc("Time (min)")
            .y_desc("Temperature (°C)")
            .x_labels(5)
            .y_labels(5)
            .label_style(("sans-serif", 12))
            .draw()?;

        chart.draw_series(LineSeries::new(
            minutes
                .iter()
                .copied()
                .zip(temperature.iter().copied())
                .filter(|(x, _)| x_range.contains(x)),
            COLOR_TEMPERATURE.stroke_width(LINE_WIDTH_PLOT),
        ))?;

        let point = (minutes[idx], event.onset_temperature_c);
        chart.draw_series(std::iter::once(Circle::new(point, 4, COLOR_ONSET.filled())))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.2} °C", round_to(event.onset_temperature_c, REPORT_DECIMALS)),
            point,
            ("sans-serif", 16).into_font().color(&COLOR_TEMPERATURE),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// PLOT1: pressure and temperature against time.
pub fn plot_overview(path: &Path, series: &SensorSeries) -> Result<(), StorageError> {
    draw_time_series(path, series, None).map_err(|err| StorageError::plot(path, err.to_string()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// PLOT2: the overview with retained change points and onset markers.
pub fn plot_change_points(
    path: &Path,
    series: &SensorSeries,
    report: &OnsetReport,
) -> Result<(), StorageError> {
    draw_time_series(path, series, Some(report))
        .map_err(|err| StorageError::plot(path, err.to_string()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// PLOT3: zoomed temperature views, nine events per image. Returns the
/// written files; no events means no files.
pub fn plot_onset_zoom(
    dir: &Path,
    series: &SensorSeries,
    events: &[OnsetEvent],
    half_width: usize,
) -> Result<Vec<PathBuf>, StorageError> {
    let mut written = Vec::new();
    for (page, range) in zoom_pages(events.len()).into_iter().enumerate() {
        let path = dir.join(zoom_plot_file_name(page));
        draw_zoom_page(&path, series, &events[range.clone()], range.start + 1, half_width)
            .map_err(|err| StorageError::plot(&path, err.to_string()))?;
        debug!("wrote {} ({} events)", path.display(), range.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::{
        CHANGE_POINT_PLOT_FILE, OVERVIEW_PLOT_FILE, padded_range, plot_change_points,
        plot_onset_zoom, plot_overview, time_range, zoom_pages, zoom_plot_file_name,
    };
    use onsett_core::{Diagnostics, OnsetEvent, SensorSeries};
    use onsett_pipeline::OnsetReport;
    use std::path::Path;

    fn series() -> SensorSeries {
        let n = 400;
        let pressure = (0..n).map(|i| 40.0 - (i / 40) as f64).collect();
        let temperature = (0..n)
            .map(|i| if i % 40 >= 3 && i >= 40 { 3.0 } else { 1.0 })
            .collect();
        let elapsed = (0..n).map(|i| i as f64 * 30.0).collect();
        SensorSeries::new(pressure, temperature, elapsed).expect("series")
    }

    /// One event per pressure step after the first.
    fn events(series: &SensorSeries, count: usize) -> Vec<OnsetEvent> {
        (1..=count)
            .map(|step| {
                let cp = step * 40;
                let sample = cp + 2;
                OnsetEvent::new(
                    cp,
                    sample,
                    series.temperature()[sample],
                    series.elapsed_seconds()[sample],
                )
            })
            .collect()
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).expect("plot written");
        assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
    }

    #[test]
    fn zoom_pages_hold_at_most_nine_events() {
        assert!(zoom_pages(0).is_empty());
        assert_eq!(zoom_pages(1), vec![0..1]);
        assert_eq!(zoom_pages(9), vec![0..9]);
        assert_eq!(zoom_pages(10), vec![0..9, 9..10]);
        assert_eq!(zoom_pages(20), vec![0..9, 9..18, 18..20]);
    }

    #[test]
    fn zoom_file_names_are_numbered_after_the_first_page() {
        assert_eq!(zoom_plot_file_name(0), "PLOT3_onset_zoom.png");
        assert_eq!(zoom_plot_file_name(1), "PLOT3_onset_zoom_2.png");
    }

    #[test]
    fn ranges_are_padded_and_never_empty() {
        let range = padded_range(&[10.0, 20.0]);
        assert!((range.start - 8.5).abs() < 1e-12);
        assert!((range.end - 21.5).abs() < 1e-12);

        let flat = padded_range(&[3.0, 3.0]);
        assert_eq!(flat, 2.5..3.5);

        assert_eq!(time_range(&[5.0]), 4.0..6.0);
        assert_eq!(time_range(&[0.0, 2.0, 1.0]), 0.0..2.0);
    }

    #[test]
    fn overview_and_change_point_plots_are_rendered() {
        let dir = tempfile::tempdir().expect("plot dir");
        let series = series();
        let events = events(&series, 3);
        let report = OnsetReport {
            change_points: events.iter().map(|e| e.change_point_index).collect(),
            retained: events.iter().map(|e| e.change_point_index).collect(),
            events,
            diagnostics: Diagnostics::default(),
        };

        let overview = dir.path().join(OVERVIEW_PLOT_FILE);
        plot_overview(&overview, &series).expect("overview");
        assert_png(&overview);

        let change_points = dir.path().join(CHANGE_POINT_PLOT_FILE);
        plot_change_points(&change_points, &series, &report).expect("change points");
        assert_png(&change_points);
    }

    #[test]
    fn zoom_plots_paginate_past_nine_events() {
        let dir = tempfile::tempdir().expect("plot dir");
        let series = series();
        let events = events(&series, 9);

        let single = plot_onset_zoom(dir.path(), &series, &events, 20).expect("zoom");
        assert_eq!(single, vec![dir.path().join("PLOT3_onset_zoom.png")]);

        let paged_dir = tempfile::tempdir().expect("plot dir");
        let mut many = events.clone();
        many.push(events[0]);
        let pages = plot_onset_zoom(paged_dir.path(), &series, &many, 20).expect("zoom");
        assert_eq!(
            pages,
            vec![
                paged_dir.path().join("PLOT3_onset_zoom.png"),
                paged_dir.path().join("PLOT3_onset_zoom_2.png"),
            ]
        );
        for page in &pages {
            assert_png(page);
        }
    }

    #[test]
    fn no_events_means_no_zoom_plot() {
        let dir = tempfile::tempdir().expect("plot dir");
        let pages = plot_onset_zoom(dir.path(), &series(), &[], 20).expect("zoom");
        assert!(pages.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 0);
    }
}
