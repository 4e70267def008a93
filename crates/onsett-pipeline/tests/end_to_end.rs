// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use onsett_core::{OnsetWindow, PressureBand, REPORT_DECIMALS, SensorSeries};
use onsett_pipeline::{PipelineSpec, execute_pipeline};

const N: usize = 1_000;
const DROP_START: usize = 500;
const TEMPERATURE_JUMP_AT: usize = 503;

/// 40 bar until sample 500, linear fall to 25 bar over five samples, then
/// flat. Temperature cools slowly and jumps by 3 degC at sample 503.
fn hydrate_run() -> SensorSeries {
    let pressure: Vec<f64> = (0..N)
        .map(|i| {
            if i < DROP_START {
                40.0
            } else if i < DROP_START + 5 {
                37.0 - 3.0 * (i - DROP_START) as f64
            } else {
                25.0
            }
        })
        .collect();
    let temperature: Vec<f64> = (0..N)
        .map(|i| {
            let drift = 2.0 - 0.001 * i as f64;
            if i < TEMPERATURE_JUMP_AT { drift } else { drift + 3.0 }
        })
        .collect();
    let elapsed_seconds: Vec<f64> = (0..N).map(|i| 60.0 * i as f64).collect();
    SensorSeries::new(pressure, temperature, elapsed_seconds).expect("synthetic run is valid")
}

fn spec(band: PressureBand, half_width: usize) -> PipelineSpec {
    PipelineSpec {
        band,
        window: OnsetWindow { half_width },
        ..PipelineSpec::default()
    }
}

#[test]
fn pressure_drop_yields_single_onset_before_temperature_jump() {
    let series = hydrate_run();
    let report = execute_pipeline(&series, &spec(PressureBand::new(20.0, 34.0).expect("band"), 20))
        .expect("pipeline should succeed");

    assert_eq!(report.change_points, vec![500, 505]);
    assert!(!report.change_points.contains(&N));
    assert_eq!(report.retained, vec![505]);
    assert_eq!(report.events.len(), 1);

    let event = report.events[0];
    assert_eq!(event.change_point_index, 505);
    assert_eq!(event.sample_index, 502);
    assert_eq!(event.onset_temperature_c, series.temperature()[502]);
    assert_eq!(event.onset_time_min, 502.0);

    let rounded = event.rounded(REPORT_DECIMALS);
    assert_eq!(rounded.onset_temperature_c, 1.5);
    assert_eq!(rounded.onset_temperature_k, 274.65);
    assert_eq!(rounded.onset_time_min, 502.0);

    let beta = report.diagnostics.penalty_beta.expect("beta recorded");
    assert_eq!(beta, 1400.0);
    assert_eq!(report.diagnostics.n, N);
}

#[test]
fn band_below_every_change_point_yields_no_events() {
    let series = hydrate_run();
    let report = execute_pipeline(&series, &spec(PressureBand::new(0.0, 5.0).expect("band"), 20))
        .expect("empty band result is not an error");

    assert_eq!(report.change_points, vec![500, 505]);
    assert!(report.retained.is_empty());
    assert!(report.events.is_empty());
}

#[test]
fn widening_the_band_keeps_both_change_points() {
    let series = hydrate_run();
    let report = execute_pipeline(&series, &spec(PressureBand::new(20.0, 40.0).expect("band"), 20))
        .expect("pipeline should succeed");

    assert_eq!(report.retained, vec![500, 505]);
    let samples: Vec<usize> = report.events.iter().map(|e| e.sample_index).collect();
    assert_eq!(samples, vec![502, 502]);
}

#[test]
fn window_that_cannot_reach_the_jump_picks_another_sample() {
    let series = hydrate_run();
    let report = execute_pipeline(&series, &spec(PressureBand::default(), 1))
        .expect("pipeline should succeed");

    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].sample_index, 504);
}

#[test]
fn report_serializes_to_json() {
    let series = hydrate_run();
    let report = execute_pipeline(&series, &PipelineSpec::default()).expect("pipeline");
    let encoded = serde_json::to_value(&report).expect("report should serialize");

    assert_eq!(encoded["retained"], serde_json::json!([505]));
    assert_eq!(encoded["events"][0]["sample_index"], serde_json::json!(502));
    assert_eq!(encoded["diagnostics"]["algorithm"], serde_json::json!("pelt"));
}
