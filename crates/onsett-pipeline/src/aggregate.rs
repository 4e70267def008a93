// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::localize::LocalizedOnset;
use onsett_core::{OnsetError, OnsetEvent, SensorSeries};

/// Builds full-precision onset events from localized samples, in input order.
pub fn aggregate_events(
    series: &SensorSeries,
    onsets: &[LocalizedOnset],
) -> Result<Vec<OnsetEvent>, OnsetError> {
    let temperature = series.temperature();
    let elapsed = series.elapsed_seconds();

    onsets
        .iter()
        .map(|onset| {
            let idx = onset.sample_index;
            match (temperature.get(idx), elapsed.get(idx)) {
                (Some(&celsius), Some(&seconds)) => Ok(OnsetEvent::new(
                    onset.change_point_index,
                    idx,
                    celsius,
                    seconds,
                )),
                _ => Err(OnsetError::invalid_input(format!(
                    "onset sample index {idx} is outside the series (n={})",
                    series.len()
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::aggregate_events;
    use crate::localize::LocalizedOnset;
    use onsett_core::{KELVIN_OFFSET, REPORT_DECIMALS, SensorSeries};

    fn series() -> SensorSeries {
        SensorSeries::new(
            vec![40.0, 39.0, 30.0, 25.0],
            vec![1.5, 1.55, 2.346, 7.0],
            vec![0.0, 60.0, 150.0, 180.0],
        )
        .expect("series")
    }

    #[test]
    fn maps_samples_to_events() {
        let onsets = [
            LocalizedOnset {
                change_point_index: 3,
                sample_index: 2,
            },
            LocalizedOnset {
                change_point_index: 1,
                sample_index: 1,
            },
        ];
        let events = aggregate_events(&series(), &onsets).expect("aggregate");

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].change_point_index, 3);
        assert_eq!(events[0].sample_index, 2);
        assert_eq!(events[0].onset_temperature_c, 2.346);
        assert_eq!(events[0].onset_temperature_k, 2.346 + KELVIN_OFFSET);
        assert_eq!(events[0].onset_time_min, 2.5);

        let rounded = events[0].rounded(REPORT_DECIMALS);
        assert_eq!(rounded.onset_temperature_c, 2.35);
        assert_eq!(rounded.onset_temperature_k, 275.5);

        assert_eq!(events[1].onset_time_min, 1.0);
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(aggregate_events(&series(), &[]).expect("aggregate").is_empty());
    }

    #[test]
    fn out_of_range_sample_is_rejected() {
        let onsets = [LocalizedOnset {
            change_point_index: 9,
            sample_index: 9,
        }];
        assert!(aggregate_events(&series(), &onsets).is_err());
    }
}
