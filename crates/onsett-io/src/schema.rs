// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use onsett_core::OnsetError;
use serde::{Deserialize, Serialize};

/// Column holding elapsed seconds in instrument exports.
pub const TIME_COLUMN: usize = 1;
/// Pressure sensor `p` is stored in column `p + PRESSURE_COLUMN_OFFSET`.
pub const PRESSURE_COLUMN_OFFSET: usize = 1;
/// Temperature sensor `t` is stored in column `t + TEMPERATURE_COLUMN_OFFSET`.
pub const TEMPERATURE_COLUMN_OFFSET: usize = 3;
/// Metadata line, column names and units line precede the data.
pub const DEFAULT_HEADER_ROWS: usize = 3;
/// Instruments log temperature in tenths of a degree Celsius.
pub const DEFAULT_TEMPERATURE_SCALE: f64 = 10.0;

pub const PRESSURE_SENSORS: std::ops::RangeInclusive<usize> = 1..=2;
pub const TEMPERATURE_SENSORS: std::ops::RangeInclusive<usize> = 1..=4;

/// Column holding pressure sensor `sensor` (1-based).
pub fn pressure_sensor_column(sensor: usize) -> Result<usize, OnsetError> {
    if !PRESSURE_SENSORS.contains(&sensor) {
        return Err(OnsetError::schema_mismatch(format!(
            "pressure sensor must be in {}..={}; got {sensor}",
            PRESSURE_SENSORS.start(),
            PRESSURE_SENSORS.end()
        )));
    }
    Ok(sensor + PRESSURE_COLUMN_OFFSET)
}

/// Column holding temperature sensor `sensor` (1-based).
pub fn temperature_sensor_column(sensor: usize) -> Result<usize, OnsetError> {
    if !TEMPERATURE_SENSORS.contains(&sensor) {
        return Err(OnsetError::schema_mismatch(format!(
            "temperature sensor must be in {}..={}; got {sensor}",
            TEMPERATURE_SENSORS.start(),
            TEMPERATURE_SENSORS.end()
        )));
    }
    Ok(sensor + TEMPERATURE_COLUMN_OFFSET)
}

/// Positional layout of a sensor log, with 0-based column indices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub time_column: usize,
    pub pressure_column: usize,
    pub temperature_column: usize,
    /// Leading non-blank records skipped before the first data row.
    pub header_rows: usize,
    /// Raw temperature readings are divided by this to get degrees Celsius.
    pub temperature_scale: f64,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            time_column: TIME_COLUMN,
            pressure_column: 1 + PRESSURE_COLUMN_OFFSET,
            temperature_column: 1 + TEMPERATURE_COLUMN_OFFSET,
            header_rows: DEFAULT_HEADER_ROWS,
            temperature_scale: DEFAULT_TEMPERATURE_SCALE,
        }
    }
}

impl ColumnSchema {
    /// Layout of the instrument export for the chosen sensor numbers.
    pub fn for_sensors(pressure_sensor: usize, temperature_sensor: usize) -> Result<Self, OnsetError> {
        Ok(Self {
            pressure_column: pressure_sensor_column(pressure_sensor)?,
            temperature_column: temperature_sensor_column(temperature_sensor)?,
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), OnsetError> {
        if !self.temperature_scale.is_finite() || self.temperature_scale <= 0.0 {
            return Err(OnsetError::schema_mismatch(format!(
                "temperature_scale must be finite and > 0.0; got {}",
                self.temperature_scale
            )));
        }

        let columns = [
            ("time", self.time_column),
            ("pressure", self.pressure_column),
            ("temperature", self.temperature_column),
        ];
        for (i, (name_a, col_a)) in columns.iter().enumerate() {
            for (name_b, col_b) in &columns[i + 1..] {
                if col_a == col_b {
                    return Err(OnsetError::schema_mismatch(format!(
                        "{name_a} and {name_b} both map to column {col_a}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Minimum number of fields a data row must have.
    pub fn required_width(&self) -> usize {
        self.time_column
            .max(self.pressure_column)
            .max(self.temperature_column)
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnSchema;
    use onsett_core::OnsetError;

    #[test]
    fn default_layout_matches_sensor_one_one() {
        let schema = ColumnSchema::for_sensors(1, 1).expect("schema");
        assert_eq!(schema, ColumnSchema::default());
        assert_eq!(schema.time_column, 1);
        assert_eq!(schema.pressure_column, 2);
        assert_eq!(schema.temperature_column, 4);
        assert_eq!(schema.header_rows, 3);
        assert_eq!(schema.temperature_scale, 10.0);
        assert_eq!(schema.required_width(), 5);
    }

    #[test]
    fn sensor_numbers_select_columns() {
        let schema = ColumnSchema::for_sensors(2, 4).expect("schema");
        assert_eq!(schema.pressure_column, 3);
        assert_eq!(schema.temperature_column, 7);
        assert_eq!(schema.required_width(), 8);
    }

    #[test]
    fn out_of_range_sensors_are_schema_mismatches() {
        for (p, t) in [(0, 1), (3, 1), (1, 0), (1, 5)] {
            let err = ColumnSchema::for_sensors(p, t).expect_err("out of range");
            assert!(matches!(err, OnsetError::SchemaMismatch(_)), "({p}, {t})");
        }
    }

    #[test]
    fn validation_rejects_overlaps_and_bad_scale() {
        let schema = ColumnSchema {
            pressure_column: 1,
            ..ColumnSchema::default()
        };
        let err = schema.validate().expect_err("time and pressure overlap");
        assert!(err.to_string().contains("column 1"));

        let schema = ColumnSchema {
            temperature_scale: 0.0,
            ..ColumnSchema::default()
        };
        assert!(schema.validate().is_err());

        ColumnSchema::default().validate().expect("default is valid");
    }
}
