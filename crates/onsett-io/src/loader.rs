// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::StorageError;
use crate::schema::ColumnSchema;
use log::{debug, info};
use onsett_core::{OnsetError, SensorSeries};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads a sensor log from disk.
pub fn load_series(path: &Path, schema: &ColumnSchema) -> Result<SensorSeries, StorageError> {
    let file = File::open(path).map_err(|err| StorageError::io(path, err))?;
    let series = parse_series(BufReader::new(file), schema, path)?;
    info!("loaded {} samples from {}", series.len(), path.display());
    Ok(series)
}

/// Parses a sensor log from any reader; `source` only labels errors.
///
/// Header records are skipped as raw bytes, so exports whose metadata lines
/// use a legacy code page load fine. Blank records are ignored.
pub fn parse_series<R: Read>(
    reader: R,
    schema: &ColumnSchema,
    source: &Path,
) -> Result<SensorSeries, StorageError> {
    schema.validate()?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut pressure = Vec::new();
    let mut temperature = Vec::new();
    let mut elapsed_seconds = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader.byte_records() {
        let record = record.map_err(|err| StorageError::csv(source, err))?;
        if record.iter().all(|field| field.trim_ascii().is_empty()) {
            continue;
        }
        if skipped < schema.header_rows {
            skipped += 1;
            continue;
        }

        let line = record.position().map_or(0, |pos| pos.line());
        if record.len() < schema.required_width() {
            return Err(OnsetError::schema_mismatch(format!(
                "{} line {line}: row has {} columns, schema needs {}",
                source.display(),
                record.len(),
                schema.required_width()
            ))
            .into());
        }

        let cell = |column: usize, name: &str| -> Result<f64, OnsetError> {
            let raw = record.get(column).unwrap_or_default();
            std::str::from_utf8(raw)
                .ok()
                .and_then(|text| text.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    OnsetError::schema_mismatch(format!(
                        "{} line {line}, column {column} ({name}): '{}' is not a finite number",
                        source.display(),
                        String::from_utf8_lossy(raw).trim()
                    ))
                })
        };

        elapsed_seconds.push(cell(schema.time_column, "time")?);
        pressure.push(cell(schema.pressure_column, "pressure")?);
        temperature.push(cell(schema.temperature_column, "temperature")? / schema.temperature_scale);
    }

    if pressure.is_empty() {
        return Err(OnsetError::data_insufficient(format!(
            "{} has no data rows after {} header rows",
            source.display(),
            schema.header_rows
        ))
        .into());
    }

    debug!(
        "parsed {} rows from {} (time={}, pressure={}, temperature={}, scale={})",
        pressure.len(),
        source.display(),
        schema.time_column,
        schema.pressure_column,
        schema.temperature_column,
        schema.temperature_scale
    );

    Ok(SensorSeries::new(pressure, temperature, elapsed_seconds)?)
}
