use super::serialization::ensure_parent_dir;
use crate::domain::{DbdError, DbdResult};
use crate::model::{Evaluation, SweepPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One row of the bench measurement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub timestamp: DateTime<Utc>,
    pub peak_voltage_kv: f64,
    pub frequency_hz: f64,
    pub humidity_pct: f64,
    pub temperature_c: f64,
    pub power_w: f64,
    pub hydroxyl_ppm: f64,
    pub ozone_ppm: f64,
}

impl MeasurementRecord {
    pub fn from_evaluation(evaluation: &Evaluation, timestamp: DateTime<Utc>) -> Self {
        let op = &evaluation.parameters.operating;
        Self {
            timestamp,
            peak_voltage_kv: op.peak_voltage_kv,
            frequency_hz: op.frequency_hz,
            humidity_pct: op.humidity_pct,
            temperature_c: op.temperature_c,
            power_w: evaluation.active_power_w,
            hydroxyl_ppm: evaluation.hydroxyl_ppm,
            ozone_ppm: evaluation.ozone_ppm,
        }
    }
}

fn csv_error(path: &Path, source: impl std::fmt::Display) -> DbdError {
    DbdError::io_system(
        "IO.CSV",
        format!("CSV operation on '{}' failed: {}", path.display(), source),
    )
}

pub fn write_sweep_csv<W: Write>(writer: W, points: &[SweepPoint]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_sweep_file(path: &Path, points: &[SweepPoint]) -> DbdResult<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|source| csv_error(path, source))?;
    write_sweep_csv(file, points).map_err(|source| csv_error(path, source))?;
    tracing::info!(path = %path.display(), rows = points.len(), "wrote sweep table");
    Ok(())
}

/// Appends to the log, writing the header row only when the file is new or
/// empty.
pub fn append_measurement(path: &Path, record: &MeasurementRecord) -> DbdResult<()> {
    ensure_parent_dir(path)?;
    let needs_header = path
        .metadata()
        .map(|metadata| metadata.len() == 0)
        .unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| csv_error(path, source))?;
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    csv_writer
        .serialize(record)
        .map_err(|source| csv_error(path, source))?;
    csv_writer.flush().map_err(|source| csv_error(path, source))?;
    Ok(())
}

pub fn read_measurements(path: &Path) -> DbdResult<Vec<MeasurementRecord>> {
    let mut csv_reader = csv::Reader::from_path(path).map_err(|source| csv_error(path, source))?;
    csv_reader
        .deserialize()
        .collect::<Result<Vec<MeasurementRecord>, _>>()
        .map_err(|source| csv_error(path, source))
}

#[cfg(test)]
mod tests {
    use super::{MeasurementRecord, append_measurement, read_measurements, write_sweep_csv};
    use crate::domain::ReactorParameters;
    use crate::model::{SweepPoint, evaluate};
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn sweep_table_has_named_columns() {
        let points = [SweepPoint {
            peak_voltage_kv: 20.0,
            power_w: 500.0,
            hydroxyl_ppm: 12.5,
            ozone_ppm: 1.25,
        }];
        let mut buffer = Vec::new();
        write_sweep_csv(&mut buffer, &points).expect("sweep should serialize");

        let text = String::from_utf8(buffer).expect("csv is utf-8");
        assert_eq!(
            text,
            "peak_voltage_kv,power_w,hydroxyl_ppm,ozone_ppm\n20.0,500.0,12.5,1.25\n"
        );
    }

    #[test]
    fn measurement_log_appends_with_single_header() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("logs/measurements.csv");
        let evaluation = evaluate(&ReactorParameters::default()).expect("defaults evaluate");

        let first = MeasurementRecord::from_evaluation(
            &evaluation,
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        );
        let second = MeasurementRecord {
            timestamp: Utc
                .with_ymd_and_hms(2026, 3, 2, 9, 0, 2)
                .single()
                .expect("valid timestamp"),
            ..first.clone()
        };
        append_measurement(&path, &first).expect("first append");
        append_measurement(&path, &second).expect("second append");

        let content = fs::read_to_string(&path).expect("log should be readable");
        assert_eq!(content.matches("timestamp").count(), 1);

        let records = read_measurements(&path).expect("log should parse");
        assert_eq!(records, vec![first, second]);
    }
}
