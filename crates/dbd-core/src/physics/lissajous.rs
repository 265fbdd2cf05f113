//! Charge-voltage (Lissajous) figure of a DBD cell.
//!
//! The applied voltage is plotted against the charge transferred through the
//! cell, usually measured as the voltage across a series monitor capacitor.
//! The enclosed area of one period is the energy dissipated per cycle, so the
//! active power is that area times the drive frequency.

use crate::domain::{DbdError, DbdResult};
use serde::Deserialize;
use std::io::Read;

const MIN_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LissajousError {
    #[error("lissajous loop requires at least 3 samples, got {actual}")]
    InsufficientSamples { actual: usize },
    #[error("lissajous trace length mismatch: voltage={voltage}, charge={charge}")]
    LengthMismatch { voltage: usize, charge: usize },
    #[error("lissajous series '{field}' must contain finite values, index {index} got {value}")]
    NonFiniteSample {
        field: &'static str,
        index: usize,
        value: f64,
    },
    #[error("lissajous parameter '{field}' must be finite and > 0, got {value}")]
    NonPositiveParameter { field: &'static str, value: f64 },
}

impl From<LissajousError> for DbdError {
    fn from(error: LissajousError) -> Self {
        DbdError::computation("RUN.LISSAJOUS", error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LissajousTrace {
    voltage_v: Vec<f64>,
    charge_c: Vec<f64>,
}

impl LissajousTrace {
    pub fn new(voltage_v: Vec<f64>, charge_c: Vec<f64>) -> Result<Self, LissajousError> {
        if voltage_v.len() != charge_c.len() {
            return Err(LissajousError::LengthMismatch {
                voltage: voltage_v.len(),
                charge: charge_c.len(),
            });
        }
        if voltage_v.len() < MIN_SAMPLES {
            return Err(LissajousError::InsufficientSamples {
                actual: voltage_v.len(),
            });
        }
        check_finite("voltage_v", &voltage_v)?;
        check_finite("charge_c", &charge_c)?;
        Ok(Self {
            voltage_v,
            charge_c,
        })
    }

    /// Builds the trace from the monitor-capacitor voltage, `Q = C_m * V_m`.
    pub fn from_monitor_capacitor(
        voltage_v: Vec<f64>,
        monitor_voltage_v: &[f64],
        monitor_capacitance_f: f64,
    ) -> Result<Self, LissajousError> {
        if !monitor_capacitance_f.is_finite() || monitor_capacitance_f <= 0.0 {
            return Err(LissajousError::NonPositiveParameter {
                field: "monitor_capacitance_f",
                value: monitor_capacitance_f,
            });
        }
        let charge_c = monitor_voltage_v
            .iter()
            .map(|voltage| voltage * monitor_capacitance_f)
            .collect();
        Self::new(voltage_v, charge_c)
    }

    pub fn len(&self) -> usize {
        self.voltage_v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage_v.is_empty()
    }

    pub fn peak_voltage_v(&self) -> f64 {
        self.voltage_v
            .iter()
            .fold(0.0_f64, |peak, voltage| peak.max(voltage.abs()))
    }

    /// Energy dissipated per cycle (J): the area enclosed by the closed
    /// polygon through the samples, whichever way the loop is traversed.
    pub fn loop_energy_j(&self) -> f64 {
        let count = self.voltage_v.len();
        let mut doubled_area = 0.0;
        for index in 0..count {
            let next = (index + 1) % count;
            doubled_area += self.voltage_v[index] * self.charge_c[next]
                - self.voltage_v[next] * self.charge_c[index];
        }
        0.5 * doubled_area.abs()
    }

    pub fn power_w(&self, frequency_hz: f64) -> Result<f64, LissajousError> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(LissajousError::NonPositiveParameter {
                field: "frequency_hz",
                value: frequency_hz,
            });
        }
        Ok(self.loop_energy_j() * frequency_hz)
    }
}

fn check_finite(field: &'static str, values: &[f64]) -> Result<(), LissajousError> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(LissajousError::NonFiniteSample {
            field,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct TraceRow {
    voltage_v: f64,
    charge_c: Option<f64>,
    monitor_v: Option<f64>,
}

/// Reads one period of an oscilloscope export with a `voltage_v` column and
/// either `charge_c` or `monitor_v`. Other columns (time stamps, channel
/// names) are ignored.
pub fn read_trace_csv<R: Read>(
    reader: R,
    monitor_capacitance_f: Option<f64>,
) -> DbdResult<LissajousTrace> {
    if let Some(capacitance) = monitor_capacitance_f {
        if !capacitance.is_finite() || capacitance <= 0.0 {
            return Err(LissajousError::NonPositiveParameter {
                field: "monitor_capacitance_f",
                value: capacitance,
            }
            .into());
        }
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut voltage_v = Vec::new();
    let mut charge_c = Vec::new();
    for (row_index, row) in csv_reader.deserialize::<TraceRow>().enumerate() {
        let row = row.map_err(|source| {
            DbdError::input_validation(
                "INPUT.LISSAJOUS_CSV",
                format!("invalid lissajous row {}: {}", row_index + 1, source),
            )
        })?;
        let charge = match (row.charge_c, row.monitor_v, monitor_capacitance_f) {
            (Some(charge), _, _) => charge,
            (None, Some(monitor), Some(capacitance)) => monitor * capacitance,
            (None, Some(_), None) => {
                return Err(DbdError::input_validation(
                    "INPUT.LISSAJOUS_MONITOR",
                    "trace carries 'monitor_v' but no monitor capacitance was given",
                ));
            }
            (None, None, _) => {
                return Err(DbdError::input_validation(
                    "INPUT.LISSAJOUS_CSV",
                    format!(
                        "row {} has neither 'charge_c' nor 'monitor_v'",
                        row_index + 1
                    ),
                ));
            }
        };
        voltage_v.push(row.voltage_v);
        charge_c.push(charge);
    }

    Ok(LissajousTrace::new(voltage_v, charge_c)?)
}

#[cfg(test)]
mod tests {
    use super::{LissajousError, LissajousTrace, read_trace_csv};
    use crate::common::constants::PI;

    fn ellipse(samples: usize, voltage_amplitude: f64, charge_amplitude: f64) -> LissajousTrace {
        let (voltage, charge): (Vec<f64>, Vec<f64>) = (0..samples)
            .map(|index| {
                let phase = 2.0 * PI * index as f64 / samples as f64;
                (
                    voltage_amplitude * phase.cos(),
                    charge_amplitude * phase.sin(),
                )
            })
            .unzip();
        LissajousTrace::new(voltage, charge).expect("ellipse should be a valid trace")
    }

    #[test]
    fn ellipse_area_matches_pi_a_b() {
        let trace = ellipse(3_600, 20.0e3, 1.5e-6);
        let expected = PI * 20.0e3 * 1.5e-6;
        let energy = trace.loop_energy_j();
        assert!(
            ((energy - expected) / expected).abs() < 1.0e-5,
            "energy {energy} vs {expected}"
        );
        assert!((trace.peak_voltage_v() - 20.0e3).abs() < 1.0e-9);
    }

    #[test]
    fn parallelogram_energy_is_orientation_independent() {
        let voltage = vec![-10.0, 5.0, 10.0, -5.0];
        let charge = vec![-2.0, -2.0, 2.0, 2.0];
        let forward = LissajousTrace::new(voltage.clone(), charge.clone()).expect("valid trace");
        let reversed = LissajousTrace::new(
            voltage.into_iter().rev().collect(),
            charge.into_iter().rev().collect(),
        )
        .expect("valid trace");

        // base 15 V, height 4 C
        assert!((forward.loop_energy_j() - 60.0).abs() < 1.0e-12);
        assert_eq!(forward.loop_energy_j(), reversed.loop_energy_j());
        assert!((forward.power_w(1_000.0).expect("power") - 60_000.0).abs() < 1.0e-6);
    }

    #[test]
    fn monitor_capacitor_converts_voltage_to_charge() {
        let trace = LissajousTrace::from_monitor_capacitor(
            vec![-10.0, 5.0, 10.0, -5.0],
            &[-2.0, -2.0, 2.0, 2.0],
            1.0e-6,
        )
        .expect("valid monitor trace");
        assert!((trace.loop_energy_j() - 60.0e-6).abs() < 1.0e-15);
    }

    #[test]
    fn rejects_malformed_traces() {
        assert_eq!(
            LissajousTrace::new(vec![1.0, 2.0], vec![1.0, 2.0]),
            Err(LissajousError::InsufficientSamples { actual: 2 })
        );
        assert_eq!(
            LissajousTrace::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0]),
            Err(LissajousError::LengthMismatch {
                voltage: 3,
                charge: 2
            })
        );
        assert!(matches!(
            LissajousTrace::new(vec![1.0, f64::NAN, 3.0], vec![1.0, 2.0, 3.0]),
            Err(LissajousError::NonFiniteSample { index: 1, .. })
        ));
        let trace = ellipse(16, 1.0, 1.0);
        assert!(trace.power_w(0.0).is_err());
    }

    #[test]
    fn csv_reader_accepts_charge_or_monitor_columns() {
        let charge_csv = "time_s, voltage_v, charge_c\n0,-10,-2\n1,5,-2\n2,10,2\n3,-5,2\n";
        let trace = read_trace_csv(charge_csv.as_bytes(), None).expect("charge csv should parse");
        assert_eq!(trace.len(), 4);
        assert!((trace.loop_energy_j() - 60.0).abs() < 1.0e-12);

        let monitor_csv = "voltage_v,monitor_v\n-10,-2\n5,-2\n10,2\n-5,2\n";
        let trace = read_trace_csv(monitor_csv.as_bytes(), Some(0.5))
            .expect("monitor csv should parse");
        assert!((trace.loop_energy_j() - 30.0).abs() < 1.0e-12);

        let error = read_trace_csv(monitor_csv.as_bytes(), None)
            .expect_err("monitor column needs a capacitance");
        assert_eq!(error.placeholder(), "INPUT.LISSAJOUS_MONITOR");
    }
}
