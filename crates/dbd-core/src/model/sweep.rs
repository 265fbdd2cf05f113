use crate::chemistry::{hydroxyl_ppm, ozone_ppm};
use crate::domain::{DbdError, DbdResult, ReactorParameters};
use crate::physics::{CellCapacitance, active_power_w, threshold_voltage_kv};
use serde::{Deserialize, Serialize};

pub const MAX_SWEEP_POINTS: usize = 100_000;

/// Peak-voltage range of the sensitivity chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoltageSweep {
    pub start_kv: f64,
    pub end_kv: f64,
    pub points: usize,
}

impl Default for VoltageSweep {
    fn default() -> Self {
        Self {
            start_kv: 10.0,
            end_kv: 35.0,
            points: 100,
        }
    }
}

impl VoltageSweep {
    pub fn validate(&self) -> DbdResult<()> {
        if !self.start_kv.is_finite() || !self.end_kv.is_finite() || self.start_kv < 0.0 {
            return Err(DbdError::input_validation(
                "INPUT.SWEEP_RANGE",
                format!(
                    "sweep range must be finite and non-negative, got {}..{} kV",
                    self.start_kv, self.end_kv
                ),
            ));
        }
        if self.end_kv <= self.start_kv {
            return Err(DbdError::input_validation(
                "INPUT.SWEEP_RANGE",
                format!(
                    "sweep end {} kV must exceed start {} kV",
                    self.end_kv, self.start_kv
                ),
            ));
        }
        if !(2..=MAX_SWEEP_POINTS).contains(&self.points) {
            return Err(DbdError::input_validation(
                "INPUT.SWEEP_POINTS",
                format!(
                    "sweep needs 2..={MAX_SWEEP_POINTS} points, got {}",
                    self.points
                ),
            ));
        }
        Ok(())
    }

    /// Evenly spaced peak voltages, both ends included.
    pub fn voltages(&self) -> Vec<f64> {
        let step = (self.end_kv - self.start_kv) / (self.points - 1) as f64;
        (0..self.points)
            .map(|index| {
                if index + 1 == self.points {
                    self.end_kv
                } else {
                    self.start_kv + step * index as f64
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub peak_voltage_kv: f64,
    pub power_w: f64,
    pub hydroxyl_ppm: f64,
    pub ozone_ppm: f64,
}

/// Re-evaluates power and production across the sweep with every other
/// input held at `parameters`.
pub fn sweep_voltage(
    parameters: &ReactorParameters,
    sweep: &VoltageSweep,
) -> DbdResult<Vec<SweepPoint>> {
    parameters.validate()?;
    sweep.validate()?;

    let op = &parameters.operating;
    let geometry = &parameters.geometry;
    let threshold_kv = threshold_voltage_kv(geometry.gap_mm);
    let capacitance = CellCapacitance::for_reactor(geometry, &parameters.capacitance)?;

    let points = sweep
        .voltages()
        .into_iter()
        .map(|peak_voltage_kv| {
            let power_w = active_power_w(
                op.frequency_hz,
                capacitance.dielectric_f,
                threshold_kv,
                peak_voltage_kv,
                geometry.reactor_count,
            );
            SweepPoint {
                peak_voltage_kv,
                power_w,
                hydroxyl_ppm: hydroxyl_ppm(power_w, op.humidity_pct, op.temperature_c),
                ozone_ppm: ozone_ppm(power_w, op.humidity_pct, op.temperature_c),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        points = points.len(),
        start_kv = sweep.start_kv,
        end_kv = sweep.end_kv,
        "voltage sweep evaluated"
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::{MAX_SWEEP_POINTS, VoltageSweep, sweep_voltage};
    use crate::domain::ReactorParameters;
    use crate::model::evaluate;

    #[test]
    fn default_sweep_spans_bench_range() {
        let voltages = VoltageSweep::default().voltages();
        assert_eq!(voltages.len(), 100);
        assert_eq!(voltages[0], 10.0);
        assert_eq!(voltages[99], 35.0);
        assert!(voltages.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn sweep_agrees_with_single_point_evaluation() {
        let parameters = ReactorParameters::default();
        let sweep = VoltageSweep {
            start_kv: 13.0,
            end_kv: 23.0,
            points: 11,
        };
        let points = sweep_voltage(&parameters, &sweep).expect("sweep evaluates");
        let last = points.last().expect("sweep has points");
        let evaluation = evaluate(&parameters).expect("defaults evaluate");

        assert_eq!(last.peak_voltage_kv, 23.0);
        assert!((last.power_w - evaluation.active_power_w).abs() < 1.0e-9);
        assert!((last.hydroxyl_ppm - evaluation.hydroxyl_ppm).abs() < 1.0e-9);
        assert!((last.ozone_ppm - evaluation.ozone_ppm).abs() < 1.0e-9);
        assert_eq!(points[0].power_w, 0.0);
        assert_eq!(points[1].power_w, 0.0);
    }

    #[test]
    fn sweep_power_is_flat_then_rising() {
        let points = sweep_voltage(&ReactorParameters::default(), &VoltageSweep::default())
            .expect("sweep evaluates");
        let first_active = points
            .iter()
            .position(|point| point.power_w > 0.0)
            .expect("some sweep points discharge");
        assert!(points[..first_active].iter().all(|point| point.ozone_ppm == 0.0));
        assert!(
            points[first_active..]
                .windows(2)
                .all(|pair| pair[1].power_w > pair[0].power_w)
        );
    }

    #[test]
    fn degenerate_sweeps_are_rejected() {
        let parameters = ReactorParameters::default();
        for sweep in [
            VoltageSweep {
                points: 1,
                ..VoltageSweep::default()
            },
            VoltageSweep {
                start_kv: 20.0,
                end_kv: 20.0,
                points: 10,
            },
            VoltageSweep {
                start_kv: -5.0,
                ..VoltageSweep::default()
            },
        ] {
            assert!(sweep_voltage(&parameters, &sweep).is_err());
        }

        for points in [MAX_SWEEP_POINTS + 1, usize::MAX] {
            let error = sweep_voltage(
                &parameters,
                &VoltageSweep {
                    points,
                    ..VoltageSweep::default()
                },
            )
            .expect_err("oversized sweep should be rejected");
            assert_eq!(error.placeholder(), "INPUT.SWEEP_POINTS");
        }
    }
}
