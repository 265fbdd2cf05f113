mod sweep;

pub use sweep::{MAX_SWEEP_POINTS, SweepPoint, VoltageSweep, sweep_voltage};

use crate::chemistry::{TransportOutcome, g_value_g_per_kwh, hydroxyl_ppm, ozone_ppm, transport_species};
use crate::common::constants::{O3_MOLAR_MASS, OH_MOLAR_MASS};
use crate::domain::{
    DbdError, DbdResult, EvaluationWarning, OperatingEnvelope, ReactorParameters,
};
use crate::physics::{CellCapacitance, active_power_w, mean_field_kv_per_mm, threshold_voltage_kv};
use crate::sensors::SensorSnapshot;
use serde::Serialize;

/// Where the active power of an evaluation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PowerEstimate {
    /// Manley's law from the cell capacitance and the operating point.
    Manley,
    /// Power integrated from a measured Lissajous figure (W, whole bank).
    Measured { power_w: f64 },
}

/// Every derived quantity of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub parameters: ReactorParameters,
    pub threshold_voltage_kv: f64,
    pub mean_field_kv_per_mm: f64,
    pub capacitance: CellCapacitance,
    pub power_estimate: PowerEstimate,
    pub active_power_w: f64,
    pub hydroxyl_ppm: f64,
    pub ozone_ppm: f64,
    pub transport: Option<TransportOutcome>,
    pub hydroxyl_g_per_kwh: Option<f64>,
    pub ozone_g_per_kwh: Option<f64>,
    pub warnings: Vec<EvaluationWarning>,
}

impl Evaluation {
    pub fn is_discharging(&self) -> bool {
        self.active_power_w > 0.0
    }
}

pub fn evaluate(parameters: &ReactorParameters) -> DbdResult<Evaluation> {
    evaluate_with_power(parameters, PowerEstimate::Manley)
}

pub fn evaluate_with_power(
    parameters: &ReactorParameters,
    power_estimate: PowerEstimate,
) -> DbdResult<Evaluation> {
    parameters.validate()?;
    let op = &parameters.operating;
    let geometry = &parameters.geometry;

    let threshold_kv = threshold_voltage_kv(geometry.gap_mm);
    let capacitance = CellCapacitance::for_reactor(geometry, &parameters.capacitance)?;

    let power_w = match power_estimate {
        PowerEstimate::Manley => active_power_w(
            op.frequency_hz,
            capacitance.dielectric_f,
            threshold_kv,
            op.peak_voltage_kv,
            geometry.reactor_count,
        ),
        PowerEstimate::Measured { power_w } => {
            if !power_w.is_finite() || power_w < 0.0 {
                return Err(DbdError::input_validation(
                    "INPUT.MEASURED_POWER",
                    format!("measured power must be finite and >= 0 W, got {power_w}"),
                ));
            }
            power_w
        }
    };

    let hydroxyl = hydroxyl_ppm(power_w, op.humidity_pct, op.temperature_c);
    let ozone = ozone_ppm(power_w, op.humidity_pct, op.temperature_c);

    let transport = parameters
        .transport
        .as_ref()
        .map(|transport| transport_species(hydroxyl, ozone, transport));
    let flow_rate = parameters
        .transport
        .map(|transport| transport.flow_rate_l_min)
        .unwrap_or(0.0);
    let hydroxyl_g_per_kwh =
        g_value_g_per_kwh(hydroxyl, flow_rate, op.temperature_c, OH_MOLAR_MASS, power_w);
    let ozone_g_per_kwh =
        g_value_g_per_kwh(ozone, flow_rate, op.temperature_c, O3_MOLAR_MASS, power_w);

    let mut warnings = Vec::new();
    // A measured power is taken as evidence of discharge.
    if power_estimate == PowerEstimate::Manley && op.peak_voltage_kv <= threshold_kv {
        warnings.push(EvaluationWarning::BelowThreshold {
            peak_voltage_kv: op.peak_voltage_kv,
            threshold_kv,
        });
    }
    warnings.extend(OperatingEnvelope::LAB.check(op));
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    tracing::debug!(
        peak_voltage_kv = op.peak_voltage_kv,
        threshold_kv,
        power_w,
        hydroxyl_ppm = hydroxyl,
        ozone_ppm = ozone,
        "evaluated operating point"
    );

    Ok(Evaluation {
        parameters: *parameters,
        threshold_voltage_kv: threshold_kv,
        mean_field_kv_per_mm: mean_field_kv_per_mm(op.peak_voltage_kv, geometry.gap_mm),
        capacitance,
        power_estimate,
        active_power_w: power_w,
        hydroxyl_ppm: hydroxyl,
        ozone_ppm: ozone,
        transport,
        hydroxyl_g_per_kwh,
        ozone_g_per_kwh,
        warnings,
    })
}

/// Replaces humidity and temperature with live readings when the snapshot
/// carries them. Returns whether anything changed.
pub fn apply_sensor_snapshot(
    parameters: &mut ReactorParameters,
    snapshot: &SensorSnapshot,
) -> bool {
    let mut changed = false;
    if let Some(humidity) = snapshot.humidity_pct.filter(|value| value.is_finite()) {
        let clamped = humidity.clamp(0.0, 100.0);
        if clamped != humidity {
            tracing::warn!(humidity, "sensor humidity outside 0..=100 %, clamped");
        }
        parameters.operating.humidity_pct = clamped;
        changed = true;
    }
    if let Some(temperature) = snapshot.temperature_c.filter(|value| value.is_finite()) {
        parameters.operating.temperature_c = temperature;
        changed = true;
    }
    changed
}
