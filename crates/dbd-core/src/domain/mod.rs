pub mod errors;

pub use errors::{DbdError, DbdErrorCategory, DbdResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Electrical and gas conditions set from the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingPoint {
    pub peak_voltage_kv: f64,
    pub frequency_hz: f64,
    pub humidity_pct: f64,
    pub temperature_c: f64,
}

impl Default for OperatingPoint {
    fn default() -> Self {
        Self {
            peak_voltage_kv: 23.0,
            frequency_hz: 15_000.0,
            humidity_pct: 75.0,
            temperature_c: 45.0,
        }
    }
}

/// Coaxial reactor geometry. The high-voltage rod of radius
/// `electrode_radius_mm` sits inside a dielectric tube whose inner wall is
/// `gap_mm` away from the rod.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorGeometry {
    pub gap_mm: f64,
    pub active_length_mm: f64,
    pub electrode_radius_mm: f64,
    pub dielectric_thickness_mm: f64,
    pub dielectric_permittivity: f64,
    pub reactor_count: u32,
}

impl Default for ReactorGeometry {
    fn default() -> Self {
        Self {
            gap_mm: 3.0,
            active_length_mm: 150.0,
            electrode_radius_mm: 4.0,
            dielectric_thickness_mm: 1.5,
            dielectric_permittivity: 3.8,
            reactor_count: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapacitanceModel {
    /// Measured barrier capacitance at a reference length, scaled linearly
    /// with the active length.
    Reference { capacitance_pf: f64, length_mm: f64 },
    /// Closed-form coaxial capacitor from the geometry radii.
    Coaxial,
}

impl Default for CapacitanceModel {
    fn default() -> Self {
        Self::Reference {
            capacitance_pf: 80.0,
            length_mm: 150.0,
        }
    }
}

impl Display for CapacitanceModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference {
                capacitance_pf,
                length_mm,
            } => write!(f, "reference {capacitance_pf} pF @ {length_mm} mm"),
            Self::Coaxial => f.write_str("coaxial"),
        }
    }
}

/// Transport of the treated gas from the discharge zone to the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasTransport {
    pub distance_m: f64,
    pub velocity_m_s: f64,
    pub flow_rate_l_min: f64,
}

impl Default for GasTransport {
    fn default() -> Self {
        Self {
            distance_m: 0.5,
            velocity_m_s: 2.0,
            flow_rate_l_min: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorParameters {
    pub operating: OperatingPoint,
    pub geometry: ReactorGeometry,
    pub capacitance: CapacitanceModel,
    pub transport: Option<GasTransport>,
}

impl ReactorParameters {
    pub fn validate(&self) -> DbdResult<()> {
        let op = &self.operating;
        ensure_non_negative(op.peak_voltage_kv, "INPUT.PEAK_VOLTAGE", "peak voltage", "kV")?;
        ensure_positive(op.frequency_hz, "INPUT.FREQUENCY", "frequency", "Hz")?;
        if !op.humidity_pct.is_finite() || !(0.0..=100.0).contains(&op.humidity_pct) {
            return Err(DbdError::input_validation(
                "INPUT.HUMIDITY",
                format!(
                    "relative humidity must be within 0..=100 %, got {}",
                    op.humidity_pct
                ),
            ));
        }
        if !op.temperature_c.is_finite() || op.temperature_c <= -273.15 {
            return Err(DbdError::input_validation(
                "INPUT.TEMPERATURE",
                format!(
                    "gas temperature must be above absolute zero, got {} degC",
                    op.temperature_c
                ),
            ));
        }

        let geometry = &self.geometry;
        ensure_positive(geometry.gap_mm, "INPUT.GAP", "discharge gap", "mm")?;
        ensure_positive(
            geometry.active_length_mm,
            "INPUT.ACTIVE_LENGTH",
            "active length",
            "mm",
        )?;
        if geometry.reactor_count == 0 {
            return Err(DbdError::input_validation(
                "INPUT.REACTOR_COUNT",
                "reactor count must be at least 1",
            ));
        }

        match self.capacitance {
            CapacitanceModel::Reference {
                capacitance_pf,
                length_mm,
            } => {
                ensure_positive(
                    capacitance_pf,
                    "INPUT.REFERENCE_CAPACITANCE",
                    "reference capacitance",
                    "pF",
                )?;
                ensure_positive(
                    length_mm,
                    "INPUT.REFERENCE_LENGTH",
                    "reference length",
                    "mm",
                )?;
            }
            CapacitanceModel::Coaxial => {
                ensure_positive(
                    geometry.electrode_radius_mm,
                    "INPUT.ELECTRODE_RADIUS",
                    "electrode radius",
                    "mm",
                )?;
                ensure_positive(
                    geometry.dielectric_thickness_mm,
                    "INPUT.DIELECTRIC_THICKNESS",
                    "dielectric thickness",
                    "mm",
                )?;
                if !geometry.dielectric_permittivity.is_finite()
                    || geometry.dielectric_permittivity < 1.0
                {
                    return Err(DbdError::input_validation(
                        "INPUT.PERMITTIVITY",
                        format!(
                            "relative permittivity must be >= 1, got {}",
                            geometry.dielectric_permittivity
                        ),
                    ));
                }
            }
        }

        if let Some(transport) = &self.transport {
            ensure_non_negative(
                transport.distance_m,
                "INPUT.TRANSPORT_DISTANCE",
                "transport distance",
                "m",
            )?;
            ensure_positive(
                transport.velocity_m_s,
                "INPUT.TRANSPORT_VELOCITY",
                "gas velocity",
                "m/s",
            )?;
            ensure_non_negative(
                transport.flow_rate_l_min,
                "INPUT.FLOW_RATE",
                "gas flow rate",
                "L/min",
            )?;
        }

        Ok(())
    }
}

fn ensure_positive(
    value: f64,
    placeholder: &'static str,
    label: &str,
    unit: &str,
) -> DbdResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DbdError::input_validation(
            placeholder,
            format!("{label} must be > 0 {unit}, got {value}"),
        ))
    }
}

fn ensure_non_negative(
    value: f64,
    placeholder: &'static str,
    label: &str,
    unit: &str,
) -> DbdResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DbdError::input_validation(
            placeholder,
            format!("{label} must be >= 0 {unit}, got {value}"),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingParameter {
    PeakVoltage,
    Frequency,
    Humidity,
    Temperature,
}

impl OperatingParameter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PeakVoltage => "peak voltage (kV)",
            Self::Frequency => "frequency (Hz)",
            Self::Humidity => "humidity (%)",
            Self::Temperature => "temperature (degC)",
        }
    }
}

/// Ranges the bench supply and gas line are rated for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingEnvelope {
    pub peak_voltage_kv: (f64, f64),
    pub frequency_hz: (f64, f64),
    pub humidity_pct: (f64, f64),
    pub temperature_c: (f64, f64),
    pub arc_risk_kv: f64,
}

impl OperatingEnvelope {
    pub const LAB: Self = Self {
        peak_voltage_kv: (10.0, 35.0),
        frequency_hz: (1_000.0, 25_000.0),
        humidity_pct: (10.0, 95.0),
        temperature_c: (20.0, 250.0),
        arc_risk_kv: 30.0,
    };

    pub fn check(&self, point: &OperatingPoint) -> Vec<EvaluationWarning> {
        let mut warnings = Vec::new();
        let checks = [
            (
                OperatingParameter::PeakVoltage,
                point.peak_voltage_kv,
                self.peak_voltage_kv,
            ),
            (
                OperatingParameter::Frequency,
                point.frequency_hz,
                self.frequency_hz,
            ),
            (
                OperatingParameter::Humidity,
                point.humidity_pct,
                self.humidity_pct,
            ),
            (
                OperatingParameter::Temperature,
                point.temperature_c,
                self.temperature_c,
            ),
        ];
        for (parameter, value, (min, max)) in checks {
            if value < min || value > max {
                warnings.push(EvaluationWarning::OutsideEnvelope {
                    parameter,
                    value,
                    min,
                    max,
                });
            }
        }
        if point.peak_voltage_kv > self.arc_risk_kv {
            warnings.push(EvaluationWarning::ArcRisk {
                peak_voltage_kv: point.peak_voltage_kv,
                limit_kv: self.arc_risk_kv,
            });
        }
        warnings
    }
}

impl Default for OperatingEnvelope {
    fn default() -> Self {
        Self::LAB
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationWarning {
    BelowThreshold {
        peak_voltage_kv: f64,
        threshold_kv: f64,
    },
    ArcRisk {
        peak_voltage_kv: f64,
        limit_kv: f64,
    },
    OutsideEnvelope {
        parameter: OperatingParameter,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl Display for EvaluationWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowThreshold {
                peak_voltage_kv,
                threshold_kv,
            } => write!(
                f,
                "peak voltage {peak_voltage_kv:.2} kV is at or below the {threshold_kv:.2} kV ignition threshold; no discharge"
            ),
            Self::ArcRisk {
                peak_voltage_kv,
                limit_kv,
            } => write!(
                f,
                "peak voltage {peak_voltage_kv:.2} kV exceeds {limit_kv:.0} kV: arcing risk, watch the quartz temperature"
            ),
            Self::OutsideEnvelope {
                parameter,
                value,
                min,
                max,
            } => write!(
                f,
                "{} = {value} is outside the bench envelope [{min}, {max}]",
                parameter.as_str()
            ),
        }
    }
}
