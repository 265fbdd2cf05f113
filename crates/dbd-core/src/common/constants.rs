//! Physical constants and the empirical coefficients of the lab's DBD model.
//!
//! Coefficients were fitted on the bench reactor (air, atmospheric pressure,
//! quartz barrier) and are only meaningful inside the lab operating envelope.

pub const PI: f64 = std::f64::consts::PI;
/// Vacuum permittivity (F/m).
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;
pub const ZERO_CELSIUS_K: f64 = 273.15;
/// Ideal-gas molar volume at 0 degC and 1 atm (L/mol).
pub const MOLAR_VOLUME_STP_L: f64 = 22.413_969_54;

pub const KV_TO_V: f64 = 1.0e3;
pub const MM_TO_M: f64 = 1.0e-3;
pub const PF_TO_F: f64 = 1.0e-12;

// Ignition threshold, V_th = A * (1 + B * sqrt(d[mm])) kV.
pub const THRESHOLD_BASE_KV: f64 = 13.2;
pub const THRESHOLD_GAP_COEFFICIENT: f64 = 0.05;

/// Ratio between Manley power and the power actually delivered to the gas.
pub const POWER_EFFICIENCY_DIVISOR: f64 = 1.5;

pub const OH_RATE_COEFFICIENT: f64 = 0.12;
pub const OH_POWER_EXPONENT: f64 = 0.85;
pub const OH_THERMAL_SCALE_C: f64 = 180.0;

pub const O3_RATE_COEFFICIENT: f64 = 0.08;
pub const O3_POWER_EXPONENT: f64 = 0.7;
pub const O3_THERMAL_SCALE_C: f64 = 45.0;

/// Temperature at which the production coefficients were measured (degC).
pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;

pub const OH_LIFETIME_S: f64 = 0.25;
pub const O3_LIFETIME_S: f64 = 600.0;

/// Molar masses (g/mol).
pub const OH_MOLAR_MASS: f64 = 17.007;
pub const O3_MOLAR_MASS: f64 = 47.998;

#[cfg(test)]
mod tests {
    use super::{
        EPSILON_0, MOLAR_VOLUME_STP_L, O3_THERMAL_SCALE_C, OH_THERMAL_SCALE_C,
        POWER_EFFICIENCY_DIVISOR, THRESHOLD_BASE_KV,
    };

    #[test]
    fn constants_remain_finite_and_positive() {
        for value in [
            EPSILON_0,
            MOLAR_VOLUME_STP_L,
            THRESHOLD_BASE_KV,
            POWER_EFFICIENCY_DIVISOR,
            OH_THERMAL_SCALE_C,
            O3_THERMAL_SCALE_C,
        ] {
            assert!(value.is_finite());
            assert!(value > 0.0);
        }
    }
}
