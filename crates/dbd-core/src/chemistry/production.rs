use crate::common::constants::{
    O3_POWER_EXPONENT, O3_RATE_COEFFICIENT, O3_THERMAL_SCALE_C, OH_POWER_EXPONENT,
    OH_RATE_COEFFICIENT, OH_THERMAL_SCALE_C, REFERENCE_TEMPERATURE_C,
};

/// ·OH concentration at the reactor outlet (ppm).
///
/// Scales with the micro-discharge density (`P^0.85`) and the water vapour
/// available for dissociation, and loses stability slowly as the gas heats.
pub fn hydroxyl_ppm(power_w: f64, humidity_pct: f64, temperature_c: f64) -> f64 {
    let base = OH_RATE_COEFFICIENT * power_w.max(0.0).powf(OH_POWER_EXPONENT)
        * humidity_fraction(humidity_pct);
    (base * thermal_factor(temperature_c, OH_THERMAL_SCALE_C)).max(0.0)
}

/// Residual O3 concentration (ppm).
///
/// Ozone needs dry oxygen, so it falls with humidity, and it decomposes
/// thermally much faster than ·OH; above ~80 degC almost none survives.
pub fn ozone_ppm(power_w: f64, humidity_pct: f64, temperature_c: f64) -> f64 {
    if power_w <= 0.0 {
        return 0.0;
    }
    let base = O3_RATE_COEFFICIENT
        * power_w.powf(O3_POWER_EXPONENT)
        * (1.0 - humidity_fraction(humidity_pct));
    (base * thermal_factor(temperature_c, O3_THERMAL_SCALE_C)).max(0.0)
}

fn humidity_fraction(humidity_pct: f64) -> f64 {
    (humidity_pct / 100.0).clamp(0.0, 1.0)
}

fn thermal_factor(temperature_c: f64, scale_c: f64) -> f64 {
    (-(temperature_c - REFERENCE_TEMPERATURE_C) / scale_c).exp()
}

#[cfg(test)]
mod tests {
    use super::{hydroxyl_ppm, ozone_ppm};

    #[test]
    fn no_discharge_produces_nothing() {
        assert_eq!(hydroxyl_ppm(0.0, 75.0, 45.0), 0.0);
        assert_eq!(ozone_ppm(0.0, 75.0, 45.0), 0.0);
    }

    #[test]
    fn reference_temperature_leaves_only_the_power_law() {
        let oh = hydroxyl_ppm(100.0, 50.0, 20.0);
        let o3 = ozone_ppm(100.0, 50.0, 20.0);
        assert!((oh - 0.12 * 100.0_f64.powf(0.85) * 0.5).abs() < 1.0e-12);
        assert!((o3 - 0.08 * 100.0_f64.powf(0.7) * 0.5).abs() < 1.0e-12);
    }

    #[test]
    fn humidity_trades_ozone_for_hydroxyl() {
        let dry = (hydroxyl_ppm(500.0, 10.0, 30.0), ozone_ppm(500.0, 10.0, 30.0));
        let humid = (hydroxyl_ppm(500.0, 90.0, 30.0), ozone_ppm(500.0, 90.0, 30.0));
        assert!(humid.0 > dry.0);
        assert!(humid.1 < dry.1);
        assert_eq!(ozone_ppm(500.0, 100.0, 30.0), 0.0);
    }

    #[test]
    fn out_of_domain_inputs_are_clamped_non_negative() {
        assert_eq!(hydroxyl_ppm(-50.0, 75.0, 45.0), 0.0);
        assert_eq!(ozone_ppm(400.0, 140.0, 45.0), 0.0);
        assert_eq!(hydroxyl_ppm(400.0, -20.0, 45.0), 0.0);
    }

    #[test]
    fn ozone_collapses_faster_than_hydroxyl_when_heated() {
        let oh_ratio = hydroxyl_ppm(500.0, 50.0, 110.0) / hydroxyl_ppm(500.0, 50.0, 20.0);
        let o3_ratio = ozone_ppm(500.0, 50.0, 110.0) / ozone_ppm(500.0, 50.0, 20.0);
        assert!(o3_ratio < oh_ratio);
        assert!((o3_ratio - (-2.0_f64).exp()).abs() < 1.0e-12);
    }
}
