use crate::common::constants::{MOLAR_VOLUME_STP_L, ZERO_CELSIUS_K};

/// Ideal-gas molar volume at atmospheric pressure (L/mol).
pub fn molar_volume_l(temperature_c: f64) -> f64 {
    MOLAR_VOLUME_STP_L * (temperature_c + ZERO_CELSIUS_K) / ZERO_CELSIUS_K
}

/// Mass of a species carried by the gas stream (g/h).
pub fn production_rate_g_per_h(
    concentration_ppm: f64,
    flow_rate_l_min: f64,
    temperature_c: f64,
    molar_mass_g_mol: f64,
) -> f64 {
    let gas_mol_per_h = flow_rate_l_min * 60.0 / molar_volume_l(temperature_c);
    concentration_ppm * 1.0e-6 * gas_mol_per_h * molar_mass_g_mol
}

/// Energy yield (g/kWh). `None` when there is no discharge or no flow.
pub fn g_value_g_per_kwh(
    concentration_ppm: f64,
    flow_rate_l_min: f64,
    temperature_c: f64,
    molar_mass_g_mol: f64,
    power_w: f64,
) -> Option<f64> {
    if power_w <= 0.0 || flow_rate_l_min <= 0.0 {
        return None;
    }
    let rate = production_rate_g_per_h(
        concentration_ppm,
        flow_rate_l_min,
        temperature_c,
        molar_mass_g_mol,
    );
    Some(rate / (power_w / 1.0e3))
}
