use crate::common::constants::{KV_TO_V, POWER_EFFICIENCY_DIVISOR};

/// Manley's law for one DBD cell, `P = 4 f C_d V_th (V_peak - V_th)` (W).
///
/// Returns exactly zero when the peak voltage does not exceed the ignition
/// threshold: the gap never breaks down and no charge crosses it.
pub fn manley_power_w(
    frequency_hz: f64,
    dielectric_capacitance_f: f64,
    threshold_kv: f64,
    peak_voltage_kv: f64,
) -> f64 {
    if peak_voltage_kv <= threshold_kv {
        return 0.0;
    }
    4.0 * frequency_hz
        * dielectric_capacitance_f
        * (threshold_kv * KV_TO_V)
        * ((peak_voltage_kv - threshold_kv) * KV_TO_V)
}

/// Power delivered to the gas by `reactor_count` identical cells driven in
/// parallel, after the bench's real-efficiency correction.
pub fn active_power_w(
    frequency_hz: f64,
    dielectric_capacitance_f: f64,
    threshold_kv: f64,
    peak_voltage_kv: f64,
    reactor_count: u32,
) -> f64 {
    manley_power_w(
        frequency_hz,
        dielectric_capacitance_f,
        threshold_kv,
        peak_voltage_kv,
    ) * f64::from(reactor_count)
        / POWER_EFFICIENCY_DIVISOR
}

#[cfg(test)]
mod tests {
    use super::{active_power_w, manley_power_w};

    const C_QUARTZ: f64 = 80.0e-12;

    #[test]
    fn no_power_at_or_below_threshold() {
        assert_eq!(manley_power_w(15_000.0, C_QUARTZ, 14.3, 14.3), 0.0);
        assert_eq!(manley_power_w(15_000.0, C_QUARTZ, 14.3, 10.0), 0.0);
        assert_eq!(active_power_w(15_000.0, C_QUARTZ, 14.3, 0.0, 4), 0.0);
    }

    #[test]
    fn manley_power_matches_hand_computation() {
        // 4 * 1 kHz * 100 pF * 10 kV * 5 kV = 20 W
        let power = manley_power_w(1_000.0, 100.0e-12, 10.0, 15.0);
        assert!((power - 20.0).abs() < 1.0e-9, "got {power}");
    }

    #[test]
    fn active_power_scales_with_reactor_count_and_efficiency() {
        let single = manley_power_w(15_000.0, C_QUARTZ, 14.343_153_5, 23.0);
        let bank = active_power_w(15_000.0, C_QUARTZ, 14.343_153_5, 23.0, 2);
        assert!((bank - single * 2.0 / 1.5).abs() < 1.0e-9);
        assert!((bank - 794.66).abs() < 0.1, "got {bank}");
    }

    #[test]
    fn power_increases_with_overvoltage() {
        let threshold = 14.0;
        let mut previous = 0.0;
        for step in 1..=50 {
            let peak = threshold + f64::from(step) * 0.4;
            let power = manley_power_w(10_000.0, C_QUARTZ, threshold, peak);
            assert!(power > previous, "power should rise at {peak} kV");
            previous = power;
        }
    }
}
