use crate::common::constants::{THRESHOLD_BASE_KV, THRESHOLD_GAP_COEFFICIENT};

/// Ignition voltage of the air gap (kV), a Paschen-like square-root law in the
/// gap width at atmospheric pressure.
pub fn threshold_voltage_kv(gap_mm: f64) -> f64 {
    THRESHOLD_BASE_KV * (1.0 + THRESHOLD_GAP_COEFFICIENT * gap_mm.max(0.0).sqrt())
}

pub fn mean_field_kv_per_mm(peak_voltage_kv: f64, gap_mm: f64) -> f64 {
    peak_voltage_kv / gap_mm
}

#[cfg(test)]
mod tests {
    use super::{mean_field_kv_per_mm, threshold_voltage_kv};

    #[test]
    fn threshold_matches_bench_value_for_three_millimetre_gap() {
        let threshold = threshold_voltage_kv(3.0);
        assert!((threshold - 14.343_153_5).abs() < 1.0e-6, "got {threshold}");
    }

    #[test]
    fn threshold_grows_with_gap() {
        let narrow = threshold_voltage_kv(1.0);
        let wide = threshold_voltage_kv(5.0);
        assert!(wide > narrow);
        assert_eq!(threshold_voltage_kv(0.0), 13.2);
    }

    #[test]
    fn mean_field_is_voltage_over_gap() {
        assert!((mean_field_kv_per_mm(23.0, 3.0) - 7.666_666_666).abs() < 1.0e-6);
    }
}
