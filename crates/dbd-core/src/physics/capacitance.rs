use crate::common::constants::{EPSILON_0, MM_TO_M, PF_TO_F, PI};
use crate::domain::{CapacitanceModel, DbdError, ReactorGeometry};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapacitanceError {
    #[error("capacitance parameter '{field}' must be finite and > 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("coaxial outer radius {outer} m must exceed inner radius {inner} m")]
    RadiiNotOrdered { inner: f64, outer: f64 },
    #[error("relative permittivity must be >= 1, got {value}")]
    InvalidPermittivity { value: f64 },
}

impl From<CapacitanceError> for DbdError {
    fn from(error: CapacitanceError) -> Self {
        DbdError::computation("RUN.CAPACITANCE", error.to_string())
    }
}

/// Coaxial cylindrical capacitor, `C = 2 pi eps0 epsr L / ln(r_out / r_in)` (F).
pub fn coaxial_capacitance_f(
    length_m: f64,
    inner_radius_m: f64,
    outer_radius_m: f64,
    relative_permittivity: f64,
) -> Result<f64, CapacitanceError> {
    for (field, value) in [
        ("length_m", length_m),
        ("inner_radius_m", inner_radius_m),
        ("outer_radius_m", outer_radius_m),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(CapacitanceError::NonPositive { field, value });
        }
    }
    if outer_radius_m <= inner_radius_m {
        return Err(CapacitanceError::RadiiNotOrdered {
            inner: inner_radius_m,
            outer: outer_radius_m,
        });
    }
    if !relative_permittivity.is_finite() || relative_permittivity < 1.0 {
        return Err(CapacitanceError::InvalidPermittivity {
            value: relative_permittivity,
        });
    }

    Ok(2.0 * PI * EPSILON_0 * relative_permittivity * length_m
        / (outer_radius_m / inner_radius_m).ln())
}

/// Capacitances of one reactor cell. The gas-gap capacitance is only known
/// for the coaxial model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellCapacitance {
    pub dielectric_f: f64,
    pub gap_f: Option<f64>,
}

impl CellCapacitance {
    pub fn for_reactor(
        geometry: &ReactorGeometry,
        model: &CapacitanceModel,
    ) -> Result<Self, CapacitanceError> {
        match *model {
            CapacitanceModel::Reference {
                capacitance_pf,
                length_mm,
            } => {
                if !capacitance_pf.is_finite() || capacitance_pf <= 0.0 {
                    return Err(CapacitanceError::NonPositive {
                        field: "capacitance_pf",
                        value: capacitance_pf,
                    });
                }
                if !length_mm.is_finite() || length_mm <= 0.0 {
                    return Err(CapacitanceError::NonPositive {
                        field: "length_mm",
                        value: length_mm,
                    });
                }
                Ok(Self {
                    dielectric_f: capacitance_pf * PF_TO_F * (geometry.active_length_mm / length_mm),
                    gap_f: None,
                })
            }
            CapacitanceModel::Coaxial => {
                let length_m = geometry.active_length_mm * MM_TO_M;
                let electrode_m = geometry.electrode_radius_mm * MM_TO_M;
                let tube_inner_m = electrode_m + geometry.gap_mm * MM_TO_M;
                let tube_outer_m = tube_inner_m + geometry.dielectric_thickness_mm * MM_TO_M;

                let dielectric_f = coaxial_capacitance_f(
                    length_m,
                    tube_inner_m,
                    tube_outer_m,
                    geometry.dielectric_permittivity,
                )?;
                let gap_f = coaxial_capacitance_f(length_m, electrode_m, tube_inner_m, 1.0)?;
                Ok(Self {
                    dielectric_f,
                    gap_f: Some(gap_f),
                })
            }
        }
    }

    /// Cell capacitance while the gap is not discharging (barrier and gap in series).
    pub fn series_f(&self) -> Option<f64> {
        self.gap_f
            .map(|gap_f| self.dielectric_f * gap_f / (self.dielectric_f + gap_f))
    }

    pub fn dielectric_pf(&self) -> f64 {
        self.dielectric_f / PF_TO_F
    }

    pub fn gap_pf(&self) -> Option<f64> {
        self.gap_f.map(|gap_f| gap_f / PF_TO_F)
    }
}

#[cfg(test)]
mod tests {
    use super::{CapacitanceError, CellCapacitance, coaxial_capacitance_f};
    use crate::common::constants::{EPSILON_0, PI};
    use crate::domain::{CapacitanceModel, ReactorGeometry};

    #[test]
    fn coaxial_closed_form_reduces_to_two_pi_eps0_for_unit_log_ratio() {
        let capacitance = coaxial_capacitance_f(1.0, 1.0e-3, std::f64::consts::E * 1.0e-3, 1.0)
            .expect("valid coaxial cell");
        assert!((capacitance - 2.0 * PI * EPSILON_0).abs() < 1.0e-20);
    }

    #[test]
    fn coaxial_capacitance_scales_with_length_and_permittivity() {
        let base = coaxial_capacitance_f(0.15, 7.0e-3, 8.5e-3, 1.0).expect("valid cell");
        let quartz = coaxial_capacitance_f(0.15, 7.0e-3, 8.5e-3, 3.8).expect("valid cell");
        let longer = coaxial_capacitance_f(0.30, 7.0e-3, 8.5e-3, 1.0).expect("valid cell");

        assert!((quartz / base - 3.8).abs() < 1.0e-12);
        assert!((longer / base - 2.0).abs() < 1.0e-12);
    }

    #[test]
    fn coaxial_rejects_inverted_radii() {
        let error = coaxial_capacitance_f(0.15, 8.5e-3, 7.0e-3, 3.8)
            .expect_err("inverted radii should fail");
        assert!(matches!(error, CapacitanceError::RadiiNotOrdered { .. }));
    }

    #[test]
    fn reference_model_scales_linearly_with_active_length() {
        let geometry = ReactorGeometry {
            active_length_mm: 300.0,
            ..ReactorGeometry::default()
        };
        let cell = CellCapacitance::for_reactor(&geometry, &CapacitanceModel::default())
            .expect("reference model should evaluate");

        assert!((cell.dielectric_pf() - 160.0).abs() < 1.0e-9);
        assert_eq!(cell.gap_f, None);
        assert_eq!(cell.series_f(), None);
    }

    #[test]
    fn coaxial_cell_uses_rod_gap_and_tube_radii() {
        let geometry = ReactorGeometry::default();
        let cell = CellCapacitance::for_reactor(&geometry, &CapacitanceModel::Coaxial)
            .expect("coaxial model should evaluate");

        let expected_dielectric =
            2.0 * PI * EPSILON_0 * 3.8 * 0.15 / (8.5_f64 / 7.0).ln();
        let expected_gap = 2.0 * PI * EPSILON_0 * 0.15 / (7.0_f64 / 4.0).ln();
        assert!((cell.dielectric_f - expected_dielectric).abs() < 1.0e-18);
        assert!((cell.gap_f.expect("gap capacitance") - expected_gap).abs() < 1.0e-18);

        let series = cell.series_f().expect("series capacitance");
        assert!(series < cell.dielectric_f);
        assert!(series < expected_gap);
    }
}
