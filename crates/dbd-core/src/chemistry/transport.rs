use crate::common::constants::{O3_LIFETIME_S, OH_LIFETIME_S};
use crate::domain::GasTransport;
use serde::Serialize;

pub fn transit_time_s(distance_m: f64, velocity_m_s: f64) -> f64 {
    distance_m / velocity_m_s
}

/// First-order loss during transport, `c * exp(-t / tau)`.
pub fn decay(concentration_ppm: f64, transit_s: f64, lifetime_s: f64) -> f64 {
    concentration_ppm * (-transit_s / lifetime_s).exp()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransportOutcome {
    pub transit_time_s: f64,
    pub hydroxyl_ppm: f64,
    pub ozone_ppm: f64,
}

/// Concentrations left at the point of use after the gas has travelled
/// `transport.distance_m`.
pub fn transport_species(
    hydroxyl_ppm: f64,
    ozone_ppm: f64,
    transport: &GasTransport,
) -> TransportOutcome {
    let transit = transit_time_s(transport.distance_m, transport.velocity_m_s);
    TransportOutcome {
        transit_time_s: transit,
        hydroxyl_ppm: decay(hydroxyl_ppm, transit, OH_LIFETIME_S),
        ozone_ppm: decay(ozone_ppm, transit, O3_LIFETIME_S),
    }
}
