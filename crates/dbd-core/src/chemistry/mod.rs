//! Empirical production laws for ·OH and O3 and what happens to them between
//! the discharge and the point of use.

pub mod g_value;
pub mod production;
pub mod transport;

pub use g_value::{g_value_g_per_kwh, molar_volume_l, production_rate_g_per_h};
pub use production::{hydroxyl_ppm, ozone_ppm};
pub use transport::{TransportOutcome, decay, transit_time_s, transport_species};
