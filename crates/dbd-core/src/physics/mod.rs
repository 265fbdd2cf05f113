//! Electrical model of the coaxial DBD cell: ignition threshold, barrier and
//! gap capacitances, and active power from Manley's law or from a measured
//! Lissajous figure.

pub mod capacitance;
pub mod lissajous;
pub mod power;
pub mod threshold;

pub use capacitance::{CapacitanceError, CellCapacitance, coaxial_capacitance_f};
pub use lissajous::{LissajousError, LissajousTrace, read_trace_csv};
pub use power::{active_power_w, manley_power_w};
pub use threshold::{mean_field_kv_per_mm, threshold_voltage_kv};
