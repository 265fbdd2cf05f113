//! Estimator for a coaxial dielectric-barrier-discharge reactor: ignition
//! threshold, cell capacitance, active power, OH and O3 production, transport
//! losses and live bench sensor input.

pub mod chemistry;
pub mod common;
pub mod domain;
pub mod export;
pub mod model;
pub mod physics;
pub mod sensors;
