//! File artifacts: sweep and measurement CSV tables, the JSON evaluation
//! report and the plain-text datasheet.

pub mod csv;
pub mod datasheet;
pub mod report;
pub mod serialization;

pub use self::csv::{
    MeasurementRecord, append_measurement, read_measurements, write_sweep_csv, write_sweep_file,
};
pub use datasheet::{render_datasheet, write_datasheet};
pub use report::{report_json, write_report};
pub use serialization::{format_fixed_f64, normalize_text_artifact, write_text_artifact};
