use super::serialization::{format_fixed_f64, write_text_artifact};
use crate::domain::DbdResult;
use crate::model::{Evaluation, PowerEstimate};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::Path;

const LABEL_WIDTH: usize = 34;
const VALUE_WIDTH: usize = 14;

fn push_row(out: &mut String, label: &str, value: f64, precision: usize, unit: &str) {
    let _ = writeln!(
        out,
        "  {label:<LABEL_WIDTH$}{} {unit}",
        format_fixed_f64(value, VALUE_WIDTH, precision)
    );
}

fn push_text_row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$}");
}

fn push_heading(out: &mut String, heading: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "{}", "-".repeat(heading.len()));
}

/// Plain-text technical datasheet for one evaluation. The output depends only
/// on its inputs.
pub fn render_datasheet(evaluation: &Evaluation, generated_at: DateTime<Utc>) -> String {
    let params = &evaluation.parameters;
    let op = &params.operating;
    let geometry = &params.geometry;
    let mut out = String::new();

    let _ = writeln!(out, "DBD PLASMA GENERATOR - OH / O3 TECHNICAL DATASHEET");
    let _ = writeln!(
        out,
        "Generated {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    push_heading(&mut out, "Operating point");
    push_row(&mut out, "Peak voltage", op.peak_voltage_kv, 2, "kV");
    push_row(&mut out, "Frequency", op.frequency_hz, 0, "Hz");
    push_row(&mut out, "Relative humidity", op.humidity_pct, 1, "%");
    push_row(&mut out, "Gas temperature", op.temperature_c, 1, "C");

    push_heading(&mut out, "Reactor geometry");
    push_row(&mut out, "Discharge gap", geometry.gap_mm, 2, "mm");
    push_row(&mut out, "Active length", geometry.active_length_mm, 1, "mm");
    push_row(&mut out, "Electrode radius", geometry.electrode_radius_mm, 2, "mm");
    push_row(
        &mut out,
        "Dielectric thickness",
        geometry.dielectric_thickness_mm,
        2,
        "mm",
    );
    push_row(
        &mut out,
        "Dielectric permittivity",
        geometry.dielectric_permittivity,
        2,
        "",
    );
    push_text_row(
        &mut out,
        "Reactors in parallel",
        &geometry.reactor_count.to_string(),
    );
    push_text_row(&mut out, "Capacitance model", &params.capacitance.to_string());

    push_heading(&mut out, "Electrical");
    push_row(
        &mut out,
        "Ignition threshold",
        evaluation.threshold_voltage_kv,
        3,
        "kV",
    );
    push_row(
        &mut out,
        "Mean gap field",
        evaluation.mean_field_kv_per_mm,
        3,
        "kV/mm",
    );
    push_row(
        &mut out,
        "Barrier capacitance",
        evaluation.capacitance.dielectric_pf(),
        2,
        "pF",
    );
    if let Some(gap_pf) = evaluation.capacitance.gap_pf() {
        push_row(&mut out, "Gas-gap capacitance", gap_pf, 2, "pF");
    }
    let power_label = match evaluation.power_estimate {
        PowerEstimate::Manley => "Active power (Manley)",
        PowerEstimate::Measured { .. } => "Active power (Lissajous)",
    };
    push_row(&mut out, power_label, evaluation.active_power_w, 1, "W");

    push_heading(&mut out, "Production at reactor outlet");
    push_row(&mut out, "OH radicals", evaluation.hydroxyl_ppm, 2, "ppm");
    push_row(&mut out, "Ozone", evaluation.ozone_ppm, 2, "ppm");
    if let Some(yield_g) = evaluation.hydroxyl_g_per_kwh {
        push_row(&mut out, "OH energy yield", yield_g, 3, "g/kWh");
    }
    if let Some(yield_g) = evaluation.ozone_g_per_kwh {
        push_row(&mut out, "O3 energy yield", yield_g, 3, "g/kWh");
    }

    if let (Some(transport), Some(outcome)) = (params.transport, evaluation.transport) {
        push_heading(&mut out, "Transport to point of use");
        push_row(&mut out, "Distance", transport.distance_m, 2, "m");
        push_row(&mut out, "Gas velocity", transport.velocity_m_s, 2, "m/s");
        push_row(&mut out, "Flow rate", transport.flow_rate_l_min, 2, "L/min");
        push_row(&mut out, "Transit time", outcome.transit_time_s, 3, "s");
        push_row(&mut out, "OH at point of use", outcome.hydroxyl_ppm, 3, "ppm");
        push_row(&mut out, "O3 at point of use", outcome.ozone_ppm, 3, "ppm");
    }

    push_heading(&mut out, "System summary");
    let _ = writeln!(
        out,
        "  {:<22}{:<14}{:>12}{:>14}",
        "Subsystem", "Code", "Setting", "Output"
    );
    let _ = writeln!(
        out,
        "  {:<22}{:<14}{:>12}{:>14}",
        "Plasma generation",
        "PL-SBA-26",
        format!("{:.1} kV", op.peak_voltage_kv),
        format!("{:.1} W", evaluation.active_power_w)
    );
    let _ = writeln!(
        out,
        "  {:<22}{:<14}{:>12}{:>14}",
        "Radical oxidation",
        "IA-OH",
        format!("{:.0} Hz", op.frequency_hz),
        format!("{:.2} ppm", evaluation.hydroxyl_ppm)
    );

    push_heading(&mut out, "Warnings");
    if evaluation.warnings.is_empty() {
        let _ = writeln!(out, "  none");
    } else {
        for warning in &evaluation.warnings {
            let _ = writeln!(out, "  * {warning}");
        }
    }

    out
}

pub fn write_datasheet(
    path: &Path,
    evaluation: &Evaluation,
    generated_at: DateTime<Utc>,
) -> DbdResult<()> {
    write_text_artifact(path, &render_datasheet(evaluation, generated_at))?;
    tracing::info!(path = %path.display(), "wrote datasheet");
    Ok(())
}
