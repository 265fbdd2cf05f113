use super::CliError;
use super::helpers::{
    CloudArgs, ReactorArgs, SerialArgs, origin_label, render_evaluation_summary,
};
use anyhow::Context;
use chrono::Utc;
use dbd_core::common::config::ReactorConfig;
use dbd_core::domain::DbdError;
use dbd_core::export::{
    MeasurementRecord, append_measurement, report_json, write_datasheet, write_report,
    write_sweep_csv, write_sweep_file,
};
use dbd_core::model::{
    PowerEstimate, VoltageSweep, apply_sensor_snapshot, evaluate, evaluate_with_power,
    sweep_voltage,
};
use dbd_core::physics::read_trace_csv;
use dbd_core::sensors::{
    CloudStore, FallbackSource, SensorSnapshot, SensorSource, SerialLink,
};
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(clap::Args)]
pub(super) struct EvaluateArgs {
    #[command(flatten)]
    reactor: ReactorArgs,

    /// Use this measured bank power (W) instead of Manley's law
    #[arg(long)]
    measured_power_w: Option<f64>,

    /// Print the full evaluation as JSON
    #[arg(long)]
    json: bool,

    /// Also write the JSON evaluation report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SweepArgs {
    #[command(flatten)]
    reactor: ReactorArgs,

    /// First peak voltage of the sweep (kV)
    #[arg(long)]
    start_kv: Option<f64>,

    /// Last peak voltage of the sweep (kV)
    #[arg(long)]
    end_kv: Option<f64>,

    /// Number of evenly spaced points
    #[arg(long)]
    points: Option<usize>,

    /// CSV output path; the table goes to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct LissajousArgs {
    #[command(flatten)]
    reactor: ReactorArgs,

    /// Oscilloscope CSV with `voltage_v` and `charge_c` or `monitor_v` columns
    #[arg(long, value_name = "PATH")]
    trace: PathBuf,

    /// Monitor capacitor (nF) converting `monitor_v` into charge
    #[arg(long)]
    monitor_capacitance_nf: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(super) enum SensorKind {
    Cloud,
    Serial,
}

#[derive(clap::Args)]
pub(super) struct MonitorArgs {
    #[command(flatten)]
    reactor: ReactorArgs,

    /// Where live readings come from
    #[arg(long, value_enum, default_value = "cloud")]
    source: SensorKind,

    #[command(flatten)]
    cloud: CloudArgs,

    #[command(flatten)]
    serial: SerialArgs,

    /// Seconds between refreshes
    #[arg(long, default_value_t = 2)]
    interval_secs: u64,

    /// Stop after this many refreshes (runs until interrupted when omitted)
    #[arg(long)]
    count: Option<u64>,

    /// Append every refresh to this CSV measurement log
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Print one JSON object per refresh
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct DatasheetArgs {
    #[command(flatten)]
    reactor: ReactorArgs,

    /// Output path of the datasheet
    #[arg(long, default_value = "datasheet.txt")]
    output: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct LogArgs {
    #[command(flatten)]
    reactor: ReactorArgs,

    /// CSV measurement log to append to
    #[arg(long, default_value = "measurements.csv")]
    output: PathBuf,

    /// Also push the record to the cloud database log
    #[arg(long)]
    push_cloud: bool,

    #[command(flatten)]
    cloud: CloudArgs,
}

pub(super) fn run_evaluate_command(
    config: ReactorConfig,
    args: EvaluateArgs,
) -> Result<i32, CliError> {
    let parameters = args.reactor.resolve(&config);
    let estimate = match args.measured_power_w {
        Some(power_w) => PowerEstimate::Measured { power_w },
        None => PowerEstimate::Manley,
    };
    let evaluation = evaluate_with_power(&parameters, estimate).map_err(CliError::Compute)?;

    if let Some(path) = &args.report {
        write_report(path, &evaluation).map_err(CliError::Compute)?;
    }
    if args.json {
        println!("{}", report_json(&evaluation).map_err(CliError::Compute)?);
    } else {
        println!("{}", render_evaluation_summary(&evaluation));
        if let Some(path) = &args.report {
            println!("JSON report: {}", path.display());
        }
    }
    Ok(0)
}

pub(super) fn run_sweep_command(config: ReactorConfig, args: SweepArgs) -> Result<i32, CliError> {
    let parameters = args.reactor.resolve(&config);
    let sweep = VoltageSweep {
        start_kv: args.start_kv.unwrap_or(config.sweep.start_kv),
        end_kv: args.end_kv.unwrap_or(config.sweep.end_kv),
        points: args.points.unwrap_or(config.sweep.points),
    };
    let points = sweep_voltage(&parameters, &sweep).map_err(CliError::Compute)?;

    match &args.output {
        Some(path) => {
            write_sweep_file(path, &points).map_err(CliError::Compute)?;
            println!("Sweep table: {} ({} points)", path.display(), points.len());
        }
        None => {
            write_sweep_csv(std::io::stdout().lock(), &points)
                .context("failed to write sweep table to stdout")?;
        }
    }
    Ok(0)
}

pub(super) fn run_lissajous_command(
    config: ReactorConfig,
    args: LissajousArgs,
) -> Result<i32, CliError> {
    let mut parameters = args.reactor.resolve(&config);
    let file = File::open(&args.trace)
        .with_context(|| format!("failed to open trace '{}'", args.trace.display()))?;
    let monitor_capacitance_f = args.monitor_capacitance_nf.map(|nf| nf * 1.0e-9);
    let trace = read_trace_csv(file, monitor_capacitance_f).map_err(CliError::Compute)?;

    let trace_peak_kv = trace.peak_voltage_v() / 1000.0;
    if args.reactor.voltage_kv().is_none() {
        parameters.operating.peak_voltage_kv = trace_peak_kv;
    }

    let loop_energy_j = trace.loop_energy_j();
    let measured_w = trace
        .power_w(parameters.operating.frequency_hz)
        .map_err(|error| CliError::Compute(DbdError::from(error)))?;
    let manley = evaluate(&parameters).map_err(CliError::Compute)?;
    let measured = evaluate_with_power(&parameters, PowerEstimate::Measured { power_w: measured_w })
        .map_err(CliError::Compute)?;

    if args.json {
        let value = json!({
            "samples": trace.len(),
            "trace_peak_voltage_kv": trace_peak_kv,
            "loop_energy_j": loop_energy_j,
            "manley_power_w": manley.active_power_w,
            "evaluation": measured,
        });
        let text = serde_json::to_string_pretty(&value)
            .context("failed to encode lissajous result")?;
        println!("{text}");
    } else {
        println!("Samples: {}", trace.len());
        println!("Trace peak voltage: {trace_peak_kv:.2} kV");
        println!("Loop energy: {:.4} mJ", loop_energy_j * 1000.0);
        println!("Measured power: {measured_w:.1} W");
        println!("Manley estimate: {:.1} W", manley.active_power_w);
        println!("OH: {:.3} ppm", measured.hydroxyl_ppm);
        println!("O3: {:.3} ppm", measured.ozone_ppm);
    }
    Ok(0)
}

pub(super) fn run_monitor_command(
    config: ReactorConfig,
    args: MonitorArgs,
) -> Result<i32, CliError> {
    let base = args.reactor.resolve(&config);
    base.validate().map_err(CliError::Compute)?;

    let source: Box<dyn SensorSource> = match args.source {
        SensorKind::Cloud => Box::new(
            CloudStore::new(args.cloud.resolve(&config)).map_err(CliError::Compute)?,
        ),
        SensorKind::Serial => Box::new(
            SerialLink::open(&args.serial.resolve(&config)).map_err(CliError::Compute)?,
        ),
    };
    let default_snapshot = SensorSnapshot {
        humidity_pct: Some(base.operating.humidity_pct),
        temperature_c: Some(base.operating.temperature_c),
        ..SensorSnapshot::default()
    };
    let mut source = FallbackSource::new(source, default_snapshot);
    tracing::info!(source = source.name(), "monitoring started");

    let interval = Duration::from_secs(args.interval_secs);
    let mut refresh = 0_u64;
    loop {
        let reading = source.read();
        let mut parameters = base;
        apply_sensor_snapshot(&mut parameters, &reading.snapshot);
        let evaluation = evaluate(&parameters).map_err(CliError::Compute)?;
        let timestamp = reading.snapshot.captured_at.unwrap_or_else(Utc::now);

        if let Some(path) = &args.log {
            append_measurement(path, &MeasurementRecord::from_evaluation(&evaluation, timestamp))
                .map_err(CliError::Compute)?;
        }

        if args.json {
            let value = json!({
                "timestamp": timestamp,
                "origin": reading.origin,
                "snapshot": reading.snapshot,
                "active_power_w": evaluation.active_power_w,
                "hydroxyl_ppm": evaluation.hydroxyl_ppm,
                "ozone_ppm": evaluation.ozone_ppm,
                "warnings": evaluation.warnings,
            });
            println!("{value}");
        } else {
            println!(
                "{} [{}] T={:.1} C RH={:.1} % P={:.1} W OH={:.3} ppm O3={:.3} ppm",
                timestamp.format("%Y-%m-%d %H:%M:%S"),
                origin_label(reading.origin),
                parameters.operating.temperature_c,
                parameters.operating.humidity_pct,
                evaluation.active_power_w,
                evaluation.hydroxyl_ppm,
                evaluation.ozone_ppm
            );
        }

        refresh += 1;
        if args.count.is_some_and(|count| refresh >= count) {
            break;
        }
        std::thread::sleep(interval);
    }
    Ok(0)
}

pub(super) fn run_datasheet_command(
    config: ReactorConfig,
    args: DatasheetArgs,
) -> Result<i32, CliError> {
    let parameters = args.reactor.resolve(&config);
    let evaluation = evaluate(&parameters).map_err(CliError::Compute)?;
    write_datasheet(&args.output, &evaluation, Utc::now()).map_err(CliError::Compute)?;
    println!("Datasheet: {}", args.output.display());
    Ok(0)
}

pub(super) fn run_log_command(config: ReactorConfig, args: LogArgs) -> Result<i32, CliError> {
    if args.push_cloud && !args.cloud.is_configured(&config) {
        return Err(CliError::Usage(
            "--push-cloud needs --cloud-url, OH_PLASMA_CLOUD_URL or a 'cloud' config section"
                .to_string(),
        ));
    }

    let parameters = args.reactor.resolve(&config);
    let evaluation = evaluate(&parameters).map_err(CliError::Compute)?;
    let record = MeasurementRecord::from_evaluation(&evaluation, Utc::now());

    append_measurement(&args.output, &record).map_err(CliError::Compute)?;
    if args.push_cloud {
        let store = CloudStore::new(args.cloud.resolve(&config)).map_err(CliError::Compute)?;
        store.append_log(&record).map_err(CliError::Compute)?;
    }
    println!(
        "Logged {:.1} W, OH {:.3} ppm, O3 {:.3} ppm to {}",
        record.power_w,
        record.hydroxyl_ppm,
        record.ozone_ppm,
        args.output.display()
    );
    Ok(0)
}
