use super::CliError;
use dbd_core::common::config::ReactorConfig;
use dbd_core::domain::{CapacitanceModel, GasTransport, ReactorParameters};
use dbd_core::model::Evaluation;
use dbd_core::sensors::{CloudSettings, ReadingOrigin, SerialSettings};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub(super) fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn load_config(path: Option<&Path>) -> Result<ReactorConfig, CliError> {
    match path {
        Some(path) => ReactorConfig::load(path).map_err(CliError::Compute),
        None => Ok(ReactorConfig::default()),
    }
}

/// Operating-point and geometry overrides shared by every command.
#[derive(clap::Args, Debug, Default)]
pub(super) struct ReactorArgs {
    /// Peak applied voltage (kV)
    #[arg(long)]
    voltage_kv: Option<f64>,

    /// Supply frequency (Hz)
    #[arg(long)]
    frequency_hz: Option<f64>,

    /// Relative humidity of the feed gas (%)
    #[arg(long)]
    humidity_pct: Option<f64>,

    /// Gas temperature (C)
    #[arg(long)]
    temperature_c: Option<f64>,

    /// Discharge gap (mm)
    #[arg(long)]
    gap_mm: Option<f64>,

    /// Active electrode length (mm)
    #[arg(long)]
    length_mm: Option<f64>,

    /// Number of reactors driven in parallel
    #[arg(long)]
    reactors: Option<u32>,

    /// Compute the barrier capacitance from the coaxial geometry
    #[arg(long)]
    coaxial: bool,

    /// Distance from the reactor outlet to the point of use (m)
    #[arg(long)]
    transport_distance_m: Option<f64>,

    /// Gas velocity along the transport line (m/s)
    #[arg(long)]
    transport_velocity_m_s: Option<f64>,

    /// Feed gas flow rate (L/min)
    #[arg(long)]
    flow_rate_l_min: Option<f64>,
}

impl ReactorArgs {
    pub(super) fn apply(&self, parameters: &mut ReactorParameters) {
        let op = &mut parameters.operating;
        if let Some(value) = self.voltage_kv {
            op.peak_voltage_kv = value;
        }
        if let Some(value) = self.frequency_hz {
            op.frequency_hz = value;
        }
        if let Some(value) = self.humidity_pct {
            op.humidity_pct = value;
        }
        if let Some(value) = self.temperature_c {
            op.temperature_c = value;
        }

        let geometry = &mut parameters.geometry;
        if let Some(value) = self.gap_mm {
            geometry.gap_mm = value;
        }
        if let Some(value) = self.length_mm {
            geometry.active_length_mm = value;
        }
        if let Some(value) = self.reactors {
            geometry.reactor_count = value;
        }
        if self.coaxial {
            parameters.capacitance = CapacitanceModel::Coaxial;
        }

        if self.transport_distance_m.is_some()
            || self.transport_velocity_m_s.is_some()
            || self.flow_rate_l_min.is_some()
        {
            let transport = parameters.transport.get_or_insert_with(GasTransport::default);
            if let Some(value) = self.transport_distance_m {
                transport.distance_m = value;
            }
            if let Some(value) = self.transport_velocity_m_s {
                transport.velocity_m_s = value;
            }
            if let Some(value) = self.flow_rate_l_min {
                transport.flow_rate_l_min = value;
            }
        }
    }

    pub(super) fn voltage_kv(&self) -> Option<f64> {
        self.voltage_kv
    }

    pub(super) fn resolve(&self, config: &ReactorConfig) -> ReactorParameters {
        let mut parameters = config.reactor;
        self.apply(&mut parameters);
        parameters
    }
}

#[derive(clap::Args, Debug, Default)]
pub(super) struct CloudArgs {
    /// Real-time database base URL
    #[arg(long, env = "OH_PLASMA_CLOUD_URL")]
    cloud_url: Option<String>,

    /// Database auth token
    #[arg(long, env = "OH_PLASMA_CLOUD_TOKEN", hide_env_values = true)]
    cloud_token: Option<String>,

    /// Sensor document path below the base URL
    #[arg(long)]
    cloud_path: Option<String>,
}

impl CloudArgs {
    pub(super) fn is_configured(&self, config: &ReactorConfig) -> bool {
        self.cloud_url.is_some() || config.cloud.is_some()
    }

    pub(super) fn resolve(&self, config: &ReactorConfig) -> CloudSettings {
        let mut settings = config.cloud.clone().unwrap_or_default();
        if let Some(url) = &self.cloud_url {
            settings.base_url = url.clone();
        }
        if let Some(token) = &self.cloud_token {
            settings.auth_token = Some(token.clone());
        }
        if let Some(path) = &self.cloud_path {
            settings.document_path = path.clone();
        }
        settings
    }
}

#[derive(clap::Args, Debug, Default)]
pub(super) struct SerialArgs {
    /// Serial device of the sensor board (e.g. /dev/ttyUSB0, COM3)
    #[arg(long, env = "OH_PLASMA_SERIAL_PORT")]
    serial_port: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    baud: Option<u32>,
}

impl SerialArgs {
    pub(super) fn resolve(&self, config: &ReactorConfig) -> SerialSettings {
        let mut settings = config.serial.clone().unwrap_or_default();
        if let Some(port) = &self.serial_port {
            settings.port = port.clone();
        }
        if let Some(baud) = self.baud {
            settings.baud_rate = baud;
        }
        settings
    }
}

pub(super) fn origin_label(origin: ReadingOrigin) -> &'static str {
    match origin {
        ReadingOrigin::Live => "live",
        ReadingOrigin::LastKnown => "last-known",
        ReadingOrigin::Default => "default",
    }
}

pub(super) fn render_evaluation_summary(evaluation: &Evaluation) -> String {
    let mut lines = vec![
        format!(
            "Threshold voltage: {:.3} kV",
            evaluation.threshold_voltage_kv
        ),
        format!(
            "Mean gap field: {:.3} kV/mm",
            evaluation.mean_field_kv_per_mm
        ),
        format!(
            "Barrier capacitance: {:.2} pF",
            evaluation.capacitance.dielectric_pf()
        ),
    ];
    if let Some(gap_pf) = evaluation.capacitance.gap_pf() {
        lines.push(format!("Gas-gap capacitance: {gap_pf:.2} pF"));
    }
    lines.push(format!("Active power: {:.1} W", evaluation.active_power_w));
    lines.push(format!("OH: {:.3} ppm", evaluation.hydroxyl_ppm));
    lines.push(format!("O3: {:.3} ppm", evaluation.ozone_ppm));
    if let Some(transport) = &evaluation.transport {
        lines.push(format!(
            "Point of use after {:.3} s: OH {:.3} ppm, O3 {:.3} ppm",
            transport.transit_time_s, transport.hydroxyl_ppm, transport.ozone_ppm
        ));
    }
    if let Some(yield_g) = evaluation.hydroxyl_g_per_kwh {
        lines.push(format!("OH energy yield: {yield_g:.3} g/kWh"));
    }
    if let Some(yield_g) = evaluation.ozone_g_per_kwh {
        lines.push(format!("O3 energy yield: {yield_g:.3} g/kWh"));
    }
    for warning in &evaluation.warnings {
        lines.push(format!("WARNING: {warning}"));
    }
    lines.join("\n")
}
