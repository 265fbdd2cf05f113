mod commands;
mod helpers;

use clap::Parser;
use dbd_core::domain::DbdError;
use std::path::PathBuf;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let dbd_error = error.as_dbd_error();
            eprintln!("{}", dbd_error.diagnostic_line());
            eprintln!("{}", dbd_error.fatal_exit_line());
            dbd_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_tracing(cli.verbose);
            dispatch_parsed(cli.config.as_deref(), cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "oh-plasma",
    version,
    about = "DBD plasma reactor estimator for OH radical and ozone production"
)]
struct Cli {
    /// Reactor configuration file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Evaluate one operating point
    Evaluate(commands::EvaluateArgs),
    /// Tabulate power and production across a peak-voltage range
    Sweep(commands::SweepArgs),
    /// Measure active power from a Lissajous (Q-V) trace
    Lissajous(commands::LissajousArgs),
    /// Poll live sensors and re-evaluate with their humidity and temperature
    Monitor(commands::MonitorArgs),
    /// Write the plain-text technical datasheet
    Datasheet(commands::DatasheetArgs),
    /// Append the current estimate to the measurement log
    Log(commands::LogArgs),
}

fn dispatch_parsed(
    config_path: Option<&std::path::Path>,
    command: CliCommand,
) -> Result<i32, CliError> {
    let config = helpers::load_config(config_path)?;
    match command {
        CliCommand::Evaluate(args) => commands::run_evaluate_command(config, args),
        CliCommand::Sweep(args) => commands::run_sweep_command(config, args),
        CliCommand::Lissajous(args) => commands::run_lissajous_command(config, args),
        CliCommand::Monitor(args) => commands::run_monitor_command(config, args),
        CliCommand::Datasheet(args) => commands::run_datasheet_command(config, args),
        CliCommand::Log(args) => commands::run_log_command(config, args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(DbdError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_dbd_error(&self) -> DbdError {
        match self {
            Self::Usage(message) => DbdError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => DbdError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
