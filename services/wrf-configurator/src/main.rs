//! WRF/WPS configurator.
//!
//! Turns a hierarchical domain configuration into the `namelist.wps` and
//! `namelist.input` files read by the WPS and WRF programs, and prepares
//! the `GRIBFILE.*` links `ungrib` expects.

mod config_loader;
mod configure;
mod link_grib;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use configure::ConfigureArgs;
use link_grib::LinkGribArgs;

#[derive(Parser, Debug)]
#[command(name = "wrf-configurator")]
#[command(about = "Prepare WRF/WPS configuration files", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, env = "WRF_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a namelist, print values or summarize the domains
    Configure(ConfigureArgs),
    /// Link GRIB files under the GRIBFILE.AAA, GRIBFILE.AAB, ... names
    LinkGrib(LinkGribArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() -> Result<ExitCode> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;
    debug!(command = ?args.command, "Starting wrf-configurator");

    match args.command {
        Command::Configure(configure_args) => {
            let stdout = std::io::stdout();
            let ok = configure::run(&configure_args, &mut stdout.lock())?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::LinkGrib(link_args) => {
            link_grib::run(&link_args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr; stdout is reserved for namelists and printed values.
fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}
