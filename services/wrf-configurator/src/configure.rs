//! The `configure` command.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use tracing::{info, warn};

use wrf_config::{
    collect_overrides, header, ConfigurationChecker, Configurator, NamelistGenerator, Summarizer,
    Target,
};

use crate::config_loader::load_document;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Configuration document (YAML, or JSON with a .json extension)
    #[arg(long, env = "WRF_CONFIG")]
    pub config: PathBuf,

    /// Namelist to generate
    #[arg(long, value_name = "WPS|WRF", default_value = "WPS")]
    pub target: Target,

    /// Output file (default: stdout)
    #[arg(long)]
    pub ofile: Option<PathBuf>,

    /// Add/update configuration item; later values win
    #[arg(short = 'D', value_name = "K=V")]
    pub define: Vec<String>,

    /// Print configuration value for key K
    #[arg(short = 'P', long = "print", value_name = "K")]
    pub print: Vec<String>,

    /// Summarize configuration info and exit
    #[arg(long)]
    pub summarize: bool,
}

/// Run the pipeline, writing results to `out` unless `--ofile` is given.
///
/// Returns false when the configuration has structural faults; they are
/// reported on stderr and nothing is generated.
pub fn run(args: &ConfigureArgs, out: &mut dyn Write) -> Result<bool> {
    let document = load_document(&args.config)?;
    let mut configurator =
        Configurator::make(document).context("Failed to merge configuration with defaults")?;

    let overrides = collect_overrides(args.define.as_slice()).context("Invalid -D override")?;
    if !overrides.is_empty() {
        info!(count = overrides.len(), "Applying overrides");
        configurator.update(overrides)?;
    }

    let mut checker = ConfigurationChecker::new(&configurator);
    if !checker.check() {
        warn!(faults = checker.faults().len(), "Configuration rejected");
        eprintln!("Faults in the provided configuration");
        for fault in checker.faults() {
            eprintln!("{}", fault);
        }
        return Ok(false);
    }

    if args.summarize {
        let summary = Summarizer::new(&configurator)?.summarize()?;
        writeln!(out, "{}", summary)?;
        return Ok(true);
    }

    if !args.print.is_empty() {
        for key in &args.print {
            let value = configurator
                .get(key)
                .with_context(|| format!("Cannot print '{}'", key))?;
            writeln!(out, "{}", value)?;
        }
        return Ok(true);
    }

    let namelist = render_namelist(&configurator, args.target, Utc::now())?;
    match &args.ofile {
        Some(path) => {
            fs::write(path, &namelist)
                .with_context(|| format!("Failed to write namelist to {:?}", path))?;
            info!(path = %path.display(), target = %args.target, "Wrote namelist");
        }
        None => out.write_all(namelist.as_bytes())?,
    }
    Ok(true)
}

/// Header plus every section of `target`.
pub fn render_namelist(
    configurator: &Configurator,
    target: Target,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut text = header(target, VERSION, now);
    text.push_str(&NamelistGenerator::new(configurator)?.generate_target(target)?);
    Ok(text)
}
