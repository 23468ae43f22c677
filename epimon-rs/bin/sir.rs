use anyhow::{bail, Context, Result};
use clap::Parser;
use epimon::{prelude::*, utils::render_vbars};
use log::*;
use serde::{Deserialize, Serialize};
use simple_logger::SimpleLogger;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Deterministic SIR projection.
#[derive(Parser, Debug)]
#[command(name = "sir")]
struct Cli {
    /// TOML configuration file [default: sir.toml, skipped if absent].
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override a parameter, e.g. `-p beta=0.3`. May be repeated.
    #[arg(short = 'p', long = "param", value_parser = SimulationRequest::parse_pair)]
    params: Vec<(String, String)>,

    /// Write output to file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Plot the infected curve on stderr.
    #[arg(long)]
    plot: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Config {
    output: Option<PathBuf>,
    format: OutputFormat,
    plot: bool,
    verbose: bool,
    params: SimulationRequest,
}

const DEFAULT_CONFIG: &str = "sir.toml";

impl Config {
    /// Load configuration from `path`, or from `sir.toml` when no path is
    /// given. Only the implicit default file may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
            Some(path) => path,
            None if !Path::new(DEFAULT_CONFIG).exists() => {
                info!("{} not found, using default configuration", DEFAULT_CONFIG);
                return Ok(Config::default());
            }
            None => Path::new(DEFAULT_CONFIG),
        };
        let data = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let cfg = toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
        return Ok(cfg);
    }

    pub fn write_data(&self, data: &str) -> Result<()> {
        match &self.output {
            Some(path) => {
                fs::write(path, data).with_context(|| format!("cannot write {}", path.display()))?;
                info!("wrote {}", path.display());
            }
            None => println!("{}", data.trim_end()),
        }
        return Ok(());
    }
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    // The logger accepts debug records; the global filter decides what passes
    // and is raised once the config is known.
    SimpleLogger::new().with_level(LevelFilter::Debug).init()?;
    log::set_max_level(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info });

    let mut cfg = Config::load(cli.config.as_deref())?;

    cfg.verbose |= cli.verbose;
    cfg.plot |= cli.plot;
    if let Some(format) = cli.format {
        cfg.format = format;
    }
    if cli.output.is_some() {
        cfg.output = cli.output.clone();
    }
    cfg.params.apply_pairs(cli.params.iter().map(|(k, v)| (k, v)))?;

    if cfg.verbose {
        log::set_max_level(LevelFilter::Debug);
        debug!("{:#?}", cfg);
    }

    let params = cfg.params.into_params()?;
    let curve = simulate(&params);

    if let Some(summary) = curve.summary(&params) {
        info!(
            "R0 = {:.2}, peak of {:.1} infected at day {}, attack rate {:.1}%",
            summary.reproduction_number(),
            summary.peak_infected(),
            summary.peak_day(),
            100.0 * summary.attack_rate()
        );
    }

    let data = match cfg.format {
        OutputFormat::Csv => curve.render_csv(b',')?,
        OutputFormat::Json => serde_json::to_string_pretty(&SimulationResponse::from(&curve))?,
    };
    cfg.write_data(&data)?;

    if cfg.plot {
        eprint!("{}", render_vbars(&curve.col(Compartment::Infected), 20, 80));
    }
    return Ok(());
}
