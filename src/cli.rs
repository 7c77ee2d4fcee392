//! Command-line interface parsing for WeatherLens
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`StartupConfig`]: which data source to use, the initial city,
//! and the headless `--export` / `--ask` commands.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::{CityQuery, Units};

/// City shown when none is given
pub const DEFAULT_CITY: &str = "London";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified data source is not recognized
    #[error("Invalid source: '{0}'. Valid sources: synthetic, bridge")]
    InvalidSource(String),

    /// The specified units are not recognized
    #[error("Invalid units: '{0}'. Valid units: metric, imperial")]
    InvalidUnits(String),

    /// The bridge source was chosen without an address
    #[error("The bridge source needs --bridge-url or WEATHERLENS_BRIDGE_URL")]
    MissingBridgeUrl,

    /// The city name is blank
    #[error("City name cannot be empty")]
    EmptyCity,
}

/// WeatherLens - current conditions, forecasts, air quality and a weather assistant
#[derive(Parser, Debug)]
#[command(name = "weatherlens")]
#[command(about = "Terminal weather dashboard with forecasts, air quality and a weather assistant")]
#[command(version)]
pub struct Cli {
    /// City to show on startup
    #[arg(long, value_name = "CITY")]
    pub city: Option<String>,

    /// Where weather data comes from: synthetic (generated locally) or bridge
    #[arg(long, value_name = "SOURCE", default_value = "synthetic")]
    pub source: String,

    /// Base URL of the host bridge (required for --source bridge)
    #[arg(long, value_name = "URL", env = "WEATHERLENS_BRIDGE_URL")]
    pub bridge_url: Option<String>,

    /// Measurement units: metric or imperial
    #[arg(long, value_name = "UNITS", default_value = "metric")]
    pub units: String,

    /// Language code for weather descriptions
    #[arg(long, value_name = "LANG", default_value = "en")]
    pub lang: String,

    /// Seed for generated data, for reproducible output
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Skip the simulated network and "thinking" delays of generated data
    #[arg(long)]
    pub no_latency: bool,

    /// Directory where exports are written (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Write the export for --city and exit without starting the dashboard
    #[arg(long)]
    pub export: bool,

    /// Print one assistant reply for --city and exit without starting the dashboard
    #[arg(long, value_name = "QUESTION")]
    pub ask: Option<String>,
}

/// Where weather data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Generated locally
    Synthetic { seed: Option<u64>, latency: bool },
    /// Host bridge at the given base URL
    Bridge { url: String },
}

/// What to do after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive dashboard
    Dashboard,
    /// Export the snapshot and exit
    Export,
    /// Answer one question and exit
    Ask(String),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub city: String,
    pub units: Units,
    pub lang: String,
    pub source: SourceKind,
    pub export_dir: PathBuf,
    pub command: Command,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            units: Units::Metric,
            lang: "en".to_string(),
            source: SourceKind::Synthetic {
                seed: None,
                latency: true,
            },
            export_dir: PathBuf::from("."),
            command: Command::Dashboard,
        }
    }
}

/// Parses a units argument
pub fn parse_units_arg(s: &str) -> Result<Units, CliError> {
    Units::from_str(s).ok_or_else(|| CliError::InvalidUnits(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a value is invalid or the bridge has no URL
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let city = match &cli.city {
            Some(city) if city.trim().is_empty() => return Err(CliError::EmptyCity),
            Some(city) => city.trim().to_string(),
            None => DEFAULT_CITY.to_string(),
        };

        let source = match cli.source.to_lowercase().as_str() {
            "synthetic" | "mock" | "local" => SourceKind::Synthetic {
                seed: cli.seed,
                latency: !cli.no_latency,
            },
            "bridge" | "remote" => {
                let url = cli
                    .bridge_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .ok_or(CliError::MissingBridgeUrl)?;
                SourceKind::Bridge {
                    url: url.to_string(),
                }
            }
            _ => return Err(CliError::InvalidSource(cli.source.clone())),
        };

        let command = match (&cli.ask, cli.export) {
            (Some(question), _) => Command::Ask(question.clone()),
            (None, true) => Command::Export,
            (None, false) => Command::Dashboard,
        };

        Ok(StartupConfig {
            city,
            units: parse_units_arg(&cli.units)?,
            lang: cli.lang.clone(),
            source,
            export_dir: cli.export_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            command,
        })
    }

    /// Query for the startup city
    pub fn query(&self) -> CityQuery {
        CityQuery::new(self.city.clone())
            .with_units(self.units)
            .with_lang(self.lang.clone())
    }
}
