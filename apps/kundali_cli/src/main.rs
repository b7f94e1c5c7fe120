use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kundali::chart::{ChartSettings, NowSettings};
use kundali::{ApiResponse, ChartService, CommandZoneLookup, Ephemeris, FixedEphemeris, FixedZoneLookup, ZoneLookup};
use kundali_config::LoadedSettings;

#[derive(Parser)]
#[command(name = "kundali", about = "Vedic birth chart calculator")]
struct Cli {
    /// Settings file (defaults to configs/kundali.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Precomputed position table (.toml or .json), overrides the config
    #[arg(long, global = true)]
    positions: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chart for a query string, e.g. "latitude=28.6&longitude=77.2&year=2023&..."
    Calculate {
        query: String,
    },
    /// Chart for the current moment
    Now {
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<String>,
        /// IANA zone id or fixed offset such as +03:30
        #[arg(long, allow_hyphen_values = true)]
        time_zone: Option<String>,
    },
    /// Liveness check
    Ping,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    let loaded = kundali_config::load(cli.config.as_deref())?;
    match &loaded.source {
        Some(path) => log::info!("Loaded settings from {}", path.display()),
        None => log::info!("No settings file found, using defaults"),
    }

    let service = build_service(&loaded, cli.positions.as_deref())?;
    let response = match cli.command {
        Commands::Calculate { query } => service.calculate_query(&query),
        Commands::Now {
            latitude,
            longitude,
            time_zone,
        } => service.now(latitude.as_deref(), longitude.as_deref(), time_zone.as_deref()),
        Commands::Ping => service.ping(),
    };
    print_response(&response)
}

fn build_service(loaded: &LoadedSettings, positions: Option<&Path>) -> anyhow::Result<ChartService> {
    let settings = &loaded.settings;
    let chart = ChartSettings {
        default_vargas: settings.chart.default_vargas.clone(),
        default_nesting: settings.chart.default_nesting,
        max_nesting: settings.chart.max_nesting,
        now: NowSettings {
            latitude: settings.now.latitude,
            longitude: settings.now.longitude,
            nesting: settings.now.nesting,
            vargas: settings.now.vargas.clone(),
            time_zone: settings.now.time_zone.clone(),
        },
    };

    let zones: Box<dyn ZoneLookup + Send + Sync> = match &settings.timezone.command {
        Some(program) => Box::new(CommandZoneLookup::new(program.clone(), settings.timezone.args.clone())),
        None => Box::new(FixedZoneLookup::new(settings.timezone.fallback.clone())),
    };

    let table = positions.map(Path::to_path_buf).or_else(|| loaded.positions_path());
    let ephemeris = build_ephemeris(loaded, table)?;
    Ok(ChartService::new(ephemeris, zones, chart))
}

fn build_ephemeris(
    loaded: &LoadedSettings,
    table: Option<PathBuf>,
) -> anyhow::Result<Box<dyn Ephemeris + Send + Sync>> {
    if let Some(path) = table {
        log::info!("Using position table {}", path.display());
        let ephemeris = FixedEphemeris::load(&path)
            .with_context(|| format!("Failed to load position table {}", path.display()))?;
        return Ok(Box::new(ephemeris));
    }
    swiss_ephemeris(loaded)
}

#[cfg(feature = "swisseph")]
fn swiss_ephemeris(loaded: &LoadedSettings) -> anyhow::Result<Box<dyn Ephemeris + Send + Sync>> {
    let ephemeris = &loaded.settings.ephemeris;
    let path = ephemeris.path.as_deref().map(|p| loaded.resolve(p));
    let adapter = kundali::ephemeris::SwissEphemerisAdapter::new(path, &ephemeris.ayanamsa)?;
    Ok(Box::new(adapter))
}

#[cfg(not(feature = "swisseph"))]
fn swiss_ephemeris(_loaded: &LoadedSettings) -> anyhow::Result<Box<dyn Ephemeris + Send + Sync>> {
    anyhow::bail!("No position table configured and the swisseph feature is disabled (pass --positions)")
}

fn print_response(response: &ApiResponse) -> anyhow::Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    if response.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        log::warn!("Request finished with status {}", response.status);
        Ok(ExitCode::FAILURE)
    }
}
