use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gridcast::{BackendRegistry, Coordinate, Granularity, GridcastConfig, WeatherGovBackend};

#[derive(Parser, Debug)]
#[command(name = "gridcast")]
#[command(about = "Multi-day forecasts from the weather.gov gridpoint API")]
#[command(version)]
struct Cli {
    /// Location as "lat,lon", e.g. 39.7456,-97.0892
    #[arg(allow_hyphen_values = true)]
    location: String,

    /// Number of days to return
    #[arg(short, long)]
    days: Option<usize>,

    /// Period length: hour or day
    #[arg(short, long)]
    granularity: Option<Granularity>,

    /// Configuration file [default: <config dir>/gridcast/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    verbose: bool,
}

fn init_logging(config: &GridcastConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gridcast={level},warn")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = GridcastConfig::load_from_path(cli.config)?;
    if let Some(days) = cli.days {
        config.forecast.num_days = days;
    }
    if let Some(granularity) = cli.granularity {
        config.forecast.granularity = granularity;
    }
    config.validate()?;

    init_logging(&config, cli.verbose);

    let location: Coordinate = cli.location.parse()?;

    let mut registry = BackendRegistry::new();
    registry.register(WeatherGovBackend::from_config(&config)?);

    let backend = registry.get(&config.forecast.backend)?;
    info!(
        "Fetching {} day(s) for {} from {}",
        config.forecast.num_days,
        location,
        backend.name()
    );

    let forecast = backend.fetch(location, config.forecast.num_days)?;
    println!("{}", serde_json::to_string_pretty(&forecast)?);

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        if let Some(forecast_err) = err.downcast_ref::<gridcast::ForecastError>() {
            error!("{forecast_err}");
            eprintln!("{}", forecast_err.user_message());
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
