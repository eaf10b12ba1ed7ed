use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stormwatch_core::config::API_KEY_ENV;
use stormwatch_core::{AppError, Config, ConfigError, LocationConfig, LocationProviderKind};
use stormwatch_services::{FavoritesStore, KeyValueStore, MemoryStore, SqliteStore};
use stormwatch_ui::{format_clock, spawn_clock, LookupSettings, WeatherModel};
use stormwatch_weather::{
    Coordinates, FixedLocation, GeolocationOptions, IpGeolocator, LocationProvider,
    OpenWeatherClient, UnsupportedLocation,
};

mod render;

#[derive(Parser)]
#[command(name = "stormwatch", version, about = "Current weather and a daily outlook", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Keep favorites and the last city in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a city by name
    Search {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    /// Look up the current position
    Locate {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Look up the last viewed city
    Last,
    /// Look up the configured default city
    Default,
    /// Manage favorite cities
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Keep the display open, refreshing the clock until Ctrl-C
    Watch {
        #[arg(num_args = 0..)]
        city: Vec<String>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    /// Look up a city and bookmark it under the name the service returns
    Add {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    Remove {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    /// Look up a bookmarked city
    Show {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    stormwatch_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::debug!("Config directory: {}", config.config_dir.display());

    let store = open_store(&config, cli.ephemeral)?;

    // Bookmark bookkeeping works without a weather service
    match &cli.command {
        Commands::Favorites { action: None }
        | Commands::Favorites {
            action: Some(FavoritesAction::List),
        } => {
            let favorites = FavoritesStore::new(store);
            print!("{}", render::favorites(&favorites.list(), None));
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Favorites {
            action: Some(FavoritesAction::Remove { city }),
        } => {
            let favorites = FavoritesStore::new(store);
            favorites.remove(&city.join(" "))?;
            print!("{}", render::favorites(&favorites.list(), None));
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let mut model = build_model(&config, store)?;
    let symbol = config.weather.units.temperature_symbol();
    model.set_clock(format_clock(&chrono::Local::now()));

    match cli.command {
        Commands::Search { city } => model.search_city(&city.join(" ")).await,
        Commands::Locate { lat, lon } => match lat.zip(lon) {
            Some((latitude, longitude)) => {
                model
                    .search_coordinates(Coordinates {
                        latitude,
                        longitude,
                    })
                    .await
            }
            None => {
                let provider = location_provider(&config.location)?;
                model.locate(provider.as_ref()).await;
            }
        },
        Commands::Last => {
            if !model.restore_last().await {
                println!("No city viewed yet. Try `stormwatch search <city>`.");
                return Ok(ExitCode::SUCCESS);
            }
        }
        Commands::Default => model.use_default_city().await,
        Commands::Favorites {
            action: Some(FavoritesAction::Add { city }),
        } => {
            model.search_city(&city.join(" ")).await;
            model.add_current_to_favorites();
            let current = model.view().weather.as_ref().map(|w| w.city.as_str());
            print!("{}", render::favorites(&model.view().favorites, current));
        }
        Commands::Favorites {
            action: Some(FavoritesAction::Show { city }),
        } => model.select_favorite(&city.join(" ")).await,
        Commands::Favorites { .. } => {}
        Commands::Watch { city } => {
            if !city.is_empty() {
                model.search_city(&city.join(" ")).await;
            } else if !model.restore_last().await {
                model.use_default_city().await;
            }
            let interval = Duration::from_secs(config.ui.clock_interval_secs);
            watch(&mut model, interval, symbol, tokio::signal::ctrl_c()).await;
            return Ok(ExitCode::SUCCESS);
        }
    }

    print!("{}", render::view(model.view(), symbol));

    if model.view().error.is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn open_store(config: &Config, ephemeral: bool) -> Result<Arc<dyn KeyValueStore>> {
    if ephemeral {
        tracing::info!("Using in-memory storage");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(Arc::new(store))
}

fn build_model(config: &Config, store: Arc<dyn KeyValueStore>) -> Result<WeatherModel> {
    if !config.weather.is_configured() {
        let err = AppError::from(ConfigError::MissingSetting(format!(
            "weather.api_key (or {})",
            API_KEY_ENV
        )));
        return Err(err.into());
    }

    let timeout = Duration::from_secs(config.weather.request_timeout_secs);
    let client = OpenWeatherClient::with_timeout(config.weather.api_key.clone(), timeout)?
        .with_base_url(&config.weather.base_url)
        .with_units(config.weather.units.as_query());

    let settings = LookupSettings {
        samples_per_day: config.weather.samples_per_day,
        default_city: config.weather.default_city.clone(),
        geolocation: GeolocationOptions {
            timeout: Duration::from_secs(config.location.timeout_secs),
            maximum_age: Duration::from_secs(config.location.maximum_age_secs),
        },
    };

    Ok(WeatherModel::new(Arc::new(client), store, settings))
}

fn location_provider(config: &LocationConfig) -> Result<Box<dyn LocationProvider>> {
    let provider: Box<dyn LocationProvider> = match config.provider {
        LocationProviderKind::Ip => Box::new(IpGeolocator::new(config.ip_lookup_url.clone())?),
        LocationProviderKind::Fixed => {
            let (latitude, longitude) = config
                .latitude
                .zip(config.longitude)
                .context("Fixed location needs location.latitude and location.longitude")?;
            Box::new(FixedLocation(Coordinates {
                latitude,
                longitude,
            }))
        }
        LocationProviderKind::None => Box::new(UnsupportedLocation),
    };
    Ok(provider)
}

/// Redraw on every clock tick until `shutdown` resolves.
async fn watch<F: Future>(
    model: &mut WeatherModel,
    interval: Duration,
    symbol: &str,
    shutdown: F,
) {
    let (mut clock, handle) = spawn_clock(interval);
    // Created once so a signal during a redraw is not lost
    tokio::pin!(shutdown);

    loop {
        let text = clock.borrow_and_update().clone();
        model.set_clock(text);
        // Clear the terminal and redraw from the top
        print!("\x1b[2J\x1b[H{}", render::view(model.view(), symbol));

        tokio::select! {
            changed = clock.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Stopping");
                break;
            }
        }
    }

    drop(clock);
    handle.abort();
}
