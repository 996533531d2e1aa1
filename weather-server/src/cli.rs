use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{Config, RequestMetrics, WeatherLookupService};

use crate::app::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather lookup service")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Address to listen on, e.g. "127.0.0.1:8081".
        #[arg(long)]
        bind: Option<String>,

        /// Do not persist lookups.
        #[arg(long)]
        no_storage: bool,
    },

    /// Look up the weather for a city once and print it.
    Lookup {
        /// City identifier, e.g. "Paris,FR". Defaults to the configured city.
        city: Option<String>,
    },

    /// Configure the provider API key and default city.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind, no_storage } => {
                let mut config = Config::load(self.config.as_deref())?;
                if let Some(bind) = bind {
                    config.server.bind = bind;
                }
                if no_storage {
                    config.storage.enabled = false;
                }
                serve(config).await
            }
            Command::Lookup { city } => {
                let config = Config::load(self.config.as_deref())?;
                let service = WeatherLookupService::from_config(&config).await?;
                let display = service.get_weather(city.as_deref()).await?;
                println!("{}: {}", display.city, display.summary);
                Ok(())
            }
            Command::Configure => configure(self.config),
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let service = WeatherLookupService::from_config(&config).await?;
    let metrics = RequestMetrics::new().context("Failed to register request metrics")?;

    let state = AppState {
        service: service.clone(),
        metrics,
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!(
        addr = %config.server.bind,
        storage = config.storage.enabled,
        "weather service listening"
    );

    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    if let Some(store) = service.store() {
        store.close().await;
    }
    tracing::info!("weather service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match path {
        Some(p) => p,
        None => Config::config_file_path()?,
    };
    let mut config = Config::load_file(&path)?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let default_city = inquire::Text::new("Default city:")
        .with_default(&config.server.default_city)
        .prompt()
        .context("Failed to read default city")?;
    config.server.default_city = default_city;

    config.save(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
