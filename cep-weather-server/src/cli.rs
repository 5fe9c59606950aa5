use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use cep_weather_core::{CepWeatherClient, Config, ReqwestFetcher, current_temperature};
use clap::{Parser, Subcommand};
use inquire::Password;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::{AppState, router};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "cep-weather",
    version,
    about = "Current temperature by Brazilian postal code (CEP)"
)]
pub struct Cli {
    /// Read configuration from this file instead of the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Address to listen on, e.g. "127.0.0.1:8080".
        #[arg(long)]
        bind: Option<String>,
    },

    /// Look up the temperature for a single CEP and print the JSON body.
    Lookup {
        /// Eight-digit postal code.
        cep: String,
    },

    /// Store the WeatherAPI.com key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let file_config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command.unwrap_or(Command::Serve { bind: None }) {
            Command::Serve { bind } => serve(file_config.with_env_overrides(), bind).await,
            Command::Lookup { cep } => lookup(file_config.with_env_overrides(), &cep).await,
            Command::Configure => configure(file_config, self.config),
        }
    }
}

fn build_client(config: &Config) -> Result<CepWeatherClient> {
    let fetch = ReqwestFetcher::new(config.request_timeout())
        .context("Failed to build HTTP client")?;
    CepWeatherClient::from_config(config, Arc::new(fetch))
}

async fn serve(config: Config, bind: Option<String>) -> Result<()> {
    let client = build_client(&config)?;
    let app = router(AppState::new(Arc::new(client)));

    let addr = bind.unwrap_or_else(|| config.bind.clone());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

async fn lookup(config: Config, cep: &str) -> Result<()> {
    let client = build_client(&config)?;

    match current_temperature(&client, Some(cep)).await {
        Ok(temperature) => {
            println!("{}", serde_json::to_string(&temperature)?);
            Ok(())
        }
        Err(err) => bail!(err),
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> Result<()> {
    let api_key = Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .with_help_message("Get one at https://www.weatherapi.com/")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_weatherapi_key(api_key.trim().to_string());

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };
    println!("Saved WeatherAPI key to {}", saved_to.display());

    Ok(())
}
