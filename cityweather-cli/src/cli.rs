use anyhow::Context;
use cityweather_core::{
    Config, DisplayState, DisplayUnit, WeatherProvider, provider_from_config, run_query,
};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use std::path::PathBuf;
use tracing::warn;

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and 8-point forecast for a city")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the default unit.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// celsius, fahrenheit or kelvin; defaults to the configured unit.
        #[arg(long, short)]
        unit: Option<DisplayUnit>,

        /// Skip the forecast table.
        #[arg(long)]
        no_chart: bool,

        /// Download the condition icon (PNG) to this path.
        #[arg(long, value_name = "PATH")]
        save_icon: Option<PathBuf>,
    },

    /// Prompt for cities until you quit.
    Interactive {
        #[arg(long, short)]
        unit: Option<DisplayUnit>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, unit, no_chart, save_icon } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let unit = unit.unwrap_or(config.default_unit);
                show(provider.as_ref(), &city, unit, !no_chart, save_icon).await
            }
            Command::Interactive { unit } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                session::run(provider.as_ref(), unit.unwrap_or(config.default_unit)).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("API key prompt aborted")?;

    let units = DisplayUnit::all().to_vec();
    let current = units.iter().position(|u| *u == config.default_unit).unwrap_or(0);
    let unit = Select::new("Default unit:", units)
        .with_starting_cursor(current)
        .prompt()
        .context("Unit prompt aborted")?;

    config.set_api_key(api_key.trim().to_string());
    config.default_unit = unit;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    provider: &dyn WeatherProvider,
    city: &str,
    unit: DisplayUnit,
    with_chart: bool,
    save_icon: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut state = DisplayState::default();
    state.apply(run_query(provider, city, unit).await);

    let icon_code = state.reading.as_ref().map(|r| r.icon_code.clone());
    if let (Some(path), Some(code)) = (save_icon, icon_code) {
        match provider.icon(&code).await {
            Ok(bytes) => {
                std::fs::write(&path, &bytes)
                    .with_context(|| format!("Failed to write icon to {}", path.display()))?;
                state.set_icon(bytes);
            }
            Err(err) => warn!(error = %err, "could not download weather icon"),
        }
    }

    print!("{}", render::panel(&state));
    if let Some(chart) = state.chart.as_ref().filter(|_| with_chart) {
        println!();
        print!("{}", render::chart(chart));
    }

    if state.error.is_none() && !state.has_weather() {
        println!("No weather data returned for '{city}'.");
    }

    Ok(())
}
