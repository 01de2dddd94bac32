//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The OpenWeather provider (current weather, forecast, icons)
//! - Temperature conversion and the forecast chart series
//! - The lookup pipeline and the display state it drives
//!
//! It is used by `cityweather-cli`, but has no terminal dependencies and can
//! back any other front end.

pub mod chart;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;
pub mod units;

pub use chart::ChartSeries;
pub use config::Config;
pub use display::DisplayState;
pub use error::{Endpoint, QueryError};
pub use model::{DisplayUnit, ForecastPoint, WeatherReading};
pub use provider::{WeatherProvider, provider_from_config};
pub use query::{QueryOutcome, WeatherView, run_query};
pub use units::format_temperature;
