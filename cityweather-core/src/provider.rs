use crate::{
    Config,
    error::QueryError,
    model::{ForecastPoint, WeatherReading},
    provider::openweather::OpenWeatherProvider,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Source of weather data for a city.
///
/// `Ok(None)` from the city lookups means the service reported a non-200
/// `cod`: the caller should leave whatever it is showing untouched.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<Option<WeatherReading>, QueryError>;

    /// Next [`FORECAST_POINTS`](crate::chart::FORECAST_POINTS) forecast entries, oldest first.
    async fn forecast(&self, city: &str) -> Result<Option<Vec<ForecastPoint>>, QueryError>;

    /// Raw image bytes for an icon code.
    async fn icon(&self, icon_code: &str) -> Result<Vec<u8>, QueryError>;

    fn icon_url(&self, icon_code: &str) -> String;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder.build().context("Failed to build HTTP client")?;

    Ok(Box::new(OpenWeatherProvider::new(
        api_key.to_owned(),
        config.base_url.clone(),
        config.icon_base_url.clone(),
        http,
    )))
}
