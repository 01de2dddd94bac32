//! One user-triggered lookup: current weather, then the forecast series.

use tracing::{debug, info};

use crate::{
    chart::ChartSeries,
    error::QueryError,
    model::{DisplayUnit, WeatherReading},
    provider::WeatherProvider,
    units::format_temperature,
};

/// Everything a successful lookup produces for display.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub city: String,
    pub reading: WeatherReading,
    pub temperature_text: String,
    pub icon_url: String,
    /// `None` when the forecast endpoint reported a non-200 `cod`.
    pub chart: Option<ChartSeries>,
}

#[derive(Debug)]
pub enum QueryOutcome {
    Updated(WeatherView),
    /// The service answered with a non-200 `cod`; nothing should change.
    Unchanged,
    Failed(QueryError),
}

/// Run a lookup for `city` and format it in `unit`.
///
/// The forecast is only requested once current weather succeeded; a failure
/// on either request fails the whole lookup.
pub async fn run_query(provider: &dyn WeatherProvider, city: &str, unit: DisplayUnit) -> QueryOutcome {
    let reading = match provider.current_weather(city).await {
        Ok(Some(reading)) => reading,
        Ok(None) => return QueryOutcome::Unchanged,
        Err(err) => return QueryOutcome::Failed(err),
    };
    debug!(?reading, "current weather received");

    let chart = match provider.forecast(city).await {
        Ok(points) => points.map(|points| ChartSeries::forecast(city, points)),
        Err(err) => return QueryOutcome::Failed(err),
    };

    let temperature_text = format_temperature(reading.temperature_kelvin, unit);
    info!(city, %temperature_text, has_chart = chart.is_some(), "lookup complete");

    QueryOutcome::Updated(WeatherView {
        city: city.to_string(),
        icon_url: provider.icon_url(&reading.icon_code),
        temperature_text,
        reading,
        chart,
    })
}
