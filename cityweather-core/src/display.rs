//! What the user currently sees, and how a lookup outcome changes it.

use tracing::warn;

use crate::{
    chart::ChartSeries,
    error::QueryError,
    model::{DisplayUnit, WeatherReading},
    query::QueryOutcome,
    units::format_temperature,
};

const UNEXPECTED_MESSAGE: &str =
    "Unexpected Error:\nthe weather service returned an unexpected response";

/// Presentation state owned by the shell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub city: Option<String>,
    pub reading: Option<WeatherReading>,
    pub temperature_text: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub icon: Option<Vec<u8>>,
    pub error: Option<String>,
    pub chart: Option<ChartSeries>,
}

impl DisplayState {
    pub fn apply(&mut self, outcome: QueryOutcome) {
        match outcome {
            QueryOutcome::Updated(view) => {
                self.city = Some(view.city);
                self.temperature_text = Some(view.temperature_text);
                self.description = Some(view.reading.condition_description.clone());
                self.icon_url = Some(view.icon_url);
                self.reading = Some(view.reading);
                self.icon = None;
                self.error = None;
                if let Some(chart) = view.chart {
                    self.chart = Some(chart);
                }
            }
            QueryOutcome::Unchanged => {}
            QueryOutcome::Failed(err) => self.show_error(&err),
        }
    }

    /// Replace the weather panel with an error message. The chart is left as is.
    pub fn show_error(&mut self, err: &QueryError) {
        self.error = Some(error_message(err));
        self.city = None;
        self.reading = None;
        self.temperature_text = None;
        self.description = None;
        self.icon_url = None;
        self.icon = None;
    }

    pub fn set_icon(&mut self, bytes: Vec<u8>) {
        self.icon = Some(bytes);
    }

    /// Re-format the shown temperature after the user picks another unit.
    pub fn change_unit(&mut self, unit: DisplayUnit) {
        if let Some(reading) = &self.reading {
            self.temperature_text = Some(format_temperature(reading.temperature_kelvin, unit));
        }
    }

    pub fn has_weather(&self) -> bool {
        self.temperature_text.is_some()
    }
}

/// User-facing text for a failed lookup.
pub fn error_message(err: &QueryError) -> String {
    if err.is_request_error() {
        format!("Request Error:\n{err}")
    } else {
        warn!(error = %err, "showing generic error for unexpected payload");
        UNEXPECTED_MESSAGE.to_string()
    }
}
