//! Series handed to whatever draws the forecast chart.

use crate::model::ForecastPoint;

/// Number of forecast entries plotted (3-hour steps).
pub const FORECAST_POINTS: usize = 8;

pub const X_LABEL: &str = "Date and Time";
pub const Y_LABEL: &str = "Temperature (°C)";

const X_TICK_FORMAT: &str = "%Y-%m-%d %I:%M %p";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ForecastPoint>,
}

impl ChartSeries {
    pub fn forecast(city: &str, points: Vec<ForecastPoint>) -> Self {
        Self {
            title: format!("8-Hour Temperature Forecast for {city}"),
            x_label: X_LABEL,
            y_label: Y_LABEL,
            points,
        }
    }

    /// X-axis tick labels, one per point.
    pub fn x_ticks(&self) -> Vec<String> {
        self.points.iter().map(|p| p.timestamp.format(X_TICK_FORMAT).to_string()).collect()
    }

    /// `(min, max)` of the Celsius values, `None` for an empty series.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.temperature_celsius).fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}
