//! Temperature conversion and formatting.

use crate::model::DisplayUnit;

const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Convert a Kelvin temperature into `unit`.
pub fn convert(kelvin: f64, unit: DisplayUnit) -> f64 {
    match unit {
        DisplayUnit::Celsius => kelvin_to_celsius(kelvin),
        DisplayUnit::Fahrenheit => kelvin_to_celsius(kelvin) * 9.0 / 5.0 + 32.0,
        DisplayUnit::Kelvin => kelvin,
    }
}

pub fn suffix(unit: DisplayUnit) -> &'static str {
    match unit {
        DisplayUnit::Celsius => "ºC",
        DisplayUnit::Fahrenheit => "ºF",
        DisplayUnit::Kelvin => "K",
    }
}

/// Display string with one fractional digit, e.g. `"26.9 ºC"` or `"300.0 K"`.
pub fn format_temperature(kelvin: f64, unit: DisplayUnit) -> String {
    format!("{:.1} {}", convert(kelvin, unit), suffix(unit))
}
