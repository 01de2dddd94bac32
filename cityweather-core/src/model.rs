use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Default host for OpenWeather condition icons.
pub const DEFAULT_ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";

/// Current conditions parsed from one current-weather response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature_kelvin: f64,
    pub condition_description: String,
    pub icon_code: String,
}

/// One forecast sample: timestamp as reported by the API, temperature in Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    pub temperature_celsius: f64,
}

/// Temperature unit chosen by the user for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl DisplayUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "celsius",
            DisplayUnit::Fahrenheit => "fahrenheit",
            DisplayUnit::Kelvin => "kelvin",
        }
    }

    /// Human label, as shown in a unit picker.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "Celsius",
            DisplayUnit::Fahrenheit => "Fahrenheit",
            DisplayUnit::Kelvin => "Kelvin",
        }
    }

    pub const fn all() -> &'static [DisplayUnit] {
        &[DisplayUnit::Celsius, DisplayUnit::Fahrenheit, DisplayUnit::Kelvin]
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown unit '{0}'. Supported units: celsius, fahrenheit, kelvin.")]
pub struct UnknownUnit(pub String);

impl FromStr for DisplayUnit {
    type Err = UnknownUnit;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "celsius" | "c" => Ok(DisplayUnit::Celsius),
            "fahrenheit" | "f" => Ok(DisplayUnit::Fahrenheit),
            "kelvin" | "k" => Ok(DisplayUnit::Kelvin),
            _ => Err(UnknownUnit(value.to_string())),
        }
    }
}

/// The upstream `cod` field.
///
/// The current-weather endpoint reports it as an integer and the forecast
/// endpoint as a string; both shapes are accepted and compared as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCode {
    Numeric(i64),
    Text(String),
}

impl StatusCode {
    pub fn is_ok(&self) -> bool {
        self.as_number() == Some(200)
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            StatusCode::Numeric(n) => Some(*n),
            StatusCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Numeric(n) => write!(f, "{n}"),
            StatusCode::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => StatusCode::Numeric(n),
            Raw::Float(x) if x.fract() == 0.0 => StatusCode::Numeric(x as i64),
            Raw::Float(x) => StatusCode::Text(x.to_string()),
            Raw::Str(s) => StatusCode::Text(s),
        })
    }
}

/// Icon image URL for an OpenWeather icon code, e.g. `10d`.
pub fn icon_url(base: &str, icon_code: &str) -> String {
    format!("{}/{icon_code}@2x.png", base.trim_end_matches('/'))
}
