use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    chart::FORECAST_POINTS,
    error::{Endpoint, QueryError, truncate_body},
    model::{ForecastPoint, StatusCode, WeatherReading, icon_url},
    units::kelvin_to_celsius,
};

use super::WeatherProvider;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    icon_base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, icon_base_url: String, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            icon_base_url,
            http,
        }
    }

    /// GET `{base_url}/{path}?q=<city>&appid=<key>` and return the body of a 2xx response.
    async fn get_city(&self, endpoint: Endpoint, path: &str, city: &str) -> Result<String, QueryError> {
        let url = format!("{}/{path}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|cause| QueryError::request(endpoint, cause))?;

        let status = res.status();
        debug!(%endpoint, %status, "OpenWeather responded");

        let body = res.text().await.map_err(|cause| QueryError::request(endpoint, cause))?;

        if !status.is_success() {
            return Err(QueryError::Status { endpoint, status, body: truncate_body(&body) });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<Option<WeatherReading>, QueryError> {
        let body = self.get_city(Endpoint::CurrentWeather, "weather", city).await?;
        parse_current(&body)
    }

    #[instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<Option<Vec<ForecastPoint>>, QueryError> {
        let body = self.get_city(Endpoint::Forecast, "forecast", city).await?;
        parse_forecast(&body)
    }

    #[instrument(skip(self))]
    async fn icon(&self, icon_code: &str) -> Result<Vec<u8>, QueryError> {
        let endpoint = Endpoint::Icon;
        let url = self.icon_url(icon_code);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|cause| QueryError::request(endpoint, cause))?;

        let status = res.status();
        if !status.is_success() {
            return Err(QueryError::Status { endpoint, status, body: String::new() });
        }

        let bytes = res.bytes().await.map_err(|cause| QueryError::request(endpoint, cause))?;
        debug!(len = bytes.len(), "icon downloaded");
        Ok(bytes.to_vec())
    }

    fn icon_url(&self, icon_code: &str) -> String {
        icon_url(&self.icon_base_url, icon_code)
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<StatusCode>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
}

/// Entries stay raw until truncated; anything past the eighth is never decoded.
#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<Value>,
}

/// Parse the body once, then check `cod` before looking at anything else.
/// `Ok(None)` means the service answered with a non-200 `cod`; nothing to show.
fn open_envelope(endpoint: Endpoint, body: &str) -> Result<Option<Value>, QueryError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| QueryError::payload(endpoint, format!("invalid JSON: {e}")))?;

    let envelope: OwEnvelope = decode(endpoint, value.clone())?;
    match envelope.cod {
        Some(cod) if cod.is_ok() => Ok(Some(value)),
        Some(cod) => {
            warn!(%endpoint, %cod, "ignoring response with non-200 cod");
            Ok(None)
        }
        None => {
            warn!(%endpoint, "ignoring response without cod");
            Ok(None)
        }
    }
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, value: Value) -> Result<T, QueryError> {
    decode_at(endpoint, "", value)
}

/// Like [`decode`], reporting paths relative to `prefix` (e.g. `list[3]`).
fn decode_at<T: DeserializeOwned>(endpoint: Endpoint, prefix: &str, value: Value) -> Result<T, QueryError> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        let path = match (prefix, e.path().to_string()) {
            ("", path) => path,
            (prefix, path) if path == "." => prefix.to_string(),
            (prefix, path) => format!("{prefix}.{path}"),
        };
        let detail = format!("{path}: {}", e.into_inner());
        warn!(%endpoint, %detail, "malformed payload");
        QueryError::payload(endpoint, detail)
    })
}

pub(crate) fn parse_current(body: &str) -> Result<Option<WeatherReading>, QueryError> {
    let endpoint = Endpoint::CurrentWeather;
    let Some(value) = open_envelope(endpoint, body)? else {
        return Ok(None);
    };

    let parsed: OwCurrentResponse = decode(endpoint, value)?;
    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| QueryError::payload(endpoint, "weather: empty array"))?;

    Ok(Some(WeatherReading {
        temperature_kelvin: parsed.main.temp,
        condition_description: weather.description,
        icon_code: weather.icon,
    }))
}

pub(crate) fn parse_forecast(body: &str) -> Result<Option<Vec<ForecastPoint>>, QueryError> {
    let endpoint = Endpoint::Forecast;
    let Some(value) = open_envelope(endpoint, body)? else {
        return Ok(None);
    };

    let parsed: OwForecastResponse = decode(endpoint, value)?;

    let points = parsed
        .list
        .into_iter()
        .take(FORECAST_POINTS)
        .enumerate()
        .map(|(i, raw)| {
            let entry: OwForecastEntry = decode_at(endpoint, &format!("list[{i}]"), raw)?;
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT).map_err(|e| {
                QueryError::payload(endpoint, format!("list[{i}].dt_txt: '{}': {e}", entry.dt_txt))
            })?;
            Ok::<_, QueryError>(ForecastPoint {
                timestamp,
                temperature_celsius: kelvin_to_celsius(entry.main.temp),
            })
        })
        .collect::<Result<Vec<_>, QueryError>>()?;

    Ok(Some(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn forecast_body(cod: Value, n: usize) -> String {
        let list: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "dt_txt": format!("2024-05-01 {:02}:00:00", (i * 3) % 24),
                    "main": { "temp": 280.0 + i as f64 }
                })
            })
            .collect();
        json!({ "cod": cod, "cnt": n, "list": list }).to_string()
    }

    #[test]
    fn current_with_int_cod_is_parsed() {
        let body = json!({
            "cod": 200,
            "name": "London",
            "main": { "temp": 300.0, "humidity": 40 },
            "weather": [{ "description": "scattered clouds", "icon": "03d" }]
        })
        .to_string();

        let reading = parse_current(&body).unwrap().expect("cod 200 yields a reading");
        assert_eq!(
            reading,
            WeatherReading {
                temperature_kelvin: 300.0,
                condition_description: "scattered clouds".into(),
                icon_code: "03d".into(),
            }
        );
    }

    #[test]
    fn current_with_string_cod_is_accepted() {
        let body = json!({
            "cod": "200",
            "main": { "temp": 280.0 },
            "weather": [{ "description": "mist", "icon": "50n" }]
        })
        .to_string();
        assert!(parse_current(&body).unwrap().is_some());
    }

    #[test]
    fn current_with_non_200_cod_is_ignored() {
        let body = json!({ "cod": 404, "message": "city not found" }).to_string();
        assert_eq!(parse_current(&body).unwrap(), None);
    }

    #[test]
    fn current_without_cod_is_ignored() {
        let body = json!({ "main": { "temp": 280.0 }, "weather": [] }).to_string();
        assert_eq!(parse_current(&body).unwrap(), None);
    }

    #[test]
    fn current_missing_temp_is_unexpected_payload() {
        let body = json!({
            "cod": 200,
            "main": {},
            "weather": [{ "description": "mist", "icon": "50n" }]
        })
        .to_string();

        let err = parse_current(&body).unwrap_err();
        assert!(!err.is_request_error());
        let msg = err.to_string();
        assert!(msg.contains("main: missing field `temp`"), "got: {msg}");
    }

    #[test]
    fn current_empty_weather_is_unexpected_payload() {
        let body = json!({ "cod": 200, "main": { "temp": 280.0 }, "weather": [] }).to_string();
        let err = parse_current(&body).unwrap_err();
        assert!(matches!(err, QueryError::UnexpectedPayload { .. }));
    }

    #[test]
    fn invalid_json_is_unexpected_payload() {
        let err = parse_current("<html>oops</html>").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn forecast_takes_first_eight_in_order() {
        let points = parse_forecast(&forecast_body(json!("200"), 40)).unwrap().unwrap();

        assert_eq!(points.len(), 8);
        for (i, p) in points.iter().enumerate() {
            let expected = 280.0 + i as f64 - 273.15;
            assert!((p.temperature_celsius - expected).abs() < 1e-9);
        }
        assert_eq!(
            points[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            points[7].timestamp,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(21, 0, 0).unwrap()
        );
    }

    #[test]
    fn forecast_with_fewer_entries_takes_all() {
        let points = parse_forecast(&forecast_body(json!("200"), 3)).unwrap().unwrap();
        assert_eq!(points.len(), 3);

        let empty = parse_forecast(&forecast_body(json!("200"), 0)).unwrap().unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn forecast_accepts_int_cod() {
        assert!(parse_forecast(&forecast_body(json!(200), 2)).unwrap().is_some());
    }

    #[test]
    fn forecast_with_non_200_cod_is_ignored() {
        assert_eq!(parse_forecast(&forecast_body(json!("401"), 2)).unwrap(), None);
    }

    #[test]
    fn forecast_bad_timestamp_is_unexpected_payload() {
        let body = json!({
            "cod": "200",
            "list": [{ "dt_txt": "2024/05/01 00:00", "main": { "temp": 280.0 } }]
        })
        .to_string();

        let err = parse_forecast(&body).unwrap_err();
        assert!(err.to_string().contains("list[0].dt_txt"), "got: {err}");
    }

    #[test]
    fn forecast_bad_entry_beyond_eighth_is_not_inspected() {
        let mut value: Value = serde_json::from_str(&forecast_body(json!("200"), 8)).unwrap();
        value["list"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "dt_txt": "not a date", "main": { "temp": 1.0 } }));
        value["list"].as_array_mut().unwrap().push(json!({ "dt_txt": "2024-05-02 03:00:00" }));

        let points = parse_forecast(&value.to_string()).unwrap().unwrap();
        assert_eq!(points.len(), 8);
    }

    #[test]
    fn forecast_malformed_entry_within_first_eight_names_its_index() {
        let mut value: Value = serde_json::from_str(&forecast_body(json!("200"), 4)).unwrap();
        value["list"][2] = json!({ "dt_txt": "2024-05-01 06:00:00" });

        let err = parse_forecast(&value.to_string()).unwrap_err();
        assert!(matches!(err, QueryError::UnexpectedPayload { .. }));
        assert!(err.to_string().contains("list[2]: missing field `main`"), "got: {err}");
    }
}
