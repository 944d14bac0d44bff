use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    Config,
    config::DEFAULT_BASE_URL,
    error::ProviderError,
    model::{ConditionCategory, Coordinates, CurrentConditions, RawForecastPoint, Units},
};

use super::WeatherClient;

/// Client for the OpenWeatherMap 2.5 `weather` and `forecast` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    units: Units,
    lang: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn from_config(api_key: String, config: &Config) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::ProviderUnavailable(format!("HTTP client setup failed: {e}")))?;

        let base_url = if config.base_url.trim().is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            config.base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            api_key,
            base_url,
            units: config.units,
            lang: config.lang.clone(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(endpoint, &e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| transport_error(endpoint, &e))?;

        if !status.is_success() {
            return Err(status_error(status, &body, city));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::MalformedResponse(format!("OpenWeather {endpoint} JSON: {e}"))
        })
    }

    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, ProviderError> {
        let parsed: OwCurrentResponse = self.get_json("weather", city).await?;
        parsed.validate()
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Vec<RawForecastPoint>, ProviderError> {
        let parsed: OwForecastResponse = self.get_json("forecast", city).await?;
        parsed.validate()
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self), fields(units = %self.units))]
    async fn fetch_current_and_forecast(
        &self,
        city: &str,
    ) -> Result<(CurrentConditions, Vec<RawForecastPoint>), ProviderError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ProviderError::CityNotFound(String::new()));
        }

        let (current, forecast) =
            tokio::try_join!(self.fetch_current(city), self.fetch_forecast(city))?;

        debug!(points = forecast.len(), "OpenWeather lookup complete");
        Ok((current, forecast))
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lon: f64,
    lat: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u16,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    weather: Vec<OwWeather>,
    main: OwMain,
    visibility: Option<u32>,
    wind: OwWind,
    dt: i64,
    sys: OwSys,
    timezone: i32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl OwCurrentResponse {
    fn validate(self) -> Result<CurrentConditions, ProviderError> {
        let weather = primary_weather(&self.weather, "current")?;
        finite(self.main.temp, "current temperature")?;
        finite(self.main.feels_like, "current feels_like")?;

        Ok(CurrentConditions {
            city_name: self.name,
            country: self.sys.country.filter(|c| !c.is_empty()),
            coordinates: Coordinates {
                lat: self.coord.lat,
                lon: self.coord.lon,
            },
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            description: weather.description.clone(),
            condition: ConditionCategory::classify(weather.id, &weather.main),
            icon_id: weather.icon.clone(),
            humidity_pct: self.main.humidity,
            wind_speed: self.wind.speed,
            pressure_hpa: self.main.pressure,
            visibility_m: self.visibility,
            sunrise: unix_to_utc(self.sys.sunrise)?,
            sunset: unix_to_utc(self.sys.sunset)?,
            observed_at: unix_to_utc(self.dt)?,
            utc_offset_secs: self.timezone,
        })
    }
}

impl OwForecastResponse {
    fn validate(self) -> Result<Vec<RawForecastPoint>, ProviderError> {
        if self.list.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "OpenWeather forecast response contained no data".to_string(),
            ));
        }

        self.list
            .into_iter()
            .map(|entry| -> Result<RawForecastPoint, ProviderError> {
                let weather = primary_weather(&entry.weather, "forecast")?;
                finite(entry.main.temp, "forecast temperature")?;
                unix_to_utc(entry.dt)?;

                Ok(RawForecastPoint {
                    timestamp: entry.dt,
                    temperature: entry.main.temp,
                    condition: ConditionCategory::classify(weather.id, &weather.main),
                    icon_id: weather.icon.clone(),
                    wind_speed: entry.wind.speed,
                })
            })
            .collect()
    }
}

fn primary_weather<'a>(weather: &'a [OwWeather], what: &str) -> Result<&'a OwWeather, ProviderError> {
    let first = weather.first().ok_or_else(|| {
        ProviderError::MalformedResponse(format!("OpenWeather {what} entry has no weather data"))
    })?;

    if first.icon.trim().is_empty() {
        return Err(ProviderError::MalformedResponse(format!(
            "OpenWeather {what} entry has an empty icon id"
        )));
    }

    Ok(first)
}

fn finite(value: f64, what: &str) -> Result<(), ProviderError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProviderError::MalformedResponse(format!("{what} is not a number")))
    }
}

/// 2000-01-01T00:00:00Z
const MIN_PLAUSIBLE_TS: i64 = 946_684_800;
/// 2200-01-01T00:00:00Z
const MAX_PLAUSIBLE_TS: i64 = 7_258_118_400;

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, ProviderError> {
    if !(MIN_PLAUSIBLE_TS..MAX_PLAUSIBLE_TS).contains(&ts) {
        return Err(ProviderError::MalformedResponse(format!("timestamp {ts} out of range")));
    }
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| ProviderError::MalformedResponse(format!("timestamp {ts} out of range")))
}

fn status_error(status: StatusCode, body: &str, city: &str) -> ProviderError {
    match status {
        StatusCode::NOT_FOUND => ProviderError::CityNotFound(city.to_string()),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ => ProviderError::ProviderUnavailable(format!(
            "request failed with status {status}: {}",
            truncate_body(body)
        )),
    }
}

fn transport_error(endpoint: &str, err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::ProviderUnavailable(format!("OpenWeather {endpoint} request timed out"))
    } else {
        ProviderError::ProviderUnavailable(format!("OpenWeather {endpoint} request failed: {err}"))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
