use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_label(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_label(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// Coarse weather classification used for theming and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Other,
}

impl ConditionCategory {
    /// Classify an OpenWeather condition code.
    ///
    /// Returns `None` for codes outside the documented groups so the caller
    /// can fall back to the textual label.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200..=299 => Some(Self::Thunderstorm),
            300..=399 => Some(Self::Drizzle),
            500..=599 => Some(Self::Rain),
            600..=699 => Some(Self::Snow),
            700..=799 => Some(Self::Mist),
            800 => Some(Self::Clear),
            801..=804 => Some(Self::Clouds),
            _ => None,
        }
    }

    /// Classify a free-form condition label such as "Thunderstorm" or "Haze".
    pub fn from_label(label: &str) -> Self {
        let m = label.to_lowercase();

        if m.contains("thunder") {
            Self::Thunderstorm
        } else if m.contains("drizzle") {
            Self::Drizzle
        } else if m.contains("rain") {
            Self::Rain
        } else if m.contains("snow") {
            Self::Snow
        } else if m.contains("cloud") {
            Self::Clouds
        } else if ["mist", "fog", "haze", "smoke"].iter().any(|x| m.contains(x)) {
            Self::Mist
        } else if m.contains("clear") {
            Self::Clear
        } else {
            Self::Other
        }
    }

    pub fn classify(code: u16, label: &str) -> Self {
        Self::from_code(code).unwrap_or_else(|| Self::from_label(label))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Drizzle => "drizzle",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Other => "other",
        }
    }

    pub const fn all() -> &'static [ConditionCategory] {
        &[
            Self::Clear,
            Self::Clouds,
            Self::Rain,
            Self::Drizzle,
            Self::Thunderstorm,
            Self::Snow,
            Self::Mist,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One validated timestamp from the provider's forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastPoint {
    /// Unix seconds, UTC.
    pub timestamp: i64,
    pub temperature: f64,
    pub condition: ConditionCategory,
    pub icon_id: String,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Validated current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub condition: ConditionCategory,
    pub icon_id: String,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: f64,
    pub visibility_m: Option<u32>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub observed_at: DateTime<Utc>,
    /// Shift in seconds from UTC for the city, as reported by the provider.
    pub utc_offset_secs: i32,
}

/// One representative entry per calendar day of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub average_temperature: f64,
    pub representative_condition: ConditionCategory,
    pub representative_icon: String,
    pub average_wind_speed: f64,
}
