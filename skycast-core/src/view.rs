//! Render-ready view model handed to the presentation layer.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::{
    error::AssembleError,
    metrics::HealthReadout,
    model::{CurrentConditions, DailySummary, Units},
    theme::ThemeState,
};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

pub fn icon_url(icon_id: &str) -> String {
    format!("{ICON_BASE_URL}/{icon_id}@2x.png")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub display_name: String,
    pub current: CurrentConditions,
    pub icon_url: String,
    /// Sunrise and sunset in the city's local time, `HH:MM`.
    pub sunrise_local: String,
    pub sunset_local: String,
    pub visibility_km: Option<f64>,
    pub daily: Vec<DailySummary>,
    pub theme: ThemeState,
    pub units: Units,
    pub health: Option<HealthReadout>,
}

impl ViewModel {
    pub fn with_health(mut self, health: HealthReadout) -> Self {
        self.health = Some(health);
        self
    }

    pub fn temperature_label(&self) -> &'static str {
        self.units.temperature_label()
    }

    pub fn wind_label(&self) -> &'static str {
        self.units.wind_label()
    }
}

/// Combine the pieces of a lookup into a [`ViewModel`].
pub fn assemble(
    current: Option<CurrentConditions>,
    daily: Vec<DailySummary>,
    theme: ThemeState,
    units: Units,
) -> Result<ViewModel, AssembleError> {
    let current = current.ok_or(AssembleError::IncompleteData("current conditions missing"))?;
    if daily.is_empty() {
        return Err(AssembleError::IncompleteData("daily forecast is empty"));
    }

    let display_name = match current.country.as_deref() {
        Some(country) => format!("{}, {country}", current.city_name),
        None => current.city_name.clone(),
    };

    Ok(ViewModel {
        display_name,
        icon_url: icon_url(&current.icon_id),
        sunrise_local: local_clock(current.sunrise, current.utc_offset_secs),
        sunset_local: local_clock(current.sunset, current.utc_offset_secs),
        visibility_km: current.visibility_m.map(|m| f64::from(m) / 1000.0),
        current,
        daily,
        theme,
        units,
        health: None,
    })
}

fn local_clock(at: DateTime<Utc>, utc_offset_secs: i32) -> String {
    match FixedOffset::east_opt(utc_offset_secs) {
        Some(offset) => at.with_timezone(&offset).format("%H:%M").to_string(),
        None => at.format("%H:%M").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ConditionCategory, Coordinates},
        theme::theme_for,
    };
    use chrono::{NaiveDate, TimeZone};

    fn current() -> CurrentConditions {
        CurrentConditions {
            city_name: "Warsaw".to_string(),
            country: Some("PL".to_string()),
            coordinates: Coordinates { lat: 52.23, lon: 21.01 },
            temperature: 11.5,
            feels_like: 10.2,
            description: "moderate rain".to_string(),
            condition: ConditionCategory::Rain,
            icon_id: "10d".to_string(),
            humidity_pct: 87,
            wind_speed: 4.1,
            pressure_hpa: 1008.0,
            visibility_m: Some(8500),
            sunrise: Utc.with_ymd_and_hms(2024, 3, 1, 5, 20, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2024, 3, 1, 16, 5, 0).unwrap(),
            observed_at: Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
            utc_offset_secs: 3600,
        }
    }

    fn day() -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            average_temperature: 9.0,
            representative_condition: ConditionCategory::Rain,
            representative_icon: "10d".to_string(),
            average_wind_speed: 3.5,
        }
    }

    #[test]
    fn assembles_display_fields() {
        let view = assemble(
            Some(current()),
            vec![day()],
            theme_for(ConditionCategory::Rain),
            Units::Metric,
        )
        .unwrap();

        assert_eq!(view.display_name, "Warsaw, PL");
        assert_eq!(view.icon_url, "https://openweathermap.org/img/wn/10d@2x.png");
        assert_eq!(view.sunrise_local, "06:20");
        assert_eq!(view.sunset_local, "17:05");
        assert_eq!(view.visibility_km, Some(8.5));
        assert_eq!(view.theme.background_id, "rain");
        assert_eq!(view.temperature_label(), "°C");
        assert_eq!(view.health, None);
    }

    #[test]
    fn missing_current_is_incomplete() {
        let err = assemble(None, vec![day()], theme_for(ConditionCategory::Other), Units::Metric)
            .unwrap_err();
        assert!(matches!(err, AssembleError::IncompleteData(_)));
    }

    #[test]
    fn empty_daily_is_incomplete() {
        let err = assemble(Some(current()), vec![], theme_for(ConditionCategory::Other), Units::Metric)
            .unwrap_err();
        assert!(matches!(err, AssembleError::IncompleteData(_)));
    }

    #[test]
    fn country_is_optional_in_display_name() {
        let mut current = current();
        current.country = None;

        let view = assemble(Some(current), vec![day()], theme_for(ConditionCategory::Rain), Units::Imperial)
            .unwrap();
        assert_eq!(view.display_name, "Warsaw");
        assert_eq!(view.wind_label(), "mph");
    }

    #[test]
    fn with_health_attaches_readout() {
        let readout = HealthReadout {
            availability_ratio: 0.5,
            latest_latency_ms: Some(80.0),
            samples: 2,
            window: 50,
        };
        let view = assemble(Some(current()), vec![day()], theme_for(ConditionCategory::Rain), Units::Metric)
            .unwrap()
            .with_health(readout);

        assert_eq!(view.health, Some(readout));
    }
}
