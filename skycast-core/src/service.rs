use chrono::{FixedOffset, Offset, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use crate::{
    Config,
    aggregate::aggregate_with_offset,
    error::LookupError,
    metrics::{HealthReadout, ObservabilityRecorder},
    model::Units,
    provider::WeatherClient,
    theme::theme_for,
    view::{ViewModel, assemble},
};

/// Outcome of a lookup as the UI should render it.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    Ready(ViewModel),
    NoData {
        message: String,
        /// Last successful lookup, if any.
        previous: Option<ViewModel>,
    },
}

/// Runs one city lookup end to end: provider call, aggregation, theming
/// and assembly. Keeps the most recent successful view model.
#[derive(Debug)]
pub struct WeatherService {
    client: Box<dyn WeatherClient>,
    recorder: ObservabilityRecorder,
    units: Units,
    forecast_days: usize,
    latest: Mutex<Option<ViewModel>>,
}

impl WeatherService {
    pub fn new(client: Box<dyn WeatherClient>, recorder: ObservabilityRecorder, config: &Config) -> Self {
        Self {
            client,
            recorder,
            units: config.units,
            forecast_days: config.forecast_days.max(1),
            latest: Mutex::new(None),
        }
    }

    pub fn recorder(&self) -> &ObservabilityRecorder {
        &self.recorder
    }

    pub fn health(&self) -> HealthReadout {
        self.recorder.readout()
    }

    pub fn latest(&self) -> Option<ViewModel> {
        self.latest.lock().clone()
    }

    #[instrument(skip(self))]
    pub async fn lookup(&self, city: &str) -> Result<ViewModel, LookupError> {
        let (current, points) = self
            .recorder
            .time(self.client.fetch_current_and_forecast(city))
            .await?;

        let offset = FixedOffset::east_opt(current.utc_offset_secs).unwrap_or_else(|| Utc.fix());
        let mut daily = aggregate_with_offset(&points, offset)?;
        daily.truncate(self.forecast_days);
        debug!(days = daily.len(), points = points.len(), "forecast aggregated");

        let theme = theme_for(current.condition);
        let view = assemble(Some(current), daily, theme, self.units)?.with_health(self.health());

        info!(city = %view.display_name, condition = %view.current.condition, "lookup succeeded");
        *self.latest.lock() = Some(view.clone());
        Ok(view)
    }

    /// Like [`lookup`](Self::lookup), but degrades any failure to
    /// [`RenderState::NoData`].
    pub async fn render(&self, city: &str) -> RenderState {
        match self.lookup(city).await {
            Ok(view) => RenderState::Ready(view),
            Err(err) => RenderState::NoData {
                message: err.to_string(),
                previous: self.latest(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{AggregateError, ProviderError},
        model::{ConditionCategory, Coordinates, CurrentConditions, RawForecastPoint},
    };
    use async_trait::async_trait;
    use chrono::TimeZone;

    #[derive(Debug)]
    struct StubClient {
        points: Vec<RawForecastPoint>,
    }

    fn current(city: &str) -> CurrentConditions {
        CurrentConditions {
            city_name: city.to_string(),
            country: Some("XX".to_string()),
            coordinates: Coordinates { lat: 0.0, lon: 0.0 },
            temperature: 20.0,
            feels_like: 19.0,
            description: "light snow".to_string(),
            condition: ConditionCategory::Snow,
            icon_id: "13d".to_string(),
            humidity_pct: 50,
            wind_speed: 1.0,
            pressure_hpa: 1013.0,
            visibility_m: None,
            sunrise: Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap(),
            observed_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            utc_offset_secs: 0,
        }
    }

    fn daily_points(days: u32) -> Vec<RawForecastPoint> {
        (1..=days)
            .map(|d| RawForecastPoint {
                timestamp: Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap().timestamp(),
                temperature: f64::from(d),
                condition: ConditionCategory::Clear,
                icon_id: "01d".to_string(),
                wind_speed: 1.0,
            })
            .collect()
    }

    #[async_trait]
    impl WeatherClient for StubClient {
        async fn fetch_current_and_forecast(
            &self,
            city: &str,
        ) -> Result<(CurrentConditions, Vec<RawForecastPoint>), ProviderError> {
            match city {
                "Atlantis" => Err(ProviderError::CityNotFound(city.to_string())),
                _ => Ok((current(city), self.points.clone())),
            }
        }
    }

    fn service(points: Vec<RawForecastPoint>) -> WeatherService {
        WeatherService::new(
            Box::new(StubClient { points }),
            ObservabilityRecorder::new(10),
            &Config::default(),
        )
    }

    #[tokio::test]
    async fn lookup_truncates_to_forecast_days() {
        let service = service(daily_points(6));

        let view = service.lookup("Oslo").await.unwrap();

        assert_eq!(view.daily.len(), 5);
        assert_eq!(view.theme.background_id, "snow");
        assert_eq!(view.display_name, "Oslo, XX");
        let health = view.health.expect("health attached");
        assert_eq!(health.samples, 1);
        assert_eq!(health.availability_ratio, 1.0);
    }

    #[tokio::test]
    async fn failures_are_recorded_and_degrade_to_no_data() {
        let service = service(daily_points(2));

        service.lookup("Oslo").await.unwrap();
        let state = service.render("Atlantis").await;

        match state {
            RenderState::NoData { message, previous } => {
                assert!(message.contains("Atlantis"));
                assert_eq!(previous.map(|v| v.current.city_name), Some("Oslo".to_string()));
            }
            RenderState::Ready(_) => panic!("expected no data"),
        }
        assert!((service.recorder().availability_ratio() - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_forecast_is_an_aggregate_error() {
        let service = service(vec![]);

        let err = service.lookup("Oslo").await.unwrap_err();

        assert_eq!(err, LookupError::Aggregate(AggregateError::EmptyInput));
        assert_eq!(service.latest(), None);
        // the provider call itself succeeded
        assert_eq!(service.health().availability_ratio, 1.0);
    }
}
