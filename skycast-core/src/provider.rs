use crate::{
    Config,
    error::ProviderError,
    model::{CurrentConditions, RawForecastPoint},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and the raw forecast feed for a city.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current_and_forecast(
        &self,
        city: &str,
    ) -> Result<(CurrentConditions, Vec<RawForecastPoint>), ProviderError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherClient>> {
    let api_key = config.api_key()?;
    let client = OpenWeatherClient::from_config(api_key, config)?;
    Ok(Box::new(client))
}
