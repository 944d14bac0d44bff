//! Core library for the `skycast` weather front end.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and its validated data model
//! - Forecast aggregation (one summary per calendar day)
//! - Condition themes, the call metrics recorder and the view model
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod service;
pub mod theme;
pub mod view;

pub use aggregate::{aggregate, aggregate_with_offset};
pub use config::Config;
pub use error::{AggregateError, AssembleError, LookupError, ProviderError};
pub use metrics::{CallMetric, HealthReadout, ObservabilityRecorder};
pub use model::{ConditionCategory, CurrentConditions, DailySummary, RawForecastPoint, Units};
pub use provider::{WeatherClient, client_from_config, openweather::OpenWeatherClient};
pub use service::{RenderState, WeatherService};
pub use theme::{ThemeState, theme_for};
pub use view::{ViewModel, assemble};
