use thiserror::Error;

/// Failures reported by a weather provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("City '{0}' was not found")]
    CityNotFound(String),

    #[error("Weather provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("No forecast data to aggregate")]
    EmptyInput,

    #[error("Forecast timestamp {0} is outside the representable date range")]
    TimestampOutOfRange(i64),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("Incomplete weather data: {0}")]
    IncompleteData(&'static str),
}

/// Any failure of a full city lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}
