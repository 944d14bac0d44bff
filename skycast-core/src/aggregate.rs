//! Reduction of the provider's multi-timestamp forecast feed to one summary
//! per calendar day.
//!
//! Days are keyed by the calendar date of each timestamp in a fixed UTC
//! offset. [`aggregate`] uses UTC itself; [`aggregate_with_offset`] takes
//! the city's offset so evening readings are not shifted onto the next day.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Timelike, Utc};

use crate::{
    error::AggregateError,
    model::{DailySummary, RawForecastPoint},
};

/// Points further than this from 12:00 are never picked as representative.
pub const MIDDAY_WINDOW_SECS: i64 = 3 * 60 * 60;

/// Aggregate forecast points grouped by UTC calendar date.
pub fn aggregate(points: &[RawForecastPoint]) -> Result<Vec<DailySummary>, AggregateError> {
    aggregate_with_offset(points, Utc.fix())
}

/// Aggregate forecast points grouped by calendar date in `offset`.
pub fn aggregate_with_offset(
    points: &[RawForecastPoint],
    offset: FixedOffset,
) -> Result<Vec<DailySummary>, AggregateError> {
    if points.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let mut days: BTreeMap<NaiveDate, Vec<(NaiveDateTime, &RawForecastPoint)>> = BTreeMap::new();
    for point in points {
        let local = local_time(point.timestamp, offset)
            .ok_or(AggregateError::TimestampOutOfRange(point.timestamp))?;
        days.entry(local.date()).or_default().push((local, point));
    }

    let summaries = days
        .into_iter()
        .map(|(date, mut entries)| {
            // stable: equal timestamps keep feed order
            entries.sort_by_key(|(local, _)| *local);
            summarize(date, &entries)
        })
        .collect();

    Ok(summaries)
}

fn summarize(date: NaiveDate, entries: &[(NaiveDateTime, &RawForecastPoint)]) -> DailySummary {
    let count = entries.len() as f64;
    let average_temperature = entries.iter().map(|(_, p)| p.temperature).sum::<f64>() / count;
    let average_wind_speed = entries.iter().map(|(_, p)| p.wind_speed).sum::<f64>() / count;

    let representative = midday_point(entries).unwrap_or(entries[0].1);

    DailySummary {
        date,
        average_temperature,
        representative_condition: representative.condition,
        representative_icon: representative.icon_id.clone(),
        average_wind_speed,
    }
}

/// Point closest to 12:00 within [`MIDDAY_WINDOW_SECS`]; earlier wins ties.
///
/// `entries` must be sorted ascending, `min_by_key` keeps the first minimum.
fn midday_point<'a>(
    entries: &[(NaiveDateTime, &'a RawForecastPoint)],
) -> Option<&'a RawForecastPoint> {
    const NOON_SECS: i64 = 12 * 60 * 60;

    entries
        .iter()
        .map(|(local, point)| {
            let distance = (i64::from(local.num_seconds_from_midnight()) - NOON_SECS).abs();
            (distance, *point)
        })
        .filter(|(distance, _)| *distance <= MIDDAY_WINDOW_SECS)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, point)| point)
}

/// `None` when the timestamp, or its shift by `offset`, leaves chrono's range.
fn local_time(timestamp: i64, offset: FixedOffset) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)?
        .naive_utc()
        .checked_add_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
}
