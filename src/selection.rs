use crate::models::{ForecastResponse, ForecastSlot, WeatherSummary};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

/// Minutes-of-day for local noon, the target of slot selection.
const NOON_MINUTES: i64 = 12 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("OpenWeather: forecast response missing 'list' items.")]
    EmptyForecast,
    #[error("Requested date {requested} is outside the available forecast range. Nearest available date is {nearest}.")]
    DateUnavailable {
        requested: NaiveDate,
        nearest: NaiveDate,
    },
    #[error("OpenWeather: missing main.temp in selected forecast slot.")]
    MissingTemperature,
}

/// Select the most representative forecast slot for a requested local date.
///
/// The forecast arrives as 3-hour UTC slots plus a city-level UTC offset.
/// Every slot is shifted to local wall time, slots are grouped by local
/// calendar date, and among the requested date's slots the one closest to
/// 12:00 local wins (first occurrence wins an exact tie). When the requested
/// date is outside the forecast range the error names the nearest available
/// date so the caller can suggest it.
pub fn select_slot<'a>(
    forecast: &'a ForecastResponse,
    requested: NaiveDate,
) -> Result<(&'a ForecastSlot, NaiveDate, i32), SelectionError> {
    let tz = forecast.city.timezone;

    if forecast.list.is_empty() {
        return Err(SelectionError::EmptyForecast);
    }

    let localized: Vec<(&ForecastSlot, NaiveDateTime)> = forecast
        .list
        .iter()
        .filter_map(|slot| local_datetime(slot.dt, tz).map(|ldt| (slot, ldt)))
        .collect();

    let mut available: Vec<NaiveDate> = localized.iter().map(|(_, ldt)| ldt.date()).collect();
    available.sort_unstable();
    available.dedup();

    // Cannot be empty if the list was non-empty and timestamps were sane,
    // but a response full of out-of-range timestamps is still malformed.
    if available.is_empty() {
        return Err(SelectionError::EmptyForecast);
    }

    if available.binary_search(&requested).is_ok() {
        let slot = localized
            .iter()
            .filter(|(_, ldt)| ldt.date() == requested)
            .min_by_key(|(_, ldt)| noon_distance(ldt))
            .map(|(slot, _)| *slot)
            .ok_or(SelectionError::EmptyForecast)?;
        return Ok((slot, requested, tz));
    }

    // Strict < over the sorted dates keeps the earlier date on a tie.
    let requested_ord = i64::from(requested.num_days_from_ce());
    let nearest = available
        .iter()
        .copied()
        .min_by_key(|d| (i64::from(d.num_days_from_ce()) - requested_ord).abs())
        .ok_or(SelectionError::EmptyForecast)?;

    Err(SelectionError::DateUnavailable { requested, nearest })
}

/// Build the normalized summary for a selected slot. Temperature is the one
/// field a summary cannot do without; everything else degrades gracefully.
pub fn build_summary(
    city_name: &str,
    country: Option<&str>,
    used_date: NaiveDate,
    slot: &ForecastSlot,
) -> Result<WeatherSummary, SelectionError> {
    let temperature_c = slot.main.temp.ok_or(SelectionError::MissingTemperature)?;

    let description = slot
        .weather
        .first()
        .and_then(|c| c.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(WeatherSummary {
        city: city_name.to_string(),
        country: country.unwrap_or("").to_string(),
        date: used_date,
        description,
        temperature_c,
        feels_like_c: slot.main.feels_like,
        humidity_percent: slot.main.humidity,
        wind_speed_mps: slot.wind.speed,
        // The API always sends pop; a missing one gets a safety default.
        precipitation_probability: Some(slot.pop.unwrap_or(0.0)),
    })
}

fn local_datetime(unix_utc: i64, offset_seconds: i32) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp(unix_utc, 0)?;
    Some(utc.naive_utc() + Duration::seconds(i64::from(offset_seconds)))
}

fn noon_distance(local: &NaiveDateTime) -> i64 {
    let minutes = i64::from(local.time().hour()) * 60 + i64::from(local.time().minute());
    (minutes - NOON_MINUTES).abs()
}
