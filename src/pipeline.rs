use crate::error::AppError;
use crate::llm::GroqClient;
use crate::models::{LlmRecommendation, WeatherSummary};
use crate::selection::{build_summary, select_slot};
use crate::weather::OpenWeatherClient;
use chrono::NaiveDate;
use log::info;

/// Run the shared forecast pipeline: geocode the city, fetch the 5-day
/// forecast, select the slot nearest local noon for the requested date, and
/// normalize it into a summary. Every stage fails fast; nothing partial is
/// returned.
pub async fn forecast_summary(
    weather: &OpenWeatherClient,
    city: &str,
    requested: NaiveDate,
) -> Result<WeatherSummary, AppError> {
    let geo = weather.geocode(city).await?;
    let forecast = weather.forecast_5day_3h(geo.lat, geo.lon).await?;
    let (slot, used_date, _tz) = select_slot(&forecast, requested)?;
    let summary = build_summary(&geo.name, geo.country.as_deref(), used_date, slot)?;

    info!(
        "✅ Summary for {} on {}: {:.1}°C, {}",
        summary.city, summary.date, summary.temperature_c, summary.description
    );

    Ok(summary)
}

/// The recommendation use case runs the exact same pipeline as the
/// forecast-only one and then makes a single LLM call on the result, so both
/// callers see identical summaries for identical inputs.
pub async fn recommend(
    weather: &OpenWeatherClient,
    groq: &GroqClient,
    city: &str,
    requested: NaiveDate,
) -> Result<LlmRecommendation, AppError> {
    let summary = forecast_summary(weather, city, requested).await?;
    groq.get_recommendations(&summary).await
}
