use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resolved location for a free-text city query. One request, one value.
#[derive(Debug, Clone, Serialize)]
pub struct GeoResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

// --- Raw OpenWeather 5-day/3-hour forecast response ---
//
// Tolerant shapes: every field the API might omit is optional and unknown
// fields are ignored, so a partial upstream payload deserializes and the
// gaps are handled downstream.

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastSlot>,
    #[serde(default)]
    pub city: ForecastCity,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastCity {
    /// UTC offset in seconds, constant for the whole response.
    #[serde(default)]
    pub timezone: i32,
}

/// One 3-hour forecast entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastSlot {
    /// Unix timestamp (UTC) of the slot.
    pub dt: i64,
    #[serde(default)]
    pub main: SlotMain,
    #[serde(default)]
    pub weather: Vec<SlotCondition>,
    #[serde(default)]
    pub wind: SlotWind,
    /// Precipitation probability, 0.0-1.0.
    pub pop: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotCondition {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotWind {
    pub speed: Option<f64>,
}

/// Normalized per-day weather summary, the payload of `/forecast` and the
/// input to the recommendation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub city: String,
    /// Country code from geocoding, empty string when unknown.
    pub country: String,
    /// Local calendar date the summary describes.
    pub date: NaiveDate,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: Option<f64>,
    pub humidity_percent: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub precipitation_probability: Option<f64>,
}

// --- LLM recommendation shape ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outfit {
    #[serde(default)]
    pub top: Vec<String>,
    #[serde(default)]
    pub bottom: Vec<String>,
    #[serde(default)]
    pub shoes: Vec<String>,
    #[serde(default)]
    pub outerwear: Vec<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Activities {
    #[serde(default)]
    pub outdoor: Vec<String>,
    #[serde(default)]
    pub indoor: Vec<String>,
}

/// Structured advice parsed from the LLM response. `summary` is required
/// prose; `outfit` and `activities` must be present objects, their inner
/// lists default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRecommendation {
    pub summary: String,
    pub outfit: Outfit,
    pub activities: Activities,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_summary() -> WeatherSummary {
        WeatherSummary {
            city: "Zagreb".to_string(),
            country: "HR".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            description: "clear sky".to_string(),
            temperature_c: 6.0,
            feels_like_c: Some(5.0),
            humidity_percent: Some(70),
            wind_speed_mps: Some(2.5),
            precipitation_probability: Some(0.15),
        }
    }

    #[test]
    fn summary_round_trips_without_losing_fields() {
        let summary = full_summary();
        let json = serde_json::to_string(&summary).unwrap();
        let back: WeatherSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn summary_serializes_expected_field_names() {
        let value = serde_json::to_value(full_summary()).unwrap();
        assert_eq!(value["city"], "Zagreb");
        assert_eq!(value["date"], "2025-12-20");
        assert_eq!(value["temperature_c"], 6.0);
        assert_eq!(value["humidity_percent"], 70);
        assert_eq!(value["wind_speed_mps"], 2.5);
        assert_eq!(value["precipitation_probability"], 0.15);
    }

    #[test]
    fn forecast_slot_tolerates_missing_fields() {
        let slot: ForecastSlot = serde_json::from_str(r#"{"dt": 1766232000}"#).unwrap();
        assert!(slot.main.temp.is_none());
        assert!(slot.weather.is_empty());
        assert!(slot.pop.is_none());
    }

    #[test]
    fn recommendation_lists_default_to_empty() {
        let rec: LlmRecommendation = serde_json::from_str(
            r#"{"summary": "Mild day.", "outfit": {}, "activities": {}}"#,
        )
        .unwrap();
        assert!(rec.outfit.top.is_empty());
        assert!(rec.activities.outdoor.is_empty());
        assert!(rec.warnings.is_empty());
        assert!(rec.tips.is_empty());
    }

    #[test]
    fn recommendation_requires_outfit_and_activities() {
        let res: Result<LlmRecommendation, _> =
            serde_json::from_str(r#"{"summary": "Mild day."}"#);
        assert!(res.is_err());
    }
}
