use crate::error::AppError;
use crate::models::{ForecastResponse, GeoResult};
use log::info;
use serde::Deserialize;
use std::time::Duration;

const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Raw geocoding candidate as returned by the OpenWeather direct API.
#[derive(Debug, Deserialize)]
struct GeoItem {
    name: Option<String>,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    client: reqwest::Client,
    geo_url: String,
    forecast_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoints(api_key, GEO_URL, FORECAST_URL)
    }

    /// Build a client against substitute endpoints. Used by tests; the
    /// default constructor points at the real API.
    pub fn with_endpoints(
        api_key: String,
        geo_url: impl Into<String>,
        forecast_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            geo_url: geo_url.into(),
            forecast_url: forecast_url.into(),
        }
    }

    /// Resolve a free-text city name to coordinates. The first geocoding
    /// match wins.
    pub async fn geocode(&self, city: &str) -> Result<GeoResult, AppError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::Validation("City is empty.".to_string()));
        }

        info!("🌐 Geocoding city: {}", city);

        let response = self
            .client
            .get(&self.geo_url)
            .query(&[("q", city), ("limit", "1"), ("appid", &self.api_key)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Geocoding request failed: {}", e.without_url())))?;

        let response = check_status(response, "OpenWeather geocoding").await?;

        let candidates: Vec<GeoItem> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse geocoding response: {}", e.without_url())))?;

        let item = candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Can't find the city: '{}'. Check input.", city)))?;

        Ok(GeoResult {
            name: item.name.unwrap_or_else(|| city.to_string()),
            lat: item.lat,
            lon: item.lon,
            country: item.country,
            state: item.state,
        })
    }

    /// Fetch the 5-day forecast in 3-hour slots for the given coordinates,
    /// metric units.
    pub async fn forecast_5day_3h(&self, lat: f64, lon: f64) -> Result<ForecastResponse, AppError> {
        info!("🌐 Fetching 5-day forecast for {:.4}, {:.4}", lat, lon);

        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", "en".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Forecast request failed: {}", e.without_url())))?;

        let response = check_status(response, "OpenWeather forecast").await?;

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse forecast response: {}", e.without_url())))
    }
}

/// Map a non-success status to an upstream error carrying whatever detail
/// the service returned (JSON body if parseable, else raw text). The API
/// key travels in query params only and never appears in these messages.
pub(crate) async fn check_status(
    response: reqwest::Response,
    service: &str,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.text().await {
        Ok(body) => match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => json.to_string(),
            Err(_) => body,
        },
        Err(_) => "Unknown error".to_string(),
    };

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(AppError::Upstream(format!(
            "{} auth error ({}): {}",
            service, status, detail
        )));
    }

    Err(AppError::Upstream(format!(
        "{} returned status {}: {}",
        service, status, detail
    )))
}
