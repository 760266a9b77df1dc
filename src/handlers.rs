use crate::error::AppError;
use crate::pipeline;
use crate::AppState;
use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use validator::Validate;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/geocode", web::get().to(geocode))
        .route("/forecast", web::get().to(forecast))
        .route("/recommend", web::get().to(recommend));
}

#[derive(serde::Deserialize, Validate)]
pub struct CityQuery {
    #[validate(length(min = 1, message = "city must not be empty"))]
    city: String,
}

#[derive(serde::Deserialize, Validate)]
pub struct CityDateQuery {
    #[validate(length(min = 1, message = "city must not be empty"))]
    city: String,
    /// Requested local date, YYYY-MM-DD.
    date: String,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format. Use YYYY-MM-DD.".to_string()))
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn geocode(
    state: web::Data<AppState>,
    query: web::Query<CityQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let geo = state.weather.geocode(&query.city).await?;
    Ok(HttpResponse::Ok().json(geo))
}

async fn forecast(
    state: web::Data<AppState>,
    query: web::Query<CityDateQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let requested = parse_date(&query.date)?;

    let summary = pipeline::forecast_summary(&state.weather, &query.city, requested).await?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn recommend(
    state: web::Data<AppState>,
    query: web::Query<CityDateQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let requested = parse_date(&query.date)?;

    let rec = pipeline::recommend(&state.weather, &state.groq, &query.city, requested).await?;
    Ok(HttpResponse::Ok().json(rec))
}
