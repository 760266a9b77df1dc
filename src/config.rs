// ==================== config.rs ====================
use crate::error::AppError;
use std::env;

const DEFAULT_GROQ_MODEL: &str = "llama-3.1-70b-versatile";

#[derive(Debug, Clone)]
pub struct Config {
    pub openweather_api_key: String,
    pub groq_api_key: String,
    pub groq_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            openweather_api_key: required("OPENWEATHER_API_KEY")?,
            groq_api_key: required("GROQ_API_KEY")?,
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string()),
        })
    }
}

fn required(name: &str) -> Result<String, AppError> {
    let value = env::var(name)
        .map_err(|_| AppError::Config(format!("{} not set", name)))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Config(format!("{} is empty", name)));
    }
    Ok(value)
}
