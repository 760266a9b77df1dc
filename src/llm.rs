use crate::error::AppError;
use crate::models::{LlmRecommendation, WeatherSummary};
use crate::weather::check_status;
use log::info;
use serde::Deserialize;
use std::time::Duration;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Fixed instruction sent with every recommendation request. The model must
/// answer with a single JSON object in the `LlmRecommendation` shape.
const SYSTEM_PROMPT: &str = r#"
You are Skye, a friendly and professional AI weather companion.

You speak like a warm, helpful human — not like a technical forecast.
Your goal is to explain what today's weather means for a real person.

You will receive structured weather data (JSON) including:
- location
- date
- weather conditions
- temperature, wind, precipitation probability

Your task is to return a SINGLE valid JSON object with:

1. A natural-language weather narrative ("summary"):
   - Written as if Skye is talking directly to the user.
   - Sound like a friendly local weather host.
   - Use full sentences and everyday language.
   - Do NOT use bullet points.
   - Do NOT sound robotic or technical.

   The summary should naturally cover (only if relevant):
   • what the weather feels like
   • how the user should dress
   • what they should bring
   • what kinds of activities make sense
   • any warnings or useful tips

   Rules for the summary:
   - 50 to 120 words total
   - At most 2 short paragraphs
   - Avoid repeating raw numbers unless they clearly affect the advice
   - Do NOT list clothing or activities item-by-item; keep it conversational

2. Structured recommendations for UI rendering:
   - outfit (top, bottom, shoes, outerwear, accessories)
   - activities (outdoor, indoor)
   - warnings (only if applicable)
   - tips

IMPORTANT OUTPUT RULES:
- The output MUST be valid JSON.
- The output MUST strictly follow this schema:

{
  "summary": "string",
  "outfit": {
    "top": ["string"],
    "bottom": ["string"],
    "shoes": ["string"],
    "outerwear": ["string"],
    "accessories": ["string"]
  },
  "activities": {
    "outdoor": ["string"],
    "indoor": ["string"]
  },
  "warnings": ["string"],
  "tips": ["string"]
}

Additional rules:
- Activities must be real activities (e.g. walking, hiking, gym, museum visit).
- Do NOT include food, drinks, or objects as activities.
- Outfit.accessories are practical items to wear or bring (e.g. umbrella, gloves, scarf).
- If there are no warnings, return an empty list.

Tone:
- friendly
- calm
- reassuring
- human
- concise but warm
"#;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Clone)]
pub struct GroqClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
    chat_url: String,
}

impl GroqClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_endpoint(api_key, model, GROQ_CHAT_URL)
    }

    pub fn with_endpoint(api_key: String, model: String, chat_url: impl Into<String>) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .expect("reqwest client"),
            chat_url: chat_url.into(),
        }
    }

    /// Send one weather summary to the chat-completions endpoint and parse
    /// the structured recommendation out of the reply. One call, no retries.
    pub async fn get_recommendations(
        &self,
        summary: &WeatherSummary,
    ) -> Result<LlmRecommendation, AppError> {
        info!("🤖 Requesting recommendation from model {}", self.model);

        let payload = serde_json::json!({
            "model": self.model,
            "temperature": 0.3,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_content(summary)? },
            ],
        });

        let response = self
            .client
            .post(&self.chat_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Groq request failed: {}", e.without_url())))?;

        let response = check_status(response, "Groq").await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Groq unexpected response format: {}", e.without_url())))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Upstream("Groq response contained no choices".to_string()))?;

        extract_recommendation(&content)
    }
}

/// The serialized summary sent as the user message. Field-for-field the same
/// JSON the `/forecast` endpoint returns.
fn user_content(summary: &WeatherSummary) -> Result<String, AppError> {
    serde_json::to_string(summary)
        .map_err(|e| AppError::Internal(format!("Failed to serialize weather summary: {}", e)))
}

/// Parse a recommendation out of free-form model output. The model is told
/// to answer with bare JSON but sometimes wraps it in commentary, so after a
/// failed whole-body parse the first-`{`-to-last-`}` substring is tried.
fn extract_recommendation(text: &str) -> Result<LlmRecommendation, AppError> {
    let text = text.trim();

    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => {
            let start = text.find('{');
            let end = text.rfind('}');
            let (start, end) = match (start, end) {
                (Some(s), Some(e)) if e > s => (s, e),
                _ => {
                    return Err(AppError::Schema("Groq response is not JSON.".to_string()));
                }
            };
            serde_json::from_str(&text[start..=end])
                .map_err(|e| AppError::Schema(format!("Groq response is not JSON: {}", e)))?
        }
    };

    let rec: LlmRecommendation = serde_json::from_value(value)
        .map_err(|e| AppError::Schema(format!("missing or invalid field: {}", e)))?;

    if rec.summary.trim().is_empty() {
        return Err(AppError::Schema("summary is empty".to_string()));
    }

    Ok(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const VALID_BODY: &str = r#"{
        "summary": "A calm, mild day ahead.",
        "outfit": {"top": ["t-shirt"], "bottom": [], "shoes": ["sneakers"], "outerwear": [], "accessories": []},
        "activities": {"outdoor": ["walking"], "indoor": []},
        "warnings": [],
        "tips": ["Carry water."]
    }"#;

    #[test]
    fn extracts_from_bare_json() {
        let rec = extract_recommendation(VALID_BODY).unwrap();
        assert_eq!(rec.summary, "A calm, mild day ahead.");
        assert_eq!(rec.outfit.top, vec!["t-shirt"]);
        assert_eq!(rec.activities.outdoor, vec!["walking"]);
    }

    #[test]
    fn extracts_from_commentary_wrapped_json() {
        let wrapped = format!("Sure! Here is your forecast:\n{}\nHave a great day!", VALID_BODY);
        let rec = extract_recommendation(&wrapped).unwrap();
        assert_eq!(rec.summary, "A calm, mild day ahead.");
        assert_eq!(rec.tips, vec!["Carry water."]);
    }

    #[test]
    fn rejects_text_without_braces() {
        let err = extract_recommendation("no json here, sorry").unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn rejects_unparseable_brace_block() {
        let err = extract_recommendation("prefix { not: valid json } suffix").unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn rejects_missing_summary() {
        let body = r#"{"outfit": {}, "activities": {}}"#;
        let err = extract_recommendation(body).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn rejects_blank_summary() {
        let body = r#"{"summary": "  ", "outfit": {}, "activities": {}}"#;
        let err = extract_recommendation(body).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn rejects_structurally_invalid_outfit() {
        let body = r#"{"summary": "ok", "outfit": "jacket", "activities": {}}"#;
        let err = extract_recommendation(body).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn user_content_preserves_every_populated_field() {
        let summary = WeatherSummary {
            city: "Zagreb".to_string(),
            country: "HR".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            description: "light rain".to_string(),
            temperature_c: 6.0,
            feels_like_c: Some(5.0),
            humidity_percent: Some(70),
            wind_speed_mps: Some(2.5),
            precipitation_probability: Some(0.35),
        };

        let body = user_content(&summary).unwrap();
        let back: WeatherSummary = serde_json::from_str(&body).unwrap();
        assert_eq!(back, summary);
    }
}
