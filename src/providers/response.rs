//! Completion response parsing
//!
//! Models wrap their JSON in prose or code fences, so the risk array is taken
//! from the first `[` to the last `]` of the message content and parsed on a
//! best-effort basis.

use serde::Deserialize;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::Risk;

/// Chat-completions response body (only the fields we read)
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatMessageContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatMessageContent {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the model produced any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// First-`[`-to-last-`]` span of `content`
pub fn bracketed_span(content: &str) -> Option<&str> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    (end > start).then(|| &content[start..=end])
}

/// Extract the risk list from message content.
///
/// A span that does not parse is `DetectionParse`; no span or an empty array
/// is `DetectionEmpty`. Elements that are not objects are skipped.
pub fn extract_risks(content: &str) -> AppResult<Vec<Risk>> {
    let span = bracketed_span(content).ok_or_else(AppError::detection_empty)?;
    let items: Vec<serde_json::Value> = serde_json::from_str(span)?;
    let risks: Vec<Risk> = items
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if risks.is_empty() {
        return Err(AppError::detection_empty());
    }
    Ok(risks)
}

/// Parse a whole completion body into risks
pub fn parse_completion(body: &str) -> AppResult<Vec<Risk>> {
    let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        AppError::with_source(
            crate::models::errors::ErrorCode::DetectionParse,
            "Completion API returned a body that is not JSON.",
            e,
        )
    })?;
    let content = response.first_content().ok_or_else(AppError::detection_empty)?;
    extract_risks(content)
}
