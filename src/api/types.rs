//! API Request/Response Types

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::game::GameState;
use crate::core::roster::PlayerEntry;
use crate::models::errors::AppError;
use crate::models::types::{LogEntry, Player, Risk};
use crate::utils::telemetry::TelemetryStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            retryable: err.code.is_retryable(),
        }
    }
}

/// Error half of every handler result
pub type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

/// Map an `AppError` onto its HTTP status and the error envelope
pub fn failure(err: &AppError, latency_ms: f64) -> ApiFailure {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiResponse::error(err.into(), latency_ms)))
}

// ============================================
// Onboarding
// ============================================

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub players: Vec<PlayerEntry>,
}

// ============================================
// Document
// ============================================

/// Either pasted `text` or a local `path` to read; `path` wins if both are set
#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    /// Display name for pasted text; file documents are named after the file
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentData {
    pub name: String,
    pub chars: usize,
}

// ============================================
// Detection
// ============================================

/// Risks stay hidden until answers are revealed; only the count is returned.
#[derive(Debug, Serialize)]
pub struct DetectionData {
    pub risk_count: usize,
    pub detector: String,
}

// ============================================
// Scoring
// ============================================

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub player: String,
    pub selection: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreData {
    pub entry: LogEntry,
    pub summary: String,
    pub player: Player,
}

// ============================================
// Reveal
// ============================================

#[derive(Debug, Serialize)]
pub struct RevealData {
    pub winners: Vec<String>,
    pub risks: Vec<Risk>,
}

// ============================================
// State / Log
// ============================================

#[derive(Debug, Serialize)]
pub struct StateData {
    pub session_id: Uuid,
    pub started: bool,
    pub players: Vec<Player>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    pub risk_count: usize,
    /// Present once answers are revealed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risks: Option<Vec<Risk>>,
    pub detection_in_flight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_error: Option<String>,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<String>>,
    pub log_entries: usize,
}

impl From<GameState> for StateData {
    fn from(state: GameState) -> Self {
        Self {
            session_id: state.session_id,
            started: state.is_started(),
            document_name: state.document.as_ref().map(|d| d.name.clone()),
            risk_count: state.risks.len(),
            risks: state.revealed.then(|| state.risks.clone()),
            detection_in_flight: state.detection_in_flight,
            detection_error: state.detection_error,
            revealed: state.revealed,
            winners: state.winners,
            log_entries: state.log.len(),
            players: state.players,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogData {
    pub entries: Vec<LogEntry>,
    /// Rendered events feed, oldest first
    pub lines: Vec<String>,
}

// ============================================
// Stats / Health
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    #[serde(flatten)]
    pub telemetry: TelemetryStats,
    pub detector: String,
    pub api_version: String,
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
