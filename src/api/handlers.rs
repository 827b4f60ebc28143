//! API Request Handlers

use axum::extract::{Json, State};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::extract::ApiJson;
use super::types::*;
use crate::core::leaderboard::Leaderboard;
use crate::core::session::GameSession;
use crate::models::errors::AppError;
use crate::models::types::Document;
use crate::utils::constants::APP_VERSION;

/// Shared application state
pub struct AppState {
    pub session: Arc<GameSession>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(session: Arc<GameSession>) -> Self {
        Self {
            session,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, ApiFailure>;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn reject(err: AppError, start: Instant) -> ApiFailure {
    if err.code.is_input_error() {
        debug!(code = err.code_str(), "Rejected input: {}", err.message);
    } else {
        warn!(code = err.code_str(), "Request failed: {}", err.message);
    }
    failure(&err, elapsed_ms(start))
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Onboarding
// ============================================

pub async fn start_game(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<StartGameRequest>,
) -> HandlerResult<StateData> {
    let start = Instant::now();
    let game = state
        .session
        .start(req.players)
        .await
        .map_err(|e| reject(e, start))?;

    info!(players = game.players.len(), "🎮 Game started");
    Ok(Json(ApiResponse::success(game.into(), elapsed_ms(start))))
}

// ============================================
// Document
// ============================================

pub async fn load_document(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DocumentRequest>,
) -> HandlerResult<DocumentData> {
    let start = Instant::now();
    let document = match (req.path, req.text) {
        (Some(path), _) => Document::from_file(&path).map_err(|e| reject(e, start))?,
        (None, Some(text)) => match req.name.filter(|n| !n.trim().is_empty()) {
            Some(name) => Document::new(name, text),
            None => Document::pasted(text),
        },
        (None, None) => return Err(reject(AppError::missing_document(), start)),
    };
    let data = DocumentData {
        name: document.name.clone(),
        chars: document.text.chars().count(),
    };

    state
        .session
        .load_document(document)
        .await
        .map_err(|e| reject(e, start))?;

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Risk Detection
// ============================================

pub async fn detect_risks(State(state): State<Arc<AppState>>) -> HandlerResult<DetectionData> {
    let start = Instant::now();
    let risks = state.session.detect().await.map_err(|e| reject(e, start))?;

    let data = DetectionData {
        risk_count: risks.len(),
        detector: state.session.detector_tag().to_string(),
    };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Scoring
// ============================================

pub async fn score_selection(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ScoreRequest>,
) -> HandlerResult<ScoreData> {
    let start = Instant::now();
    let entry = state
        .session
        .claim(&req.player, &req.selection)
        .await
        .map_err(|e| reject(e, start))?;

    let player = state
        .session
        .snapshot()
        .await
        .player(&entry.player)
        .cloned()
        .ok_or_else(|| reject(AppError::unknown_player(&entry.player), start))?;

    info!(player = %entry.player, points = entry.points, "{}", entry.summary());
    let data = ScoreData {
        summary: entry.summary(),
        entry,
        player,
    };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Reveal
// ============================================

pub async fn reveal_answers(State(state): State<Arc<AppState>>) -> HandlerResult<RevealData> {
    let start = Instant::now();
    let winners = state.session.reveal().await.map_err(|e| reject(e, start))?;
    let risks = state.session.snapshot().await.risks;

    info!(winners = ?winners, "🏆 Answers revealed");
    Ok(Json(ApiResponse::success(
        RevealData { winners, risks },
        elapsed_ms(start),
    )))
}

// ============================================
// Views
// ============================================

pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StateData>> {
    let start = Instant::now();
    let snapshot = state.session.snapshot().await;
    Json(ApiResponse::success(snapshot.into(), elapsed_ms(start)))
}

pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Leaderboard>> {
    let start = Instant::now();
    let board = state.session.leaderboard().await;
    Json(ApiResponse::success(board, elapsed_ms(start)))
}

pub async fn get_log(State(state): State<Arc<AppState>>) -> Json<ApiResponse<LogData>> {
    let start = Instant::now();
    let entries = state.session.log().await;
    let lines = entries.iter().map(|e| e.summary()).collect();
    Json(ApiResponse::success(LogData { entries, lines }, elapsed_ms(start)))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let data = StatsData {
        telemetry: state.session.telemetry().get_stats(),
        detector: state.session.detector_tag().to_string(),
        api_version: APP_VERSION.to_string(),
    };
    Json(ApiResponse::success(data, elapsed_ms(start)))
}
