//! Contract RiskBot Library
//!
//! Gamified contract review: an external language model flags risky clauses,
//! and players compete to find them first.
//! - Selection matching against detected risks (longest substring overlap)
//! - Severity-tiered scoring with permanent milestone badges
//! - Explicit game state container with change notifications
//! - Pluggable risk detection (chat-completions API or a test double)

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{
    find_best_match, GameEvent, GameNotification, GameSession, GameState, GameStore, Leaderboard,
    PlayerEntry, ScoreOutcome,
};
pub use models::{AppError, AppResult, DetectorConfig, Document, ErrorCode, LogEntry, Player, Risk, ServerConfig, Severity};
pub use providers::{OpenAiDetector, RiskDetector};
pub use utils::{SessionTelemetry, TelemetryStats};
