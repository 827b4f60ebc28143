//! Game Session
//!
//! Async front door to the game: serialises every event through one
//! [`GameStore`], runs risk detection through an injectable [`RiskDetector`],
//! and keeps [`SessionTelemetry`] in step with what happened.
//!
//! The store lock is never held across the detector call. The in-flight flag
//! set by `DetectionRequested` is what keeps a second request out, and the
//! call runs in its own task so the flag is cleared even when the caller
//! goes away.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::core::game::{GameEvent, GameNotification, GameState, GameStore};
use crate::core::leaderboard::{self, Leaderboard};
use crate::core::roster::PlayerEntry;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Document, LogEntry, Risk};
use crate::providers::detector::RiskDetector;
use crate::utils::telemetry::SessionTelemetry;

pub struct GameSession {
    store: Arc<Mutex<GameStore>>,
    detector: Arc<dyn RiskDetector>,
    telemetry: Arc<SessionTelemetry>,
}

impl GameSession {
    pub fn new(detector: Arc<dyn RiskDetector>, telemetry: Arc<SessionTelemetry>) -> Self {
        Self {
            store: Arc::new(Mutex::new(GameStore::new())),
            detector,
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &Arc<SessionTelemetry> {
        &self.telemetry
    }

    pub fn detector_tag(&self) -> &'static str {
        self.detector.backend_tag()
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<GameNotification> {
        self.store.lock().await.subscribe()
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> GameState {
        self.store.lock().await.state().clone()
    }

    async fn dispatch(&self, event: GameEvent) -> AppResult<Vec<GameNotification>> {
        dispatch_to(&self.store, &self.telemetry, event).await
    }

    // ============================================
    // Player actions
    // ============================================

    pub async fn start(&self, entries: Vec<PlayerEntry>) -> AppResult<GameState> {
        self.dispatch(GameEvent::StartGame { entries }).await?;
        Ok(self.snapshot().await)
    }

    pub async fn load_document(&self, document: Document) -> AppResult<()> {
        self.dispatch(GameEvent::LoadDocument { document }).await?;
        Ok(())
    }

    /// Run detection on the loaded document and install the result.
    ///
    /// Input errors (no key, no document, already running) change nothing.
    /// External failures are recorded as the visible detection error and
    /// returned; prior risks stay in place.
    pub async fn detect(&self) -> AppResult<Vec<Risk>> {
        self.detector.ensure_ready()?;

        let text = {
            let mut store = self.store.lock().await;
            // The reducer rejects the request when there is no document.
            let text = store
                .state()
                .document
                .as_ref()
                .map(|d| d.text.clone())
                .unwrap_or_default();
            let notifications = store.dispatch(GameEvent::DetectionRequested)?;
            for n in &notifications {
                self.telemetry.observe(n);
            }
            text
        };

        let task = tokio::spawn(run_detection(
            self.store.clone(),
            self.detector.clone(),
            self.telemetry.clone(),
            text,
        ));

        match task.await {
            Ok(result) => result,
            Err(join_err) => {
                let err = AppError::internal(format!("Risk detection task failed: {}", join_err));
                self.dispatch(GameEvent::DetectionFailed {
                    message: err.message.clone(),
                })
                .await?;
                Err(err)
            }
        }
    }

    /// Score `selection` for `player`; returns the appended log entry
    pub async fn claim(&self, player: &str, selection: &str) -> AppResult<LogEntry> {
        let mut store = self.store.lock().await;
        let notifications = store.dispatch(GameEvent::ClaimSelection {
            player: player.to_string(),
            selection: selection.to_string(),
        })?;
        for n in &notifications {
            self.telemetry.observe(n);
        }
        store
            .state()
            .log
            .last()
            .cloned()
            .ok_or_else(|| AppError::internal("scoring produced no log entry"))
    }

    /// Reveal the answers; returns the winners
    pub async fn reveal(&self) -> AppResult<Vec<String>> {
        self.dispatch(GameEvent::RevealAnswers).await?;
        Ok(self.snapshot().await.winners.unwrap_or_default())
    }

    // ============================================
    // Views
    // ============================================

    pub async fn leaderboard(&self) -> Leaderboard {
        leaderboard::project(&self.store.lock().await.state().players)
    }

    pub async fn log(&self) -> Vec<LogEntry> {
        self.store.lock().await.state().log.clone()
    }
}

async fn dispatch_to(
    store: &Mutex<GameStore>,
    telemetry: &SessionTelemetry,
    event: GameEvent,
) -> AppResult<Vec<GameNotification>> {
    let notifications = store.lock().await.dispatch(event)?;
    for n in &notifications {
        telemetry.observe(n);
    }
    Ok(notifications)
}

/// Call the detector and dispatch the outcome. Owns everything it touches so
/// it can outlive the request that started it.
async fn run_detection(
    store: Arc<Mutex<GameStore>>,
    detector: Arc<dyn RiskDetector>,
    telemetry: Arc<SessionTelemetry>,
    text: String,
) -> AppResult<Vec<Risk>> {
    let start = Instant::now();
    let result = detector.detect_risks(&text).await;
    telemetry.record_detection_latency(start.elapsed().as_millis() as u64);

    match result {
        Ok(risks) if !risks.is_empty() => {
            info!(
                backend = detector.backend_tag(),
                count = risks.len(),
                "🎯 Risks loaded"
            );
            dispatch_to(
                &store,
                &telemetry,
                GameEvent::DetectionSucceeded {
                    risks: risks.clone(),
                },
            )
            .await?;
            Ok(risks)
        }
        Ok(_) => {
            let err = AppError::detection_empty();
            dispatch_to(
                &store,
                &telemetry,
                GameEvent::DetectionFailed {
                    message: err.message.clone(),
                },
            )
            .await?;
            Err(err)
        }
        Err(err) => {
            warn!(code = err.code_str(), "⚠️ Risk detection failed: {}", err.message);
            dispatch_to(
                &store,
                &telemetry,
                GameEvent::DetectionFailed {
                    message: err.message.clone(),
                },
            )
            .await?;
            Err(err)
        }
    }
}
