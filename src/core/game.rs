//! Game State Container
//!
//! The whole session lives in one [`GameState`] value. Every change goes
//! through [`GameState::apply_event`], a pure reducer that returns the next
//! state together with the notifications the change produced. [`GameStore`]
//! holds the current state and fans those notifications out to subscribers.
//!
//! Rejected events (input errors, wrong phase) leave the state untouched.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::core::leaderboard;
use crate::core::roster::{build_roster, PlayerEntry};
use crate::core::scoring::{award_points, evaluate_selection, ScoreOutcome};
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{Document, LogEntry, Player, Risk};
use crate::utils::constants::NOTIFICATION_CHANNEL_CAPACITY;

/// Discrete user actions and detection completions
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Onboarding form submitted
    StartGame { entries: Vec<PlayerEntry> },
    /// Document pasted or read from a file
    LoadDocument { document: Document },
    /// "Detect risks" pressed; fails while another request is pending
    DetectionRequested,
    /// Detection returned a risk list; only valid while a request is pending
    DetectionSucceeded { risks: Vec<Risk> },
    /// Detection failed; prior risks are kept. Only valid while pending
    DetectionFailed { message: String },
    /// A player claims the current selection
    ClaimSelection { player: String, selection: String },
    /// Show the detected risks and declare winners
    RevealAnswers,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::StartGame { .. } => "start_game",
            GameEvent::LoadDocument { .. } => "load_document",
            GameEvent::DetectionRequested => "detection_requested",
            GameEvent::DetectionSucceeded { .. } => "detection_succeeded",
            GameEvent::DetectionFailed { .. } => "detection_failed",
            GameEvent::ClaimSelection { .. } => "claim_selection",
            GameEvent::RevealAnswers => "reveal_answers",
        }
    }
}

/// What changed, for subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameNotification {
    GameStarted { players: Vec<String> },
    DocumentLoaded { name: String, chars: usize },
    DetectionStarted,
    RisksDetected { count: usize },
    DetectionFailed { message: String },
    SelectionScored { entry: LogEntry, outcome: &'static str },
    BadgeEarned { player: String, milestone: u32 },
    AnswersRevealed { winners: Vec<String> },
}

/// Entire session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub session_id: Uuid,
    /// Roster in onboarding order; empty until the game starts
    pub players: Vec<Player>,
    pub document: Option<Document>,
    /// Most recent successful detection result
    pub risks: Vec<Risk>,
    /// Append-only scoring log
    pub log: Vec<LogEntry>,
    pub detection_in_flight: bool,
    /// Last detection failure shown to the players
    pub detection_error: Option<String>,
    pub revealed: bool,
    /// Set on reveal
    pub winners: Option<Vec<String>>,
}

/// Next state plus the notifications produced getting there
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub notifications: Vec<GameNotification>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            players: Vec::new(),
            document: None,
            risks: Vec::new(),
            log: Vec::new(),
            detection_in_flight: false,
            detection_error: None,
            revealed: false,
            winners: None,
        }
    }

    pub fn is_started(&self) -> bool {
        !self.players.is_empty()
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Apply one event, returning the next state. `self` is never modified.
    pub fn apply_event(&self, event: GameEvent) -> AppResult<Transition> {
        if !matches!(event, GameEvent::StartGame { .. }) && !self.is_started() {
            return Err(AppError::game_not_started());
        }

        let mut next = self.clone();
        let mut notifications = Vec::new();

        match event {
            GameEvent::StartGame { entries } => {
                if self.is_started() {
                    return Err(AppError::new(
                        ErrorCode::GameAlreadyStarted,
                        "The game has already started.",
                    ));
                }
                next.players = build_roster(&entries)?;
                notifications.push(GameNotification::GameStarted {
                    players: next.players.iter().map(|p| p.name.clone()).collect(),
                });
            }

            GameEvent::LoadDocument { document } => {
                notifications.push(GameNotification::DocumentLoaded {
                    name: document.name.clone(),
                    chars: document.text.chars().count(),
                });
                next.document = Some(document);
            }

            GameEvent::DetectionRequested => {
                if self.detection_in_flight {
                    return Err(AppError::detection_in_flight());
                }
                if self.document.as_ref().map_or(true, Document::is_blank) {
                    return Err(AppError::missing_document());
                }
                next.detection_in_flight = true;
                next.detection_error = None;
                notifications.push(GameNotification::DetectionStarted);
            }

            GameEvent::DetectionSucceeded { risks } => {
                if !self.detection_in_flight {
                    return Err(AppError::no_detection_pending());
                }
                next.detection_in_flight = false;
                if risks.is_empty() {
                    // An empty result is a failure; keep what we had.
                    let message = AppError::detection_empty().message;
                    next.detection_error = Some(message.clone());
                    notifications.push(GameNotification::DetectionFailed { message });
                } else {
                    notifications.push(GameNotification::RisksDetected { count: risks.len() });
                    next.risks = risks;
                    next.detection_error = None;
                }
            }

            GameEvent::DetectionFailed { message } => {
                if !self.detection_in_flight {
                    return Err(AppError::no_detection_pending());
                }
                next.detection_in_flight = false;
                next.detection_error = Some(message.clone());
                notifications.push(GameNotification::DetectionFailed { message });
            }

            GameEvent::ClaimSelection { player, selection } => {
                let idx = next
                    .players
                    .iter()
                    .position(|p| p.name == player)
                    .ok_or_else(|| AppError::unknown_player(&player))?;

                let result = evaluate_selection(&next.risks, &player, &selection)?;
                let earned = award_points(&mut next.players[idx], result.points());

                notifications.push(GameNotification::SelectionScored {
                    entry: result.entry.clone(),
                    outcome: result.outcome.as_str(),
                });
                for milestone in earned {
                    notifications.push(GameNotification::BadgeEarned {
                        player: player.clone(),
                        milestone,
                    });
                }
                if let ScoreOutcome::Matched { kind, .. } = &result.outcome {
                    debug!(player = %player, clause = %kind, points = result.points(), "Selection matched");
                }
                next.log.push(result.entry);
            }

            GameEvent::RevealAnswers => {
                if self.risks.is_empty() {
                    return Err(AppError::new(
                        ErrorCode::NoRisksToReveal,
                        "Run risk detection before revealing answers.",
                    ));
                }
                let winners = leaderboard::winners(&next.players);
                next.revealed = true;
                next.winners = Some(winners.clone());
                notifications.push(GameNotification::AnswersRevealed { winners });
            }
        }

        Ok(Transition {
            state: next,
            notifications,
        })
    }
}

/// Holds the current state and notifies subscribers of every change
pub struct GameStore {
    state: GameState,
    notifier: broadcast::Sender<GameNotification>,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    pub fn new() -> Self {
        Self::with_state(GameState::new())
    }

    pub fn with_state(state: GameState) -> Self {
        let (notifier, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { state, notifier }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Receive every notification produced after this call
    pub fn subscribe(&self) -> broadcast::Receiver<GameNotification> {
        self.notifier.subscribe()
    }

    /// Apply an event; on success the new state is installed and subscribers
    /// are notified. The produced notifications are also returned.
    pub fn dispatch(&mut self, event: GameEvent) -> AppResult<Vec<GameNotification>> {
        let event_name = event.name();
        let transition = self.state.apply_event(event)?;
        self.state = transition.state;

        debug!(event = event_name, notifications = transition.notifications.len(), "Event applied");
        for notification in &transition.notifications {
            // No receivers is fine: nobody is listening yet.
            let _ = self.notifier.send(notification.clone());
        }
        Ok(transition.notifications)
    }
}
