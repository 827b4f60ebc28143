//! Session Telemetry
//!
//! In-memory counters describing how the current game is going: scoring
//! attempts, hits, points handed out and detection runs. Fed from game
//! notifications; nothing is written to disk.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::core::game::GameNotification;

/// Snapshot for reporting
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TelemetryStats {
    pub selections_scored: u64,
    pub correct_selections: u64,
    pub missed_selections: u64,
    pub points_awarded: u64,
    pub badges_earned: u64,
    pub detections_started: u64,
    pub detections_succeeded: u64,
    pub detections_failed: u64,
    pub risks_received: u64,
    /// Share of scoring attempts that earned points, 0-100
    pub hit_rate_pct: f64,
    pub avg_detection_latency_ms: f64,
    pub uptime_seconds: u64,
}

/// Lock-free counters shared by the session and the API
pub struct SessionTelemetry {
    selections_scored: AtomicU64,
    correct_selections: AtomicU64,
    points_awarded: AtomicU64,
    badges_earned: AtomicU64,
    detections_started: AtomicU64,
    detections_succeeded: AtomicU64,
    detections_failed: AtomicU64,
    risks_received: AtomicU64,
    total_detection_latency_ms: AtomicU64,
    started_at: Instant,
}

impl Default for SessionTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTelemetry {
    pub fn new() -> Self {
        Self {
            selections_scored: AtomicU64::new(0),
            correct_selections: AtomicU64::new(0),
            points_awarded: AtomicU64::new(0),
            badges_earned: AtomicU64::new(0),
            detections_started: AtomicU64::new(0),
            detections_succeeded: AtomicU64::new(0),
            detections_failed: AtomicU64::new(0),
            risks_received: AtomicU64::new(0),
            total_detection_latency_ms: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Fold one notification into the counters
    pub fn observe(&self, notification: &GameNotification) {
        match notification {
            GameNotification::SelectionScored { entry, .. } => {
                self.selections_scored.fetch_add(1, Ordering::Relaxed);
                if entry.points > 0 {
                    self.correct_selections.fetch_add(1, Ordering::Relaxed);
                    self.points_awarded
                        .fetch_add(entry.points as u64, Ordering::Relaxed);
                }
            }
            GameNotification::BadgeEarned { .. } => {
                self.badges_earned.fetch_add(1, Ordering::Relaxed);
            }
            GameNotification::DetectionStarted => {
                self.detections_started.fetch_add(1, Ordering::Relaxed);
            }
            GameNotification::RisksDetected { count } => {
                self.detections_succeeded.fetch_add(1, Ordering::Relaxed);
                self.risks_received.fetch_add(*count as u64, Ordering::Relaxed);
            }
            GameNotification::DetectionFailed { .. } => {
                self.detections_failed.fetch_add(1, Ordering::Relaxed);
            }
            GameNotification::GameStarted { .. }
            | GameNotification::DocumentLoaded { .. }
            | GameNotification::AnswersRevealed { .. } => {}
        }
    }

    /// Record how long a finished detection call took
    pub fn record_detection_latency(&self, latency_ms: u64) {
        self.total_detection_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> TelemetryStats {
        let scored = self.selections_scored.load(Ordering::Relaxed);
        let correct = self.correct_selections.load(Ordering::Relaxed);
        let succeeded = self.detections_succeeded.load(Ordering::Relaxed);
        let failed = self.detections_failed.load(Ordering::Relaxed);
        let finished = succeeded + failed;

        TelemetryStats {
            selections_scored: scored,
            correct_selections: correct,
            missed_selections: scored - correct,
            points_awarded: self.points_awarded.load(Ordering::Relaxed),
            badges_earned: self.badges_earned.load(Ordering::Relaxed),
            detections_started: self.detections_started.load(Ordering::Relaxed),
            detections_succeeded: succeeded,
            detections_failed: failed,
            risks_received: self.risks_received.load(Ordering::Relaxed),
            hit_rate_pct: if scored > 0 {
                correct as f64 / scored as f64 * 100.0
            } else {
                0.0
            },
            avg_detection_latency_ms: if finished > 0 {
                self.total_detection_latency_ms.load(Ordering::Relaxed) as f64 / finished as f64
            } else {
                0.0
            },
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{LogEntry, Severity};

    fn scored(points: u32) -> GameNotification {
        GameNotification::SelectionScored {
            entry: LogEntry::new("Ana", points, "r", "s", (points > 0).then_some(Severity::High)),
            outcome: if points > 0 { "matched" } else { "no_match" },
        }
    }

    #[test]
    fn test_counts_hits_and_misses() {
        let telemetry = SessionTelemetry::new();
        telemetry.observe(&scored(10));
        telemetry.observe(&scored(0));
        telemetry.observe(&scored(5));
        telemetry.observe(&scored(0));

        let stats = telemetry.get_stats();
        assert_eq!(stats.selections_scored, 4);
        assert_eq!(stats.correct_selections, 2);
        assert_eq!(stats.missed_selections, 2);
        assert_eq!(stats.points_awarded, 15);
        assert_eq!(stats.hit_rate_pct, 50.0);
    }

    #[test]
    fn test_detection_counters_and_latency() {
        let telemetry = SessionTelemetry::new();
        telemetry.observe(&GameNotification::DetectionStarted);
        telemetry.observe(&GameNotification::RisksDetected { count: 4 });
        telemetry.record_detection_latency(300);
        telemetry.observe(&GameNotification::DetectionStarted);
        telemetry.observe(&GameNotification::DetectionFailed {
            message: "down".to_string(),
        });
        telemetry.record_detection_latency(100);

        let stats = telemetry.get_stats();
        assert_eq!(stats.detections_started, 2);
        assert_eq!(stats.detections_succeeded, 1);
        assert_eq!(stats.detections_failed, 1);
        assert_eq!(stats.risks_received, 4);
        assert_eq!(stats.avg_detection_latency_ms, 200.0);
    }
}
