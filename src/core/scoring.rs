//! Scoring Module
//!
//! Turns a selection into points and a log entry, and keeps player badges in
//! step with their scores. Everything here is pure; the game reducer decides
//! when to apply the results.

use std::collections::BTreeSet;

use crate::core::matcher::find_best_match;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{LogEntry, Player, Risk, Severity};
use crate::utils::constants::{BADGE_MILESTONES, REASON_DETECTION_NOT_RUN, REASON_NO_MATCH};

/// How a scoring attempt resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreOutcome {
    /// Selection matched a detected risk
    Matched {
        kind: String,
        severity: Option<Severity>,
    },
    /// Risks are loaded but none overlaps the selection
    NoMatch,
    /// No detection result to match against yet
    DetectionNotRun,
}

impl ScoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreOutcome::Matched { .. } => "matched",
            ScoreOutcome::NoMatch => "no_match",
            ScoreOutcome::DetectionNotRun => "detection_not_run",
        }
    }
}

/// Result of evaluating one selection
#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub outcome: ScoreOutcome,
    /// Entry to append to the log, whatever the outcome
    pub entry: LogEntry,
}

impl ScoreResult {
    pub fn points(&self) -> u32 {
        self.entry.points
    }
}

/// Evaluate `raw_selection` for `player` against the current risk list.
///
/// Only an empty (after trimming) selection is an error; misses and a missing
/// detection result are ordinary zero-point outcomes.
pub fn evaluate_selection(risks: &[Risk], player: &str, raw_selection: &str) -> AppResult<ScoreResult> {
    let selection = raw_selection.trim();
    if selection.is_empty() {
        return Err(AppError::empty_selection());
    }

    if risks.is_empty() {
        return Ok(ScoreResult {
            outcome: ScoreOutcome::DetectionNotRun,
            entry: LogEntry::new(player, 0, REASON_DETECTION_NOT_RUN, selection, None),
        });
    }

    let result = match find_best_match(risks, selection) {
        Some(risk) => {
            let severity = risk.tier();
            let reason = format!("Correct! {} ({})", risk.kind, risk.severity);
            ScoreResult {
                outcome: ScoreOutcome::Matched {
                    kind: risk.kind.clone(),
                    severity,
                },
                entry: LogEntry::new(player, risk.points(), reason, selection, severity),
            }
        }
        None => ScoreResult {
            outcome: ScoreOutcome::NoMatch,
            entry: LogEntry::new(player, 0, REASON_NO_MATCH, selection, None),
        },
    };

    Ok(result)
}

/// Milestones reached at `score`
pub fn badges_for(score: u32) -> BTreeSet<u32> {
    BADGE_MILESTONES
        .iter()
        .copied()
        .filter(|m| score >= *m)
        .collect()
}

/// Add `points` to a player and return the badges earned by this award
pub fn award_points(player: &mut Player, points: u32) -> Vec<u32> {
    if points == 0 {
        return Vec::new();
    }
    player.score = player.score.saturating_add(points);

    let mut earned = Vec::new();
    for milestone in badges_for(player.score) {
        if player.badges.insert(milestone) {
            earned.push(milestone);
        }
    }
    earned
}
