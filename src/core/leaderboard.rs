//! Leaderboard projection
//!
//! Stateless views over the player list: ranking rows with progress bars,
//! and the winner set shown when answers are revealed.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::types::Player;
use crate::utils::constants::LEADERBOARD_MIN_CEILING;

/// One ranked row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub avatar: String,
    pub score: u32,
    pub badges: BTreeSet<u32>,
    /// Progress bar fill, 0-100
    pub progress_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    /// Denominator for progress bars
    pub ceiling: u32,
    pub rows: Vec<LeaderboardRow>,
}

/// `max(all scores, 100)`
pub fn display_ceiling(players: &[Player]) -> u32 {
    players
        .iter()
        .map(|p| p.score)
        .max()
        .unwrap_or(0)
        .max(LEADERBOARD_MIN_CEILING)
}

/// Rank players by descending score; equal scores keep roster order
pub fn project(players: &[Player]) -> Leaderboard {
    let ceiling = display_ceiling(players);
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    let rows = sorted
        .into_iter()
        .enumerate()
        .map(|(idx, p)| LeaderboardRow {
            rank: idx + 1,
            name: p.name.clone(),
            avatar: p.avatar.clone(),
            score: p.score,
            badges: p.badges.clone(),
            progress_pct: p.score as f64 / ceiling as f64 * 100.0,
        })
        .collect();

    Leaderboard { ceiling, rows }
}

/// Every player tied at the top score, in roster order
pub fn winners(players: &[Player]) -> Vec<String> {
    let Some(top) = players.iter().map(|p| p.score).max() else {
        return Vec::new();
    };
    players
        .iter()
        .filter(|p| p.score == top)
        .map(|p| p.name.clone())
        .collect()
}
