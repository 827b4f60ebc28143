//! Onboarding: turn the setup form into the player roster

use serde::Deserialize;
use std::collections::HashSet;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::Player;
use crate::utils::constants::{AVATAR_OPTIONS, MAX_PLAYERS, MAX_PLAYER_NAME_CHARS};

/// One row of the setup form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerEntry {
    #[serde(default)]
    pub name: String,
    /// Falls back to the avatar offered at the row's index
    #[serde(default)]
    pub avatar: Option<String>,
}

impl PlayerEntry {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: Some(avatar.into()),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
        }
    }
}

/// Build the roster: blank rows are dropped and at most three players kept,
/// in form order.
pub fn build_roster(entries: &[PlayerEntry]) -> AppResult<Vec<Player>> {
    let filled: Vec<(usize, &PlayerEntry)> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.name.trim().is_empty())
        .take(MAX_PLAYERS)
        .collect();

    if filled.is_empty() {
        return Err(AppError::new(
            ErrorCode::NoPlayers,
            "Please enter at least one player name.",
        ));
    }

    let mut seen = HashSet::new();
    let mut players = Vec::with_capacity(filled.len());

    for (slot, entry) in filled {
        let name = entry.name.trim();
        if name.chars().count() > MAX_PLAYER_NAME_CHARS {
            return Err(AppError::new(
                ErrorCode::InvalidPlayerName,
                format!(
                    "Player name {:?} is longer than {} characters.",
                    name, MAX_PLAYER_NAME_CHARS
                ),
            ));
        }
        if !seen.insert(name.to_string()) {
            return Err(AppError::new(
                ErrorCode::DuplicatePlayerName,
                "Player names must be unique.",
            ));
        }

        let avatar = match entry.avatar.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            Some(a) if AVATAR_OPTIONS.contains(&a) => a.to_string(),
            Some(a) => {
                return Err(AppError::new(
                    ErrorCode::InvalidAvatar,
                    format!("Unknown avatar {:?}", a),
                ))
            }
            None => AVATAR_OPTIONS[slot % AVATAR_OPTIONS.len()].to_string(),
        };

        players.push(Player::new(name, avatar));
    }

    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_rows_dropped_and_names_trimmed() {
        let entries = vec![
            PlayerEntry::named("  "),
            PlayerEntry::named(" Nino "),
            PlayerEntry::named("Giorgi"),
        ];
        let roster = build_roster(&entries).unwrap();
        let names: Vec<_> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Nino", "Giorgi"]);
        // Default avatar follows the form slot, not the roster position.
        assert_eq!(roster[0].avatar, AVATAR_OPTIONS[1]);
        assert_eq!(roster[1].avatar, AVATAR_OPTIONS[2]);
    }

    #[test]
    fn test_at_most_three_players() {
        let entries: Vec<_> = ["A", "B", "C", "D"].iter().map(|n| PlayerEntry::named(*n)).collect();
        assert_eq!(build_roster(&entries).unwrap().len(), 3);
    }

    #[test]
    fn test_rejects_empty_duplicate_and_long_names() {
        assert_eq!(build_roster(&[]).unwrap_err().code, ErrorCode::NoPlayers);

        let dup = vec![PlayerEntry::named("Ana"), PlayerEntry::named(" Ana")];
        assert_eq!(build_roster(&dup).unwrap_err().code, ErrorCode::DuplicatePlayerName);

        let long = vec![PlayerEntry::named("a".repeat(17))];
        assert_eq!(build_roster(&long).unwrap_err().code, ErrorCode::InvalidPlayerName);
        let exact = vec![PlayerEntry::named("a".repeat(16))];
        assert!(build_roster(&exact).is_ok());
    }

    #[test]
    fn test_avatar_must_be_offered() {
        let ok = vec![PlayerEntry::new("Ana", AVATAR_OPTIONS[5])];
        assert_eq!(build_roster(&ok).unwrap()[0].avatar, AVATAR_OPTIONS[5]);

        let bad = vec![PlayerEntry::new("Ana", "🐙")];
        assert_eq!(build_roster(&bad).unwrap_err().code, ErrorCode::InvalidAvatar);
    }
}
