//! Core Module - Game Rules & State
//!
//! Matching, scoring, onboarding, the leaderboard projection and the state
//! container that ties them together.

pub mod game;
pub mod leaderboard;
pub mod matcher;
pub mod roster;
pub mod scoring;
pub mod session;

pub use game::*;
pub use leaderboard::*;
pub use matcher::*;
pub use roster::*;
pub use scoring::*;
pub use session::*;
