//! Constants Module - Single Source of Truth
//!
//! Game rules, onboarding limits and the completion API wire defaults live
//! here so that no other module hardcodes them.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "ContractRiskBot";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = concat!("ContractRiskBot/", env!("CARGO_PKG_VERSION"));

// ============================================
// GAME RULES
// ============================================

/// Score milestones that award a badge
pub const BADGE_MILESTONES: [u32; 3] = [50, 100, 150];

/// Points for a High severity risk
pub const POINTS_HIGH: u32 = 10;
/// Points for a Medium severity risk
pub const POINTS_MEDIUM: u32 = 5;
/// Points for a Low severity risk
pub const POINTS_LOW: u32 = 2;

/// Leaderboard progress bars never scale below this score
pub const LEADERBOARD_MIN_CEILING: u32 = 100;

// ============================================
// ONBOARDING
// ============================================

/// Maximum number of players per game
pub const MAX_PLAYERS: usize = 3;

/// Maximum player name length (characters)
pub const MAX_PLAYER_NAME_CHARS: usize = 16;

/// Avatar symbols offered at onboarding
pub const AVATAR_OPTIONS: [&str; 12] = [
    "🧑‍💼", "👩‍💻", "👨‍⚖️", "🦸‍♂️", "🦸‍♀️", "🧑‍🎨", "🧑‍🚀", "🧑‍🔬", "🧑‍🏫", "🧑‍🌾", "🧑‍🍳", "🧑‍🎤",
];

/// Display name given to pasted documents
pub const PASTED_DOCUMENT_NAME: &str = "Pasted Document";

// ============================================
// SCORING LOG REASONS
// ============================================

pub const REASON_NO_MATCH: &str = "No risk detected for this selection.";
pub const REASON_DETECTION_NOT_RUN: &str = "Please run risk detection first.";

// ============================================
// COMPLETION API
// ============================================

/// Default OpenAI-compatible chat-completions endpoint
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default completion token budget
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Environment variables consulted for the completion API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENAI_API_KEY", "VITE_OPENAI_API_KEY"];

/// Placeholder values that count as "no key configured"
pub const API_KEY_PLACEHOLDERS: [&str; 2] = ["YOUR_API_KEY", "sk-..."];

/// System message sent with every detection request
pub const SYSTEM_PROMPT: &str = "You are a helpful contract risk analysis assistant.";

/// Instructions prepended to the contract text in the user message
pub const RISK_PROMPT_PREAMBLE: &str = "You are a contract risk analysis assistant. \
Analyze the following contract text and extract a list of risky clauses, such as \
'Liability Clause', 'Termination Clause', 'Indemnification Clause', etc. For each risk, provide:\n\
- The clause type (e.g., Liability Clause)\n\
- The exact text from the contract\n\
- A short explanation of why it is risky.\n\
- The risk severity: High, Medium, or Low.\n\
Return the result as a JSON array with objects: { type, text, explanation, severity }\n\n\
Contract:\n";

/// Build the user prompt for a contract
pub fn build_risk_prompt(contract_text: &str) -> String {
    format!("{}{}", RISK_PROMPT_PREAMBLE, contract_text)
}

// ============================================
// SERVER DEFAULTS
// ============================================

/// Default bind host (local front-end only)
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port
pub const DEFAULT_PORT: u16 = 8080;

/// Capacity of the game notification channel
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_contract_last() {
        let prompt = build_risk_prompt("The Supplier shall not be liable.");
        assert!(prompt.starts_with("You are a contract risk analysis assistant."));
        assert!(prompt.contains("{ type, text, explanation, severity }"));
        assert!(prompt.ends_with("Contract:\nThe Supplier shall not be liable."));
    }

    #[test]
    fn test_milestones_ascending() {
        assert!(BADGE_MILESTONES.windows(2).all(|w| w[0] < w[1]));
    }
}
