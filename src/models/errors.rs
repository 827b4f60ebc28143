//! Centralized Error Handling Module
//!
//! Every failure in the crate carries a unique code so that the front-end and
//! the logs can tell input mistakes, detection failures and configuration
//! problems apart.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - INPUT_xxx: rejected user input (no state change)
//! - GAME_xxx: action not valid in the current game phase
//! - DETECT_xxx: risk detection (external completion API) failures
//! - API_xxx: HTTP surface errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message, safe to show to players
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors
    // ============================================
    /// Selection was empty after trimming
    EmptySelection,
    /// Detection requested without a loaded document
    MissingDocument,
    /// Onboarding produced no named player
    NoPlayers,
    /// Two onboarding entries share a name
    DuplicatePlayerName,
    /// Player name exceeds the length limit
    InvalidPlayerName,
    /// Avatar is not one of the offered symbols
    InvalidAvatar,
    /// Scoring attempt for a player not in the roster
    UnknownPlayer,

    // ============================================
    // Game Phase Errors
    // ============================================
    /// Play action before onboarding finished
    GameNotStarted,
    /// Onboarding submitted twice
    GameAlreadyStarted,
    /// Reveal requested before any risk was detected
    NoRisksToReveal,
    /// Detection result arrived with no request pending
    NoDetectionPending,

    // ============================================
    // Detection Errors
    // ============================================
    /// A detection request is already pending
    DetectionInFlight,
    /// Completion API unreachable, rejected the key, or returned non-2xx
    DetectionNetwork,
    /// Completion content held a bracketed span that is not a risk array
    DetectionParse,
    /// Completion returned no risks
    DetectionEmpty,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Missing API key
    ConfigMissingApiKey,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptySelection => "INPUT_EMPTY_SELECTION",
            Self::MissingDocument => "INPUT_MISSING_DOCUMENT",
            Self::NoPlayers => "INPUT_NO_PLAYERS",
            Self::DuplicatePlayerName => "INPUT_DUPLICATE_PLAYER_NAME",
            Self::InvalidPlayerName => "INPUT_INVALID_PLAYER_NAME",
            Self::InvalidAvatar => "INPUT_INVALID_AVATAR",
            Self::UnknownPlayer => "INPUT_UNKNOWN_PLAYER",

            Self::GameNotStarted => "GAME_NOT_STARTED",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::NoRisksToReveal => "GAME_NO_RISKS_TO_REVEAL",
            Self::NoDetectionPending => "GAME_NO_DETECTION_PENDING",

            Self::DetectionInFlight => "DETECT_IN_FLIGHT",
            Self::DetectionNetwork => "DETECT_NETWORK",
            Self::DetectionParse => "DETECT_PARSE",
            Self::DetectionEmpty => "DETECT_EMPTY",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigMissingApiKey => "CFG_MISSING_API_KEY",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::EmptySelection
            | Self::MissingDocument
            | Self::NoPlayers
            | Self::DuplicatePlayerName
            | Self::InvalidPlayerName
            | Self::InvalidAvatar
            | Self::ApiBadRequest
            | Self::ConfigInvalidValue => 400,
            Self::ConfigMissingApiKey => 401,
            Self::UnknownPlayer => 404,
            Self::GameNotStarted
            | Self::GameAlreadyStarted
            | Self::NoRisksToReveal
            | Self::NoDetectionPending
            | Self::DetectionInFlight => 409,
            Self::DetectionEmpty => 422,
            Self::DetectionNetwork | Self::DetectionParse => 502,
            _ => 500,
        }
    }

    /// Check if the same action may succeed when simply repeated
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DetectionNetwork | Self::DetectionParse | Self::DetectionEmpty
        )
    }

    /// Input errors abort the triggering action without touching game state
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection
                | Self::MissingDocument
                | Self::NoPlayers
                | Self::DuplicatePlayerName
                | Self::InvalidPlayerName
                | Self::InvalidAvatar
                | Self::UnknownPlayer
                | Self::ConfigMissingApiKey
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn empty_selection() -> Self {
        Self::new(ErrorCode::EmptySelection, "Please select some text first.")
    }

    pub fn missing_document() -> Self {
        Self::new(
            ErrorCode::MissingDocument,
            "Please upload or paste a document first.",
        )
    }

    pub fn unknown_player(name: &str) -> Self {
        Self::new(ErrorCode::UnknownPlayer, format!("Unknown player: {}", name))
    }

    pub fn game_not_started() -> Self {
        Self::new(ErrorCode::GameNotStarted, "Start a game with at least one player first.")
    }

    pub fn no_detection_pending() -> Self {
        Self::new(
            ErrorCode::NoDetectionPending,
            "No risk detection request is pending.",
        )
    }

    pub fn detection_in_flight() -> Self {
        Self::new(ErrorCode::DetectionInFlight, "Risk detection is already running.")
    }

    /// Network or auth failure talking to the completion API
    pub fn detection_network(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DetectionNetwork, msg)
    }

    pub fn detection_parse(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DetectionParse, msg)
    }

    pub fn detection_empty() -> Self {
        Self::new(
            ErrorCode::DetectionEmpty,
            "No risks detected or could not parse AI response.",
        )
    }

    /// Missing API key
    pub fn missing_api_key(key_name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingApiKey,
            format!("Missing API key: {}", key_name),
        )
    }

    pub fn invalid_config(key_name: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key_name, value),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request to the completion API timed out"
        } else if err.is_connect() {
            "Could not connect to the completion API"
        } else {
            "Error contacting the completion API. Check your key and try again."
        };
        Self::with_source(ErrorCode::DetectionNetwork, message, err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorCode::DetectionParse,
            "Could not parse AI response. Try again or with a smaller document.",
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::empty_selection();
        assert_eq!(err.code, ErrorCode::EmptySelection);
        assert_eq!(err.code_str(), "INPUT_EMPTY_SELECTION");
        assert!(err.to_string().starts_with("[INPUT_EMPTY_SELECTION]"));
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::DetectionNetwork.is_retryable());
        assert!(ErrorCode::DetectionEmpty.is_retryable());
        assert!(!ErrorCode::EmptySelection.is_retryable());
        assert!(!ErrorCode::DetectionInFlight.is_retryable());
    }

    #[test]
    fn test_input_errors() {
        assert!(ErrorCode::EmptySelection.is_input_error());
        assert!(ErrorCode::ConfigMissingApiKey.is_input_error());
        assert!(!ErrorCode::DetectionNetwork.is_input_error());
        assert!(!ErrorCode::ApiInternalError.is_input_error());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::EmptySelection.http_status(), 400);
        assert_eq!(ErrorCode::ConfigMissingApiKey.http_status(), 401);
        assert_eq!(ErrorCode::UnknownPlayer.http_status(), 404);
        assert_eq!(ErrorCode::DetectionInFlight.http_status(), 409);
        assert_eq!(ErrorCode::NoDetectionPending.http_status(), 409);
        assert_eq!(ErrorCode::ApiBadRequest.http_status(), 400);
        assert_eq!(ErrorCode::DetectionNetwork.http_status(), 502);
        assert_eq!(ErrorCode::Unknown.http_status(), 500);
    }

    #[test]
    fn test_json_error_maps_to_parse_failure() {
        let json_err = serde_json::from_str::<Vec<u8>>("[oops").unwrap_err();
        let err: AppError = json_err.into();
        assert_eq!(err.code, ErrorCode::DetectionParse);
        assert!(std::error::Error::source(&err).is_some());
    }
}
