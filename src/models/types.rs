//! Type definitions for the contract review game
//! Players, detected risks, the scoring log and the document under review

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use uuid::Uuid;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{PASTED_DOCUMENT_NAME, POINTS_HIGH, POINTS_LOW, POINTS_MEDIUM};

/// Ordinal risk tier driving the point value of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Parse a model-supplied severity, ignoring case and surrounding space
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Severity::High => POINTS_HIGH,
            Severity::Medium => POINTS_MEDIUM,
            Severity::Low => POINTS_LOW,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

}

/// One risky clause reported by the detection call
///
/// Field names follow the JSON objects the model is asked to return. Missing,
/// null or non-string fields deserialize as empty strings so one sloppy object
/// does not sink the whole array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    /// Clause type, e.g. "Liability Clause"
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    /// Verbatim contract excerpt
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    /// Why the clause is risky
    #[serde(default, deserialize_with = "lenient_string")]
    pub explanation: String,
    /// Severity exactly as the model wrote it
    #[serde(default, deserialize_with = "lenient_string")]
    pub severity: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

impl Risk {
    pub fn new(
        kind: impl Into<String>,
        text: impl Into<String>,
        explanation: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            explanation: explanation.into(),
            severity: severity.into(),
        }
    }

    /// Recognised severity tier, if any
    pub fn tier(&self) -> Option<Severity> {
        Severity::parse(&self.severity)
    }

    /// Points awarded for claiming this risk (0 for unknown severity)
    pub fn points(&self) -> u32 {
        self.tier().map(|s| s.points()).unwrap_or(0)
    }
}

/// A competitor in the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub avatar: String,
    pub score: u32,
    /// Milestones reached; only ever grows
    pub badges: BTreeSet<u32>,
}

impl Player {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
            score: 0,
            badges: BTreeSet::new(),
        }
    }
}

/// One scoring attempt, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub player: String,
    pub points: u32,
    pub reason: String,
    pub selection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(
        player: impl Into<String>,
        points: u32,
        reason: impl Into<String>,
        selection: impl Into<String>,
        severity: Option<Severity>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player: player.into(),
            points,
            reason: reason.into(),
            selection: selection.into(),
            severity,
            timestamp: Utc::now(),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.points > 0
    }

    /// One-line rendering for the events feed
    pub fn summary(&self) -> String {
        if self.points > 0 {
            let severity = self
                .severity
                .map(|s| format!(" ({} Risk)", s.as_str()))
                .unwrap_or_default();
            format!("✅ {} +{} ({}{})", self.player, self.points, self.reason, severity)
        } else {
            format!("❌ {} (No points: {})", self.player, self.reason)
        }
    }
}

/// The contract text under review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Text typed or pasted directly by the user
    pub fn pasted(text: impl Into<String>) -> Self {
        Self::new(PASTED_DOCUMENT_NAME, text)
    }

    /// Read a plain-text contract; the document is named after the file.
    /// An unreadable file counts as a missing document.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            let message = format!("Could not read {}: {}", path.display(), e);
            AppError::with_source(ErrorCode::MissingDocument, message, e)
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, text))
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("medium"), Some(Severity::Medium));
        assert_eq!(Severity::parse(" Low "), Some(Severity::Low));
        assert_eq!(Severity::parse("critical"), None);
        assert_eq!(Severity::parse(""), None);
    }

    #[test]
    fn test_risk_points_by_tier() {
        assert_eq!(Risk::new("t", "x", "e", "High").points(), 10);
        assert_eq!(Risk::new("t", "x", "e", "mEdIuM").points(), 5);
        assert_eq!(Risk::new("t", "x", "e", "low").points(), 2);
        assert_eq!(Risk::new("t", "x", "e", "severe").points(), 0);
    }

    #[test]
    fn test_risk_deserializes_with_missing_fields() {
        let risk: Risk =
            serde_json::from_str(r#"{"type":"Termination Clause","text":"may terminate"}"#)
                .unwrap();
        assert_eq!(risk.kind, "Termination Clause");
        assert_eq!(risk.text, "may terminate");
        assert!(risk.explanation.is_empty());
        assert_eq!(risk.tier(), None);
    }

    #[test]
    fn test_risk_tolerates_null_and_non_string_fields() {
        let risk: Risk = serde_json::from_str(
            r#"{"type":null,"text":"payable within 90 days","explanation":42,"severity":null}"#,
        )
        .unwrap();
        assert!(risk.kind.is_empty());
        assert_eq!(risk.text, "payable within 90 days");
        assert!(risk.explanation.is_empty());
        assert_eq!(risk.points(), 0);

        let risk: Risk = serde_json::from_str(r#"{"text":["a"],"severity":{"level":"High"}}"#).unwrap();
        assert!(risk.text.is_empty());
        assert_eq!(risk.tier(), None);
    }

    #[test]
    fn test_log_entry_summary() {
        let hit = LogEntry::new("Ana", 10, "Correct! Liability Clause (High)", "x", Some(Severity::High));
        assert_eq!(hit.summary(), "✅ Ana +10 (Correct! Liability Clause (High) (High Risk))");

        let miss = LogEntry::new("Ana", 0, "No risk detected for this selection.", "x", None);
        assert!(miss.summary().starts_with("❌ Ana (No points:"));
        assert!(!miss.is_hit());
    }

    #[test]
    fn test_document_from_file_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nda.txt");
        std::fs::write(&path, "Confidential information shall...").unwrap();

        let doc = Document::from_file(&path).unwrap();
        assert_eq!(doc.name, "nda.txt");
        assert!(doc.text.starts_with("Confidential"));
        assert!(Document::pasted("  \n").is_blank());

        let err = Document::from_file(dir.path().join("absent.txt")).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingDocument);
    }
}
