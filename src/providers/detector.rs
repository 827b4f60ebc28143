//! Risk detection capability
//!
//! The game never talks to a completion API directly; it goes through this
//! trait so sessions can run against the real endpoint or a scripted fake.

use async_trait::async_trait;

use crate::models::errors::AppResult;
use crate::models::types::Risk;

#[async_trait]
pub trait RiskDetector: Send + Sync {
    /// Short identifier for logs
    fn backend_tag(&self) -> &'static str;

    /// Fail fast, before any game state changes, when the detector cannot
    /// possibly run (e.g. no credential configured).
    fn ensure_ready(&self) -> AppResult<()> {
        Ok(())
    }

    /// Identify risky clauses in `contract_text`.
    ///
    /// Errors use `DetectionNetwork`, `DetectionParse` or `DetectionEmpty`;
    /// a successful result is never empty.
    async fn detect_risks(&self, contract_text: &str) -> AppResult<Vec<Risk>>;
}
