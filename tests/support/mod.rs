//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use contract_riskbot::{AppError, AppResult, Risk, RiskDetector};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Detector that replays scripted results in order
pub struct ScriptedDetector {
    pub replies: Mutex<VecDeque<AppResult<Vec<Risk>>>>,
    pub calls: AtomicU64,
    pub delay: Option<Duration>,
    pub ready: bool,
}

impl ScriptedDetector {
    pub fn new(replies: Vec<AppResult<Vec<Risk>>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicU64::new(0),
            delay: None,
            ready: true,
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn without_key(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RiskDetector for ScriptedDetector {
    fn backend_tag(&self) -> &'static str {
        "scripted"
    }

    fn ensure_ready(&self) -> AppResult<()> {
        if self.ready {
            Ok(())
        } else {
            Err(AppError::missing_api_key("OPENAI_API_KEY"))
        }
    }

    async fn detect_risks(&self, _contract_text: &str) -> AppResult<Vec<Risk>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AppError::detection_network("script exhausted")))
    }
}

pub const CONTRACT: &str = "1. The Supplier shall not be liable for any indirect damages.\n\
2. Either party may terminate this agreement at any time without notice.\n\
3. Invoices are payable within 90 days of receipt.";

pub fn contract_risks() -> Vec<Risk> {
    vec![
        Risk::new(
            "Liability Clause",
            "The Supplier shall not be liable for any indirect damages.",
            "Excludes a broad class of damages.",
            "High",
        ),
        Risk::new(
            "Termination Clause",
            "may terminate this agreement at any time without notice",
            "No notice period.",
            "Medium",
        ),
        Risk::new(
            "Payment Clause",
            "payable within 90 days",
            "Long payment window.",
            "Low",
        ),
    ]
}
