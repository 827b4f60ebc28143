//! Contract RiskBot local API server
//!
//! Serves one game session to a local front-end.
//!
//! Usage:
//!   cargo run --bin riskbot_api
//!
//! Environment:
//!   OPENAI_API_KEY          - Completion API key (fallback: VITE_OPENAI_API_KEY)
//!   RISKBOT_COMPLETIONS_URL - Chat-completions endpoint override
//!   RISKBOT_MODEL           - Model override (default: gpt-3.5-turbo)
//!   RISKBOT_HOST            - Bind host (default: 127.0.0.1)
//!   PORT / RISKBOT_PORT     - Bind port (default: 8080)
//!   RUST_LOG                - Log filter (default: info)

use contract_riskbot::api::{create_router, AppState};
use contract_riskbot::core::GameNotification;
use contract_riskbot::utils::constants::{APP_NAME, APP_VERSION};
use contract_riskbot::{GameSession, OpenAiDetector, ServerConfig, SessionTelemetry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let detector = OpenAiDetector::from_env()?;
    if !detector.config().has_api_key() {
        warn!("⚠️ OPENAI_API_KEY not set: risk detection will be refused until it is configured");
    }

    let telemetry = Arc::new(SessionTelemetry::new());
    let session = Arc::new(GameSession::new(Arc::new(detector), telemetry.clone()));

    spawn_event_feed(&session).await;

    let state = Arc::new(AppState::new(session));
    let app = create_router(state);

    let server = ServerConfig::from_env()?;
    let addr = server.socket_addr()?;

    info!("🚀 {} v{} API starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  POST /v1/game/start     - Register up to 3 players");
    info!("  POST /v1/document       - Load contract text or a local file");
    info!("  POST /v1/risks/detect   - Ask the model for risky clauses");
    info!("  POST /v1/score          - Claim a selection for a player");
    info!("  POST /v1/reveal         - Reveal risks and winners");
    info!("  GET  /v1/state | /v1/leaderboard | /v1/log | /v1/stats");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    let stats = telemetry.get_stats();
    info!("🛑 Shutdown signal received");
    info!("   Selections scored: {}", stats.selections_scored);
    info!("   Correct:           {}", stats.correct_selections);
    info!("   Points awarded:    {}", stats.points_awarded);
    info!("   Detection runs:    {}", stats.detections_started);

    Ok(())
}

/// Log every game notification as it happens
async fn spawn_event_feed(session: &GameSession) {
    let mut rx = session.subscribe().await;
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(GameNotification::SelectionScored { entry, .. }) => info!("📜 {}", entry.summary()),
                Ok(GameNotification::BadgeEarned { player, milestone }) => {
                    info!("🏆 {} earned the {} point badge", player, milestone)
                }
                Ok(other) => info!(event = ?other, "📣 Game update"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event feed fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}
