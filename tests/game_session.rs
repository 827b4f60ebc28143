//! End-to-end game flow through GameSession with a scripted detector

mod support;

use contract_riskbot::core::scoring::badges_for;
use contract_riskbot::{
    AppError, Document, ErrorCode, GameNotification, GameSession, PlayerEntry, SessionTelemetry,
};
use std::sync::Arc;
use std::time::Duration;
use support::{contract_risks, ScriptedDetector, CONTRACT};

fn session_with(detector: ScriptedDetector) -> (Arc<GameSession>, Arc<ScriptedDetector>) {
    let detector = Arc::new(detector);
    let session = GameSession::new(detector.clone(), Arc::new(SessionTelemetry::new()));
    (Arc::new(session), detector)
}

async fn started(session: &GameSession) {
    session
        .start(vec![
            PlayerEntry::named("Nino"),
            PlayerEntry::named("Giorgi"),
            PlayerEntry::named("Ana"),
        ])
        .await
        .unwrap();
    session.load_document(Document::pasted(CONTRACT)).await.unwrap();
}

#[tokio::test]
async fn test_full_round_scores_and_reveals() {
    let (session, detector) = session_with(ScriptedDetector::new(vec![Ok(contract_risks())]));
    started(&session).await;

    let risks = session.detect().await.unwrap();
    assert_eq!(risks.len(), 3);
    assert_eq!(detector.call_count(), 1);

    let hit = session
        .claim("Nino", "The Supplier shall not be liable for any indirect damages.")
        .await
        .unwrap();
    assert_eq!(hit.points, 10);

    let partial = session.claim("Giorgi", "terminate this agreement").await.unwrap();
    assert_eq!(partial.points, 5);

    let miss = session.claim("Ana", "Invoices are").await.unwrap();
    assert_eq!(miss.points, 0);

    let low = session.claim("Ana", "payable within 90 days").await.unwrap();
    assert_eq!(low.points, 2);

    let board = session.leaderboard().await;
    let ranking: Vec<_> = board.rows.iter().map(|r| (r.name.as_str(), r.score)).collect();
    assert_eq!(ranking, vec![("Nino", 10), ("Giorgi", 5), ("Ana", 2)]);
    assert_eq!(board.ceiling, 100);

    let winners = session.reveal().await.unwrap();
    assert_eq!(winners, vec!["Nino".to_string()]);

    let log = session.log().await;
    assert_eq!(log.len(), 4);
    assert_eq!(
        log.iter().map(|e| e.points).collect::<Vec<_>>(),
        vec![10, 5, 0, 2]
    );

    let stats = session.telemetry().get_stats();
    assert_eq!(stats.selections_scored, 4);
    assert_eq!(stats.correct_selections, 3);
    assert_eq!(stats.points_awarded, 17);
    assert_eq!(stats.detections_succeeded, 1);
}

#[tokio::test]
async fn test_scoring_before_detection_is_logged() {
    let (session, detector) = session_with(ScriptedDetector::new(vec![]));
    started(&session).await;

    let entry = session.claim("Nino", "liable").await.unwrap();
    assert_eq!(entry.points, 0);
    assert_eq!(entry.reason, "Please run risk detection first.");
    assert_eq!(session.log().await.len(), 1);
    assert_eq!(detector.call_count(), 0);
}

#[tokio::test]
async fn test_empty_selection_changes_nothing() {
    let (session, _) = session_with(ScriptedDetector::new(vec![Ok(contract_risks())]));
    started(&session).await;
    session.detect().await.unwrap();

    let err = session.claim("Nino", "   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptySelection);
    assert!(session.log().await.is_empty());
    assert_eq!(session.snapshot().await.player("Nino").unwrap().score, 0);
}

#[tokio::test]
async fn test_failed_detection_keeps_previous_risks() {
    let (session, _) = session_with(ScriptedDetector::new(vec![
        Ok(contract_risks()),
        Err(AppError::detection_network("Error contacting the completion API.")),
        Err(AppError::detection_parse("Could not parse AI response.")),
    ]));
    started(&session).await;
    session.detect().await.unwrap();

    let err = session.detect().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DetectionNetwork);
    let err = session.detect().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DetectionParse);

    let state = session.snapshot().await;
    assert_eq!(state.risks.len(), 3);
    assert!(!state.detection_in_flight);
    assert_eq!(state.detection_error.as_deref(), Some("Could not parse AI response."));

    // Matching still works against the last good result.
    let entry = session.claim("Ana", "payable within 90 days").await.unwrap();
    assert_eq!(entry.points, 2);
}

#[tokio::test]
async fn test_empty_detector_result_is_an_error() {
    let (session, _) = session_with(ScriptedDetector::new(vec![Ok(vec![])]));
    started(&session).await;

    let err = session.detect().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DetectionEmpty);
    let state = session.snapshot().await;
    assert!(state.risks.is_empty());
    assert!(state.detection_error.is_some());
}

#[tokio::test]
async fn test_missing_key_and_document_are_input_errors() {
    let (session, detector) = session_with(ScriptedDetector::new(vec![]).without_key());
    started(&session).await;
    let err = session.detect().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissingApiKey);
    assert_eq!(detector.call_count(), 0);
    assert_eq!(session.telemetry().get_stats().detections_started, 0);

    let (session, detector) = session_with(ScriptedDetector::new(vec![]));
    session.start(vec![PlayerEntry::named("Solo")]).await.unwrap();
    let err = session.detect().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingDocument);
    assert_eq!(detector.call_count(), 0);
    assert!(!session.snapshot().await.detection_in_flight);
}

#[tokio::test]
async fn test_second_detection_refused_while_pending() {
    let (session, detector) = session_with(
        ScriptedDetector::new(vec![Ok(contract_risks()), Ok(contract_risks())])
            .slow(Duration::from_millis(200)),
    );
    started(&session).await;

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.detect().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = session.detect().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DetectionInFlight);

    // Scoring is not blocked by the pending request.
    session.claim("Nino", "anything").await.unwrap();

    assert_eq!(first.await.unwrap().unwrap().len(), 3);
    assert_eq!(detector.call_count(), 1);
}

#[tokio::test]
async fn test_abandoned_detection_still_completes() {
    let (session, detector) = session_with(
        ScriptedDetector::new(vec![Ok(contract_risks()), Ok(contract_risks())])
            .slow(Duration::from_millis(200)),
    );
    started(&session).await;

    let caller = {
        let session = session.clone();
        tokio::spawn(async move { session.detect().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    caller.abort();
    tokio::time::sleep(Duration::from_millis(400)).await;

    let state = session.snapshot().await;
    assert!(!state.detection_in_flight);
    assert_eq!(state.risks.len(), 3);

    assert_eq!(session.detect().await.unwrap().len(), 3);
    assert_eq!(detector.call_count(), 2);
}

#[tokio::test]
async fn test_badges_track_milestones() {
    let (session, _) = session_with(ScriptedDetector::new(vec![Ok(contract_risks())]));
    started(&session).await;
    session.detect().await.unwrap();

    let mut rx = session.subscribe().await;
    for _ in 0..16 {
        session.claim("Giorgi", "shall not be liable").await.unwrap();
        let player = session.snapshot().await.player("Giorgi").cloned().unwrap();
        assert_eq!(player.badges, badges_for(player.score));
    }

    let mut milestones = Vec::new();
    while let Ok(n) = rx.try_recv() {
        if let GameNotification::BadgeEarned { milestone, .. } = n {
            milestones.push(milestone);
        }
    }
    assert_eq!(milestones, vec![50, 100, 150]);
    assert_eq!(session.leaderboard().await.ceiling, 160);
}

#[tokio::test]
async fn test_reveal_with_tie_declares_all_leaders() {
    let (session, _) = session_with(ScriptedDetector::new(vec![Ok(contract_risks())]));
    started(&session).await;
    session.detect().await.unwrap();

    session.claim("Nino", "shall not be liable").await.unwrap();
    session.claim("Giorgi", "shall not be liable").await.unwrap();
    session.claim("Ana", "without notice").await.unwrap();

    let winners = session.reveal().await.unwrap();
    assert_eq!(winners, vec!["Nino".to_string(), "Giorgi".to_string()]);
}
