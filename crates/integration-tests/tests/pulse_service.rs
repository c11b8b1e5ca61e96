//! Service-level tests: scoring, history, trend and the local fallback.
//!
//! Everything runs in-process on the memory store, with [`FaultyStore`]
//! standing in for a database that is down.

use sales_pulse_core::{AuditDraft, TrendDirection};
use sales_pulse_integration_tests::{FaultyStore, Op, draft};
use sales_pulse_web::db::{MemoryPulseStore, PulseStore};
use sales_pulse_web::models::{MirrorData, NewSalesRep};
use sales_pulse_web::services::{LocalMirror, MemoryMirror, Outcome, PulseError, PulseService};

const MANAGER: &str = "manager@corp.com";

async fn mirror_data(mirror: &MemoryMirror) -> MirrorData {
    mirror.load().await.expect("mirror readable")
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_first_submission_has_no_trend() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let outcome = service
        .submit_audit(&draft(MANAGER, "Thomas", 30))
        .await
        .expect("valid draft");

    assert!(!outcome.is_degraded());
    let submission = outcome.into_value();
    assert_eq!(submission.audit.total_score, 10);
    assert_eq!(submission.history.len(), 1);
    assert!(submission.trend.is_none());
}

#[tokio::test]
async fn test_second_submission_reports_trend() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    service
        .submit_audit(&draft(MANAGER, "Thomas", 30))
        .await
        .expect("valid draft");
    let submission = service
        .submit_audit(&draft(MANAGER, "Thomas", 60))
        .await
        .expect("valid draft")
        .into_value();

    let scores: Vec<u8> = submission.history.iter().map(|p| p.total_score).collect();
    assert_eq!(scores, vec![10, 20]);

    let trend = submission.trend.expect("two scores give a trend");
    assert_eq!(trend.direction, TrendDirection::Up);
    assert_eq!(trend.magnitude_percent, Some(100));
}

#[tokio::test]
async fn test_history_keeps_last_five_oldest_first() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let mut last = None;
    for actions in [3, 6, 9, 12, 15, 18, 21] {
        last = Some(
            service
                .submit_audit(&draft(MANAGER, "Julie", actions))
                .await
                .expect("valid draft"),
        );
    }

    let submission = last.expect("submitted").into_value();
    let scores: Vec<u8> = submission.history.iter().map(|p| p.total_score).collect();
    assert_eq!(scores, vec![3, 4, 5, 6, 7]);
}

#[tokio::test]
async fn test_history_is_per_manager_and_rep() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    service
        .submit_audit(&draft("other@corp.com", "Thomas", 90))
        .await
        .expect("valid draft");
    service
        .submit_audit(&draft(MANAGER, "Julie", 90))
        .await
        .expect("valid draft");
    let submission = service
        .submit_audit(&draft(MANAGER, "Thomas", 30))
        .await
        .expect("valid draft")
        .into_value();

    assert_eq!(submission.history.len(), 1);
    assert!(submission.trend.is_none());
}

#[tokio::test]
async fn test_small_change_is_stable() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    service
        .submit_audit(&draft(MANAGER, "Thomas", 60))
        .await
        .expect("valid draft");
    let trend = service
        .submit_audit(&draft(MANAGER, "Thomas", 66))
        .await
        .expect("valid draft")
        .into_value()
        .trend
        .expect("trend");

    assert_eq!(trend.direction, TrendDirection::Stable);
}

#[tokio::test]
async fn test_submission_rejects_missing_rep_and_bad_email() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let no_rep = AuditDraft {
        sales_rep_name: "   ".to_string(),
        ..draft(MANAGER, "", 30)
    };
    assert!(matches!(
        service.submit_audit(&no_rep).await,
        Err(PulseError::MissingRepName)
    ));

    let bad_email = draft("not-an-email", "Thomas", 30);
    assert!(matches!(
        service.submit_audit(&bad_email).await,
        Err(PulseError::InvalidEmail(_))
    ));

    let stored = store.list_all_recent(50).await.expect("memory store");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_submission_with_store_down_uses_mirror() {
    let store = FaultyStore::down();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let first = service
        .submit_audit(&draft(MANAGER, "Thomas", 30))
        .await
        .expect("valid draft");
    assert!(first.is_degraded());

    let second = service
        .submit_audit(&draft(MANAGER, "Thomas", 90))
        .await
        .expect("valid draft");
    assert!(second.is_degraded());
    assert!(second.reason().is_some_and(|r| r.contains("not saved")));

    let submission = second.into_value();
    let scores: Vec<u8> = submission.history.iter().map(|p| p.total_score).collect();
    assert_eq!(scores, vec![10, 30]);
    assert_eq!(
        submission.trend.map(|t| t.direction),
        Some(TrendDirection::Up)
    );

    assert_eq!(mirror_data(&mirror).await.audits.len(), 2);
}

#[tokio::test]
async fn test_history_failure_after_insert_is_degraded() {
    let store = FaultyStore::new().failing([Op::RecentScores]);
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let outcome = service
        .submit_audit(&draft(MANAGER, "Thomas", 30))
        .await
        .expect("valid draft");

    assert!(outcome.is_degraded());
    assert!(
        outcome
            .reason()
            .is_some_and(|r| r.contains("history unavailable"))
    );

    let submission = outcome.into_value();
    let stored = store.inner().list_all_recent(50).await.expect("memory store");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.first().map(|a| a.id), Some(submission.audit.id));
    assert_eq!(submission.history.len(), 1);
}

#[tokio::test]
async fn test_submission_is_mirrored_even_when_live() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    service
        .submit_audit(&draft(MANAGER, "Thomas", 30))
        .await
        .expect("valid draft");

    let data = mirror_data(&mirror).await;
    assert_eq!(data.audits.len(), 1);
    assert_eq!(
        data.audits.first().map(|a| a.sales_rep_name.as_str()),
        Some("Thomas")
    );
}

// ============================================================================
// Reps
// ============================================================================

#[tokio::test]
async fn test_rep_list_seeds_defaults_once() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let first = service.list_reps().await;
    let second = service.list_reps().await;

    assert!(!first.is_degraded());
    let names: Vec<String> = second.into_value().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Julie".to_string(), "Thomas".to_string()]);
}

#[tokio::test]
async fn test_seeding_skipped_when_reps_exist() {
    let store = MemoryPulseStore::new();
    store
        .create_rep(NewSalesRep::new("Camille", None).expect("valid rep"))
        .await
        .expect("memory store");
    let mirror = MemoryMirror::new();

    let reps = PulseService::new(&store, &mirror)
        .list_reps()
        .await
        .into_value();

    assert_eq!(reps.len(), 1);
    assert_eq!(reps.first().map(|r| r.name.as_str()), Some("Camille"));
}

#[tokio::test]
async fn test_rep_list_with_store_down_uses_stable_defaults() {
    let store = FaultyStore::down();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let first = service.list_reps().await;
    let second = service.list_reps().await;

    assert!(first.is_degraded());
    assert!(second.is_degraded());
    let first_ids: Vec<_> = first.into_value().iter().map(|r| r.id).collect();
    let second_ids: Vec<_> = second.into_value().iter().map(|r| r.id).collect();
    assert_eq!(first_ids.len(), 2);
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn test_rep_list_with_store_down_uses_last_seen_list() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let live = PulseService::new(&store, &mirror).list_reps().await;
    assert!(!live.is_degraded());

    let down = FaultyStore::down();
    let fallback = PulseService::new(&down, &mirror).list_reps().await;

    assert!(fallback.is_degraded());
    assert_eq!(fallback.value(), live.value());
}

#[tokio::test]
async fn test_added_rep_survives_store_outage() {
    let store = FaultyStore::down();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let added = service
        .add_rep(NewSalesRep::new("Camille", Some("camille@corp.com")).expect("valid rep"))
        .await;
    assert!(added.is_degraded());

    let reps = service.list_reps().await.into_value();
    assert!(reps.iter().any(|r| r.name == "Camille"));
    assert!(reps.iter().any(|r| r.name == "Thomas"));
}

#[tokio::test]
async fn test_live_add_does_not_invent_default_reps() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let added = service
        .add_rep(NewSalesRep::new("Camille", None).expect("valid rep"))
        .await;
    assert!(!added.is_degraded());
    assert!(mirror_data(&mirror).await.reps.is_none());

    let down = FaultyStore::down();
    let fallback = PulseService::new(&down, &mirror).list_reps().await;
    assert!(fallback.value().iter().all(|r| r.name != "Camille"));
}

#[tokio::test]
async fn test_live_add_extends_last_seen_list() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    service.list_reps().await;
    let added = service
        .add_rep(NewSalesRep::new("Camille", None).expect("valid rep"))
        .await
        .into_value();

    let mirrored = mirror_data(&mirror).await.reps.expect("list was seen");
    assert_eq!(mirrored.len(), 3);
    assert!(mirrored.iter().any(|r| r.id == added.id));
}

#[tokio::test]
async fn test_submission_for_deleted_rep_is_stored_live() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let julie = service
        .add_rep(NewSalesRep::new("Julie", None).expect("valid rep"))
        .await
        .into_value();
    service.delete_rep(julie.id).await.expect("known rep");

    let mut audit = draft(MANAGER, "Julie", 30);
    audit.sales_rep_id = Some(julie.id);
    let outcome = service.submit_audit(&audit).await.expect("valid draft");

    assert!(!outcome.is_degraded());
    assert!(outcome.value().audit.sales_rep_id.is_none());
    assert_eq!(store.list_all_recent(50).await.expect("readable").len(), 1);
}

#[tokio::test]
async fn test_delete_rep_keeps_audit_names() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let reps = service.list_reps().await.into_value();
    let thomas = reps
        .iter()
        .find(|r| r.name == "Thomas")
        .expect("seeded")
        .clone();

    let mut audit = draft(MANAGER, "Thomas", 30);
    audit.sales_rep_id = Some(thomas.id);
    service.submit_audit(&audit).await.expect("valid draft");

    let deleted = service.delete_rep(thomas.id).await.expect("known rep");
    assert_eq!(deleted, Outcome::Live(()));

    let names: Vec<String> = service
        .list_reps()
        .await
        .into_value()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Julie".to_string()]);

    let audits = service.recent_audits().await.into_value();
    assert_eq!(
        audits.first().map(|a| a.sales_rep_name.as_str()),
        Some("Thomas")
    );
}

#[tokio::test]
async fn test_delete_unknown_rep_is_not_found() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let result = service
        .delete_rep(sales_pulse_core::SalesRepId::generate())
        .await;
    assert!(matches!(result, Err(PulseError::RepNotFound)));
}

#[tokio::test]
async fn test_delete_local_only_rep() {
    let mirror = MemoryMirror::new();
    let down = FaultyStore::down();
    let added = PulseService::new(&down, &mirror)
        .add_rep(NewSalesRep::new("Camille", None).expect("valid rep"))
        .await
        .into_value();

    // Store is back but never saw this rep.
    let store = MemoryPulseStore::new();
    let result = PulseService::new(&store, &mirror)
        .delete_rep(added.id)
        .await
        .expect("mirrored rep");

    assert!(!result.is_degraded());
    let mirrored = mirror_data(&mirror).await.reps.unwrap_or_default();
    assert!(mirrored.iter().all(|r| r.id != added.id));
}

#[tokio::test]
async fn test_delete_with_store_down_is_degraded() {
    let store = FaultyStore::down();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    let reps = service.list_reps().await.into_value();
    let julie = reps.iter().find(|r| r.name == "Julie").expect("default");

    let result = service.delete_rep(julie.id).await.expect("no hard error");
    assert!(result.is_degraded());

    let remaining = service.list_reps().await.into_value();
    assert!(remaining.iter().all(|r| r.name != "Julie"));
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_recent_audits_newest_first() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    for rep in ["Thomas", "Julie", "Camille"] {
        service
            .submit_audit(&draft(MANAGER, rep, 30))
            .await
            .expect("valid draft");
    }

    let outcome = service.recent_audits().await;
    assert!(!outcome.is_degraded());
    let names: Vec<&str> = outcome
        .value()
        .iter()
        .map(|a| a.sales_rep_name.as_str())
        .collect();
    assert_eq!(names, vec!["Camille", "Julie", "Thomas"]);
}

#[tokio::test]
async fn test_recent_audits_capped_at_fifty() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();
    let service = PulseService::new(&store, &mirror);

    for _ in 0..55 {
        service
            .submit_audit(&draft(MANAGER, "Thomas", 30))
            .await
            .expect("valid draft");
    }

    assert_eq!(service.recent_audits().await.value().len(), 50);
}

#[tokio::test]
async fn test_recent_audits_empty_everywhere_is_live() {
    let store = MemoryPulseStore::new();
    let mirror = MemoryMirror::new();

    let outcome = PulseService::new(&store, &mirror).recent_audits().await;
    assert_eq!(outcome, Outcome::Live(Vec::new()));
}

#[tokio::test]
async fn test_recent_audits_fall_back_to_mirror() {
    let mirror = MemoryMirror::new();
    let down = FaultyStore::down();
    PulseService::new(&down, &mirror)
        .submit_audit(&draft(MANAGER, "Thomas", 30))
        .await
        .expect("valid draft");

    let outcome = PulseService::new(&down, &mirror).recent_audits().await;
    assert!(outcome.is_degraded());
    assert_eq!(outcome.value().len(), 1);

    // An empty but reachable store also defers to the mirror.
    let empty = MemoryPulseStore::new();
    let outcome = PulseService::new(&empty, &mirror).recent_audits().await;
    assert!(outcome.is_degraded());
    assert_eq!(outcome.reason(), Some("store returned no audits"));
}
