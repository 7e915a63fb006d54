//! Stage transitions against an in-memory remote store

mod support;

use std::sync::Arc;

use dealflow_core::{
    project, CacheEventKind, PipelineFilter, QueryCache, RejectReason, RepositorySource,
    ResourceKey, StageMove, StageTransitionController, TransitionOutcome,
};
use dealflow_domain::constants::{MSG_MOVE_FAILED, MSG_MOVE_PENDING};
use dealflow_domain::{CrmError, NotificationLevel, Stage};
use rust_decimal::Decimal;
use support::fixtures::seeded_deals;
use support::notifier::RecordingNotifier;
use support::repositories::{MockContactRepository, MockDealRepository, MockReportRepository};
use tokio::sync::Notify;

struct Harness {
    repo: Arc<MockDealRepository>,
    reports: Arc<MockReportRepository>,
    cache: Arc<QueryCache>,
    notifier: RecordingNotifier,
    controller: Arc<StageTransitionController>,
}

fn harness(repo: MockDealRepository) -> Harness {
    let repo = Arc::new(repo);
    let reports = Arc::new(MockReportRepository::default());
    let source = RepositorySource::new(
        repo.clone(),
        Arc::new(MockContactRepository::default()),
        reports.clone(),
    );
    let cache = Arc::new(QueryCache::new(Arc::new(source)));
    let notifier = RecordingNotifier::new();
    let controller = Arc::new(StageTransitionController::new(
        repo.clone(),
        cache.clone(),
        Arc::new(notifier.clone()),
    ));
    Harness { repo, reports, cache, notifier, controller }
}

async fn board(h: &Harness) -> dealflow_core::PipelineProjection {
    let deals = h.cache.deals().await.into_result().expect("deals load");
    project(&deals, &PipelineFilter::all())
}

#[tokio::test]
async fn successful_move_is_visible_on_next_read() {
    let h = harness(MockDealRepository::new(seeded_deals()));

    let before = board(&h).await;
    assert_eq!(before.stage(Stage::Prospecting).unwrap().count, 2);

    let outcome = h
        .controller
        .request_transition(StageMove::board("1", Stage::Prospecting, Stage::Negotiation))
        .await;
    assert!(outcome.is_moved());
    assert_eq!(h.repo.stage_calls(), 1);

    let after = board(&h).await;
    assert_eq!(h.repo.list_calls(), 2, "invalidation should force a refetch");

    let prospecting = after.stage(Stage::Prospecting).unwrap();
    assert_eq!(prospecting.count, 1);
    assert_eq!(prospecting.total_value, Decimal::from(2000));

    let negotiation = after.stage(Stage::Negotiation).unwrap();
    assert_eq!(negotiation.count, 1);
    assert_eq!(negotiation.total_value, Decimal::from(1000));
    assert_eq!(after.total_value, before.total_value);

    let note = h.notifier.last().unwrap();
    assert_eq!(note.level, NotificationLevel::Success);
    assert!(note.message.contains("Negotiation"));
}

#[tokio::test]
async fn failed_move_leaves_cache_untouched() {
    let h = harness(MockDealRepository::new(seeded_deals()).failing());
    let before = board(&h).await;

    let outcome = h
        .controller
        .request_transition(StageMove::board("1", Stage::Prospecting, Stage::Negotiation))
        .await;

    assert!(matches!(outcome, TransitionOutcome::Failed(CrmError::Network(_))));
    assert_eq!(h.repo.stage_calls(), 1);

    let after = board(&h).await;
    assert_eq!(h.repo.list_calls(), 1, "a failed move must not invalidate");
    assert_eq!(after, before);
    assert_eq!(after.stage_of("1"), Some(Stage::Prospecting));

    let note = h.notifier.last().unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(note.message, MSG_MOVE_FAILED);
}

#[tokio::test]
async fn same_stage_move_sends_nothing() {
    let h = harness(MockDealRepository::new(seeded_deals()));

    let outcome = h
        .controller
        .request_transition(StageMove::board("1", Stage::Prospecting, Stage::Prospecting))
        .await;

    assert_eq!(outcome, TransitionOutcome::Unchanged);
    assert_eq!(h.repo.stage_calls(), 0);
    assert!(h.notifier.all().is_empty());
}

#[tokio::test]
async fn board_cannot_drop_into_lost() {
    let h = harness(MockDealRepository::new(seeded_deals()));

    let outcome = h
        .controller
        .request_transition(StageMove::board("1", Stage::Prospecting, Stage::ClosedLost))
        .await;

    assert_eq!(outcome, TransitionOutcome::Rejected(RejectReason::LostNotOnBoard));
    assert_eq!(h.repo.stage_calls(), 0);
    assert_eq!(h.notifier.count(NotificationLevel::Warning), 1);
}

#[tokio::test]
async fn direct_edit_can_mark_deal_lost() {
    let h = harness(MockDealRepository::new(seeded_deals()));

    let outcome = h.controller.move_deal("1", Stage::ClosedLost).await;

    assert!(outcome.is_moved());
    assert_eq!(h.repo.stage_calls(), 1);
    assert_eq!(board(&h).await.stage_of("1"), Some(Stage::ClosedLost));
}

#[tokio::test]
async fn moving_unknown_deal_sends_nothing() {
    let h = harness(MockDealRepository::new(seeded_deals()));

    let outcome = h.controller.move_deal("missing", Stage::Proposal).await;

    assert!(matches!(outcome, TransitionOutcome::Failed(CrmError::NotFound(_))));
    assert_eq!(h.repo.stage_calls(), 0);
}

#[tokio::test]
async fn second_move_of_pending_deal_is_refused() {
    let repo = MockDealRepository::new(seeded_deals());
    let gate = Arc::new(Notify::new());
    repo.hold_stage_updates(gate.clone());
    let h = harness(repo);

    let controller = h.controller.clone();
    let first = tokio::spawn(async move {
        controller
            .request_transition(StageMove::board("1", Stage::Prospecting, Stage::Qualification))
            .await
    });

    while !h.controller.is_pending("1") {
        tokio::task::yield_now().await;
    }

    let second = h
        .controller
        .request_transition(StageMove::board("1", Stage::Prospecting, Stage::Proposal))
        .await;
    assert_eq!(second, TransitionOutcome::InFlight);
    assert_eq!(h.notifier.last().unwrap().message, MSG_MOVE_PENDING);

    gate.notify_one();
    let first = first.await.unwrap();
    assert!(first.is_moved());
    assert!(!h.controller.is_pending("1"));
    assert_eq!(h.repo.stage_calls(), 1);
    assert_eq!(board(&h).await.stage_of("1"), Some(Stage::Qualification));
}

#[tokio::test]
async fn successful_move_refreshes_dashboard_too() {
    let h = harness(MockDealRepository::new(seeded_deals()));
    let mut events = h.cache.subscribe();

    h.cache.dashboard().await.into_result().unwrap();
    assert_eq!(h.reports.calls(), 1);

    h.controller
        .request_transition(StageMove::board("2", Stage::Prospecting, Stage::Proposal))
        .await;

    h.cache.dashboard().await.into_result().unwrap();
    assert_eq!(h.reports.calls(), 2);

    let mut invalidated = Vec::new();
    while let Ok(event) = events.try_recv() {
        if event.kind == CacheEventKind::Invalidated {
            invalidated.push(event.key);
        }
    }
    assert!(invalidated.contains(&ResourceKey::Deals));
    assert!(invalidated.contains(&ResourceKey::Dashboard));
}
