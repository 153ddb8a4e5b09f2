//! End-to-end review sessions over in-memory adapters.

use std::sync::Arc;

use crate::in_memory::helpers::{THREE_TASKS_REPLY, board_over, identity, store};
use rstest::rstest;
use taskscribe::board::domain::BoardPhase;
use taskscribe::identity::Identity;
use taskscribe::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{PersistedTask, Priority, TaskPatch},
    ports::TaskStore,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_edit_and_save_session(store: Arc<InMemoryTaskStore>, identity: Identity) {
    let board = board_over(&store, &[THREE_TASKS_REPLY]);
    board.start_session(&identity).await.expect("session starts");

    board.set_raw_text("Minutes of the Monday sync");
    assert!(board.snapshot().can_extract());
    let report = board
        .request_extraction("Minutes of the Monday sync")
        .await;
    assert_eq!(report.candidates.len(), 3);
    assert_eq!(board.snapshot().phase(), BoardPhase::Reviewing);

    let edited = board
        .edit_candidate(
            1,
            &TaskPatch::new()
                .with_assignee("Priya")
                .with_priority(Priority::Urgent),
        )
        .expect("valid edit");
    assert!(edited);
    assert!(board.remove_candidate(2).is_some());

    let saved = board.confirm_save().await.expect("save succeeds");
    assert_eq!(saved, 2);

    let state = board.snapshot();
    let cached: Vec<_> = state
        .persisted()
        .iter()
        .map(|task| (task.description(), task.assignee(), task.priority()))
        .collect();
    assert_eq!(
        cached,
        vec![
            ("Send the budget", "Aman", Priority::Urgent),
            ("Review slides", "Priya", Priority::Urgent),
        ]
    );
    assert_eq!(state.summary().high_priority, 2);
    assert_eq!(state.phase(), BoardPhase::Idle);

    let stored = store
        .list_for_owner(identity.user_id())
        .await
        .expect("list");
    assert_eq!(stored.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_matches_store_order_after_save(
    store: Arc<InMemoryTaskStore>,
    identity: Identity,
) {
    let board = board_over(&store, &[THREE_TASKS_REPLY]);
    board.start_session(&identity).await.expect("session starts");
    board.request_extraction("Monday sync").await;
    board.confirm_save().await.expect("save succeeds");
    let promoted: Vec<_> = board
        .snapshot()
        .persisted()
        .iter()
        .map(PersistedTask::id)
        .collect();

    board.load_persisted().await.expect("refresh succeeds");

    let refreshed: Vec<_> = board
        .snapshot()
        .persisted()
        .iter()
        .map(PersistedTask::id)
        .collect();
    assert_eq!(refreshed.len(), promoted.len());
    assert!(promoted.iter().all(|id| refreshed.contains(id)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clearing_candidates_saves_nothing(store: Arc<InMemoryTaskStore>, identity: Identity) {
    let board = board_over(&store, &[THREE_TASKS_REPLY]);
    board.start_session(&identity).await.expect("session starts");
    board.request_extraction("Monday sync").await;

    board.clear_candidates();

    assert_eq!(board.confirm_save().await.expect("no-op save"), 0);
    assert!(store.is_empty().expect("readable"));
}
