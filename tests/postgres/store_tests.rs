//! `PostgreSQL` task store behaviour.

use crate::postgres::helpers::{PostgresCluster, StoreContext, postgres_cluster, unique_owner};
use rstest::{fixture, rstest};
use taskscribe::task::{
    domain::{CandidateTask, Priority, TaskId, TaskPatch},
    ports::{TaskStore, TaskStoreError},
};

#[fixture]
fn context(postgres_cluster: PostgresCluster) -> StoreContext {
    StoreContext::new(postgres_cluster).expect("store setup")
}

fn candidate(description: &str, priority: Priority) -> CandidateTask {
    CandidateTask::new(description, "Sam", "Friday", priority).expect("valid candidate")
}

#[rstest]
fn create_assigns_identity_and_timestamp(context: StoreContext) {
    let StoreContext { store, rt, .. } = &context;
    let owner = unique_owner();

    let created = rt
        .block_on(store.create(&owner, &candidate("Ship release notes", Priority::Urgent)))
        .expect("create");

    assert_eq!(created.owner_id(), &owner);
    assert_eq!(created.priority(), Priority::Urgent);
    assert!(!created.is_completed());
    let listed = rt.block_on(store.list_for_owner(&owner)).expect("list");
    assert_eq!(listed, vec![created]);
}

#[rstest]
fn free_form_fields_have_no_length_cap(context: StoreContext) {
    let StoreContext { store, rt, .. } = &context;
    let owner = unique_owner();
    let deadline = "after the quarterly review, once finance signs off on the revised budget, \
                    legal has cleared the vendor contract, the design team has delivered the \
                    final mock-ups for the onboarding flow, and the platform group confirms the \
                    staging environment can take production-sized traffic without falling over";
    let assignee = "Sam ".repeat(80);
    assert!(deadline.len() > 255);
    let long = CandidateTask::new("Ship it", assignee.as_str(), deadline, Priority::Low)
        .expect("valid candidate");

    let created = rt.block_on(store.create(&owner, &long)).expect("create");

    assert_eq!(created.deadline(), deadline);
    assert_eq!(created.assignee(), assignee.trim());
    let listed = rt.block_on(store.list_for_owner(&owner)).expect("list");
    assert_eq!(listed, vec![created]);
}

#[rstest]
fn list_is_owner_scoped_and_newest_first(context: StoreContext) {
    let StoreContext { store, rt, .. } = &context;
    let owner = unique_owner();
    let other = unique_owner();
    for description in ["first", "second", "third"] {
        rt.block_on(store.create(&owner, &candidate(description, Priority::Low)))
            .expect("create");
    }
    rt.block_on(store.create(&other, &candidate("foreign", Priority::Low)))
        .expect("create");

    let listed = rt.block_on(store.list_for_owner(&owner)).expect("list");

    let order: Vec<_> = listed.iter().map(|task| task.description()).collect();
    assert_eq!(order, vec!["third", "second", "first"]);
}

#[rstest]
fn update_is_partial_and_owner_scoped(context: StoreContext) {
    let StoreContext { store, rt, .. } = &context;
    let owner = unique_owner();
    let intruder = unique_owner();
    let created = rt
        .block_on(store.create(&owner, &candidate("Draft memo", Priority::Medium)))
        .expect("create");

    let foreign = rt.block_on(store.update(
        &intruder,
        created.id(),
        &TaskPatch::new().with_completed(true),
    ));
    assert!(matches!(foreign, Err(TaskStoreError::NotFound(_))));

    rt.block_on(store.update(
        &owner,
        created.id(),
        &TaskPatch::new().with_completed(true).with_deadline("Monday"),
    ))
    .expect("update");

    let listed = rt.block_on(store.list_for_owner(&owner)).expect("list");
    let updated = listed.first().expect("one task");
    assert!(updated.is_completed());
    assert_eq!(updated.deadline(), "Monday");
    assert_eq!(updated.description(), "Draft memo");
    assert_eq!(updated.created_at(), created.created_at());
}

#[rstest]
fn delete_removes_only_owned_records(context: StoreContext) {
    let StoreContext { store, rt, .. } = &context;
    let owner = unique_owner();
    let created = rt
        .block_on(store.create(&owner, &candidate("Remove me", Priority::Low)))
        .expect("create");

    let missing = rt.block_on(store.delete(&owner, TaskId::new()));
    assert!(matches!(missing, Err(TaskStoreError::NotFound(_))));
    let foreign = rt.block_on(store.delete(&unique_owner(), created.id()));
    assert!(matches!(foreign, Err(TaskStoreError::NotFound(_))));

    rt.block_on(store.delete(&owner, created.id()))
        .expect("delete");

    assert!(rt.block_on(store.list_for_owner(&owner)).expect("list").is_empty());
}
