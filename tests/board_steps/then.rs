//! Then steps for task board BDD scenarios.

use super::world::BoardWorld;
use rstest_bdd_macros::then;
use taskscribe::board::services::SessionView;
use taskscribe::task::domain::{CandidateTask, Priority};

fn candidate_at(world: &BoardWorld, index: usize) -> Result<CandidateTask, eyre::Report> {
    world
        .board
        .snapshot()
        .candidates()
        .get(index)
        .cloned()
        .ok_or_else(|| eyre::eyre!("no candidate at index {index}"))
}

#[then("the candidate count is {count:usize}")]
fn candidate_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.board.snapshot().candidates().len();
    if actual != count {
        return Err(eyre::eyre!("expected {count} candidates, found {actual}"));
    }
    Ok(())
}

#[then(r#"candidate {index:usize} mentions "{text}""#)]
fn candidate_mentions(world: &BoardWorld, index: usize, text: String) -> Result<(), eyre::Report> {
    let candidate = candidate_at(world, index)?;
    if !candidate
        .description()
        .to_lowercase()
        .contains(&text.to_lowercase())
    {
        return Err(eyre::eyre!(
            "description {:?} does not mention {text:?}",
            candidate.description()
        ));
    }
    Ok(())
}

#[then(r#"candidate {index:usize} is assigned to "{assignee}" with deadline "{deadline}""#)]
fn candidate_assignment(
    world: &BoardWorld,
    index: usize,
    assignee: String,
    deadline: String,
) -> Result<(), eyre::Report> {
    let candidate = candidate_at(world, index)?;
    if candidate.assignee() != assignee || candidate.deadline() != deadline {
        return Err(eyre::eyre!(
            "expected {assignee:?} by {deadline:?}, found {:?} by {:?}",
            candidate.assignee(),
            candidate.deadline()
        ));
    }
    Ok(())
}

#[then(r#"candidate {index:usize} has priority "{priority}""#)]
fn candidate_priority(
    world: &BoardWorld,
    index: usize,
    priority: String,
) -> Result<(), eyre::Report> {
    let expected = Priority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid expected priority in scenario: {err}"))?;
    let candidate = candidate_at(world, index)?;
    if candidate.priority() != expected {
        return Err(eyre::eyre!(
            "expected priority {expected}, found {}",
            candidate.priority()
        ));
    }
    Ok(())
}

#[then("the completion service received {count:usize} requests")]
fn completion_requests(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.source.call_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} completion requests, found {actual}"));
    }
    Ok(())
}

#[then("the board is not extracting")]
fn not_extracting(world: &BoardWorld) -> Result<(), eyre::Report> {
    if world.board.snapshot().is_extracting() {
        return Err(eyre::eyre!("extraction still marked as pending"));
    }
    Ok(())
}

#[then("the last extraction ignored {count:usize} entries")]
fn ignored_entries(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no extraction was requested"))?;
    let on_board = world.board.snapshot().last_ignored();
    if report.ignored != count || on_board != count {
        return Err(eyre::eyre!(
            "expected {count} ignored entries, report says {} and board says {on_board}",
            report.ignored
        ));
    }
    Ok(())
}

#[then("the persisted list holds {count:usize} tasks")]
fn persisted_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.board.snapshot().persisted().len();
    if actual != count {
        return Err(eyre::eyre!("expected {count} persisted tasks, found {actual}"));
    }
    Ok(())
}

#[then(r#"persisted task {index:usize} is described as "{description}""#)]
fn persisted_description(
    world: &BoardWorld,
    index: usize,
    description: String,
) -> Result<(), eyre::Report> {
    let task = world.persisted_at(index)?;
    if task.description() != description {
        return Err(eyre::eyre!(
            "expected {description:?} at {index}, found {:?}",
            task.description()
        ));
    }
    Ok(())
}

#[then("the store holds {count:usize} tasks")]
fn store_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world
        .store
        .len()
        .map_err(|err| eyre::eyre!("store unreadable: {err}"))?;
    if actual != count {
        return Err(eyre::eyre!("expected {count} stored tasks, found {actual}"));
    }
    Ok(())
}

#[then("persisted task {index:usize} is completed")]
fn persisted_completed(world: &BoardWorld, index: usize) -> Result<(), eyre::Report> {
    if !world.persisted_at(index)?.is_completed() {
        return Err(eyre::eyre!("persisted task {index} is not completed"));
    }
    Ok(())
}

#[then("persisted task {index:usize} keeps its id and creation time")]
fn persisted_identity_kept(world: &BoardWorld, index: usize) -> Result<(), eyre::Report> {
    let before = world
        .task_before_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no update was made"))?;
    let after = world.persisted_at(index)?;
    if after.id() != before.id()
        || after.created_at() != before.created_at()
        || after.owner_id() != before.owner_id()
    {
        return Err(eyre::eyre!("immutable fields changed: {before:?} -> {after:?}"));
    }
    Ok(())
}

#[then("sign-in is required")]
fn sign_in_required(world: &BoardWorld) -> Result<(), eyre::Report> {
    if world.last_view != Some(SessionView::RequiresSignIn) {
        return Err(eyre::eyre!("expected sign-in prompt, got {:?}", world.last_view));
    }
    if !world.board.snapshot().requires_sign_in() {
        return Err(eyre::eyre!("board still has an owner"));
    }
    Ok(())
}
