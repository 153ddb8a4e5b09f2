//! Session state of the reconciliation board.

use std::fmt;

use crate::task::domain::{CandidateTask, OwnerId, PersistedTask, Priority, TaskId, TaskPatch};

/// Coarse workflow phase derived from the board flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Nothing pending and no candidates.
    Idle,
    /// An extraction request is in flight.
    Extracting,
    /// Candidates await review.
    Reviewing,
    /// A save batch is in flight.
    Saving,
}

/// Item awaiting deletion confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionTarget {
    /// A persisted task.
    Persisted(TaskId),
    /// The candidate at a position of the pending list.
    Candidate(usize),
}

impl fmt::Display for DeletionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(f, "task {id}"),
            Self::Candidate(index) => write!(f, "candidate #{index}"),
        }
    }
}

/// Counts over the persisted cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardSummary {
    /// Number of persisted tasks.
    pub total: usize,
    /// Number of completed persisted tasks.
    pub completed: usize,
    /// Number of urgent persisted tasks.
    pub high_priority: usize,
}

/// Candidates captured for a save round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBatch {
    /// Owner the records are written for.
    pub owner: OwnerId,
    /// Candidates to write, in list order.
    pub candidates: Vec<CandidateTask>,
    /// Session the batch belongs to.
    pub epoch: u64,
}

/// State of one board session.
///
/// Every method is a synchronous transition; none of them perform I/O.
/// Completion methods take the session epoch captured when the round-trip
/// began and ignore results that arrive after the owner changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    owner: Option<OwnerId>,
    epoch: u64,
    raw_text: String,
    candidates: Vec<CandidateTask>,
    persisted: Vec<PersistedTask>,
    extracting: bool,
    saving: bool,
    loading: bool,
    pending_deletion: Option<DeletionTarget>,
    last_ignored: usize,
}

impl BoardState {
    /// Creates a signed-out, empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the signed-in owner.
    #[must_use]
    pub const fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    /// Returns `true` when no owner is known.
    #[must_use]
    pub const fn requires_sign_in(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns the current session epoch.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the raw minutes text.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Returns the candidates awaiting approval.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateTask] {
        &self.candidates
    }

    /// Returns the cached persisted tasks, newest first.
    #[must_use]
    pub fn persisted(&self) -> &[PersistedTask] {
        &self.persisted
    }

    /// Returns the cached persisted task `id`.
    #[must_use]
    pub fn persisted_task(&self, id: TaskId) -> Option<&PersistedTask> {
        self.persisted.iter().find(|task| task.id() == id)
    }

    /// Returns the item awaiting deletion confirmation.
    #[must_use]
    pub const fn pending_deletion(&self) -> Option<DeletionTarget> {
        self.pending_deletion
    }

    /// Returns the number of reply entries dropped by the last extraction.
    #[must_use]
    pub const fn last_ignored(&self) -> usize {
        self.last_ignored
    }

    /// Returns `true` while an extraction is in flight.
    #[must_use]
    pub const fn is_extracting(&self) -> bool {
        self.extracting
    }

    /// Returns `true` while a save batch is in flight.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// Returns `true` while the persisted list is loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the workflow phase.
    #[must_use]
    pub fn phase(&self) -> BoardPhase {
        if self.saving {
            BoardPhase::Saving
        } else if self.extracting {
            BoardPhase::Extracting
        } else if self.candidates.is_empty() {
            BoardPhase::Idle
        } else {
            BoardPhase::Reviewing
        }
    }

    /// Returns counts over the persisted cache.
    #[must_use]
    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            total: self.persisted.len(),
            completed: self.persisted.iter().filter(|t| t.is_completed()).count(),
            high_priority: self
                .persisted
                .iter()
                .filter(|t| t.priority() == Priority::Urgent)
                .count(),
        }
    }

    /// Whether the extraction control is enabled.
    #[must_use]
    pub fn can_extract(&self) -> bool {
        !self.extracting && !self.raw_text.trim().is_empty()
    }

    /// Whether the save control is enabled.
    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.saving && !self.candidates.is_empty()
    }

    /// Whether the refresh control is enabled.
    #[must_use]
    pub const fn can_refresh(&self) -> bool {
        !self.loading && self.owner.is_some()
    }

    /// Switches the session owner.
    ///
    /// Any change, including sign-out, starts a new session: caches,
    /// candidates, raw text and pending flags are dropped. Returns `false`
    /// when the owner is unchanged.
    pub fn set_owner(&mut self, owner: Option<OwnerId>) -> bool {
        if self.owner == owner {
            return false;
        }
        *self = Self {
            owner,
            epoch: self.epoch.wrapping_add(1),
            ..Self::default()
        };
        true
    }

    /// Replaces the raw minutes text.
    pub fn set_raw_text(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
    }

    /// Marks an extraction of `raw_text` as in flight and returns the epoch.
    pub fn begin_extraction(&mut self, raw_text: impl Into<String>) -> u64 {
        self.raw_text = raw_text.into();
        self.extracting = true;
        self.epoch
    }

    /// Replaces the candidate list with an extraction result.
    ///
    /// An empty result, including one caused by a failure, empties the list.
    /// Returns `false` when the result belongs to an earlier session.
    pub fn finish_extraction(
        &mut self,
        epoch: u64,
        candidates: Vec<CandidateTask>,
        ignored: usize,
    ) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.extracting = false;
        self.candidates = candidates;
        self.last_ignored = ignored;
        if matches!(self.pending_deletion, Some(DeletionTarget::Candidate(_))) {
            self.pending_deletion = None;
        }
        true
    }

    /// Replaces the candidate at `index`.
    ///
    /// Returns `false`, leaving the list untouched, when `index` is out of
    /// range.
    pub fn replace_candidate(&mut self, index: usize, candidate: CandidateTask) -> bool {
        match self.candidates.get_mut(index) {
            Some(slot) => {
                *slot = candidate;
                true
            }
            None => false,
        }
    }

    /// Applies `patch` to the candidate at `index`.
    ///
    /// Returns `Ok(false)` when `index` is out of range.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::domain::TaskDomainError`] when the patch would
    /// blank a required field; the candidate is left unchanged.
    pub fn edit_candidate(
        &mut self,
        index: usize,
        patch: &TaskPatch,
    ) -> Result<bool, crate::task::domain::TaskDomainError> {
        let Some(current) = self.candidates.get(index) else {
            return Ok(false);
        };
        let updated = current.patched(patch)?;
        Ok(self.replace_candidate(index, updated))
    }

    /// Removes the candidate at `index`, preserving the order of the rest.
    pub fn remove_candidate(&mut self, index: usize) -> Option<CandidateTask> {
        if index >= self.candidates.len() {
            return None;
        }
        let removed = self.candidates.remove(index);
        if let Some(DeletionTarget::Candidate(pending)) = self.pending_deletion {
            self.pending_deletion = match pending.cmp(&index) {
                std::cmp::Ordering::Less => Some(DeletionTarget::Candidate(pending)),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => {
                    Some(DeletionTarget::Candidate(pending.saturating_sub(1)))
                }
            };
        }
        Some(removed)
    }

    /// Discards every candidate.
    pub fn clear_candidates(&mut self) {
        self.candidates.clear();
        if matches!(self.pending_deletion, Some(DeletionTarget::Candidate(_))) {
            self.pending_deletion = None;
        }
    }

    /// Captures the candidates for a save round-trip.
    ///
    /// Returns `None`, changing nothing, when no owner is known or there are
    /// no candidates.
    pub fn begin_save(&mut self) -> Option<SaveBatch> {
        let owner = self.owner.clone()?;
        if self.candidates.is_empty() {
            return None;
        }
        self.saving = true;
        Some(SaveBatch {
            owner,
            candidates: self.candidates.clone(),
            epoch: self.epoch,
        })
    }

    /// Promotes written records into the persisted cache.
    ///
    /// `saved` holds the records created for the leading candidates of the
    /// batch, in batch order; they are prepended in that order and the same
    /// number of candidates is removed from the front of the list. When the
    /// whole batch was written the candidate list and raw text are cleared.
    /// Returns `false` when the batch belongs to an earlier session.
    pub fn finish_save(&mut self, epoch: u64, saved: Vec<PersistedTask>, complete: bool) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.saving = false;
        if complete {
            self.candidates.clear();
            self.raw_text.clear();
        } else {
            let written = saved.len().min(self.candidates.len());
            self.candidates = self.candidates.split_off(written);
        }
        if !saved.is_empty()
            && matches!(self.pending_deletion, Some(DeletionTarget::Candidate(_)))
        {
            self.pending_deletion = None;
        }
        let mut persisted = saved;
        persisted.append(&mut self.persisted);
        self.persisted = persisted;
        true
    }

    /// Marks a persisted-list refresh as in flight.
    ///
    /// Returns the owner and epoch, or `None` when no owner is known.
    pub fn begin_load(&mut self) -> Option<(OwnerId, u64)> {
        let owner = self.owner.clone()?;
        self.loading = true;
        Some((owner, self.epoch))
    }

    /// Ends a refresh, replacing the cache when `tasks` is present.
    ///
    /// A failed refresh passes `None` and keeps the previous cache. Returns
    /// `false` when the refresh belongs to an earlier session.
    pub fn finish_load(&mut self, epoch: u64, tasks: Option<Vec<PersistedTask>>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.loading = false;
        if let Some(loaded) = tasks {
            self.persisted = loaded;
            let stale = matches!(
                self.pending_deletion,
                Some(DeletionTarget::Persisted(id)) if self.persisted_task(id).is_none()
            );
            if stale {
                self.pending_deletion = None;
            }
        }
        true
    }

    /// Merges `patch` into the cached task `id`.
    ///
    /// Returns `false` when the task is not cached.
    pub fn merge_persisted(&mut self, id: TaskId, patch: &TaskPatch) -> bool {
        match self.persisted.iter_mut().find(|task| task.id() == id) {
            Some(task) => {
                task.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Removes the cached task `id`.
    pub fn drop_persisted(&mut self, id: TaskId) -> Option<PersistedTask> {
        let position = self.persisted.iter().position(|task| task.id() == id)?;
        if self.pending_deletion == Some(DeletionTarget::Persisted(id)) {
            self.pending_deletion = None;
        }
        Some(self.persisted.remove(position))
    }

    /// Asks for confirmation before deleting `target`.
    ///
    /// Returns `false`, changing nothing, when the target does not exist.
    pub fn request_deletion(&mut self, target: DeletionTarget) -> bool {
        let exists = match target {
            DeletionTarget::Persisted(id) => self.persisted_task(id).is_some(),
            DeletionTarget::Candidate(index) => index < self.candidates.len(),
        };
        if exists {
            self.pending_deletion = Some(target);
        }
        exists
    }

    /// Withdraws the pending deletion request.
    pub const fn cancel_deletion(&mut self) -> Option<DeletionTarget> {
        self.pending_deletion.take()
    }

    /// Takes the pending deletion for execution.
    pub const fn take_deletion(&mut self) -> Option<DeletionTarget> {
        self.pending_deletion.take()
    }
}
