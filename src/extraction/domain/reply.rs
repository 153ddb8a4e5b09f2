//! Cleanup and validation of completion replies.

use super::ReplyError;
use crate::task::domain::{CandidateTask, Priority, TaskDomainError};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::debug;

/// Opening (optionally tagged `json`) and closing code-fence markers.
const FENCE_PATTERN: &str = r"(?i)```(?:json)?[ \t]*\r?\n?|\r?\n?```";

/// Entries surviving validation plus the number of entries dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    /// Valid candidates, in reply order.
    pub candidates: Vec<CandidateTask>,
    /// Number of reply entries discarded by validation.
    pub ignored: usize,
}

/// Why a single reply entry was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedEntry {
    /// The entry is not a JSON object.
    NotAnObject,
    /// A required text field is absent, not a string, or blank.
    MissingField(&'static str),
    /// The priority is absent or not one of `P1`, `P2`, `P3`.
    InvalidPriority(Option<String>),
}

fn fence_pattern() -> Result<&'static Regex, ReplyError> {
    static FENCE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    FENCE
        .get_or_init(|| Regex::new(FENCE_PATTERN))
        .as_ref()
        .map_err(|err| ReplyError::Pattern(err.to_string()))
}

/// Removes code-fence markup and surrounding whitespace from a reply.
///
/// # Errors
///
/// Returns [`ReplyError::Pattern`] if the fence pattern cannot be compiled.
pub fn strip_code_fences(reply: &str) -> Result<String, ReplyError> {
    let pattern = fence_pattern()?;
    Ok(pattern.replace_all(reply, "").trim().to_owned())
}

/// Parses a completion reply into validated candidates.
///
/// Individual entries that fail validation are dropped and counted; only a
/// reply that is empty, not JSON, or not an array is an error.
///
/// # Errors
///
/// Returns [`ReplyError`] when the reply as a whole is unusable.
pub fn parse_reply(reply: &str) -> Result<ParsedReply, ReplyError> {
    let cleaned = strip_code_fences(reply)?;
    if cleaned.is_empty() {
        return Err(ReplyError::Empty);
    }

    let value: Value =
        serde_json::from_str(&cleaned).map_err(|err| ReplyError::Malformed(err.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(ReplyError::NotAnArray);
    };

    let mut parsed = ParsedReply::default();
    for (index, entry) in entries.iter().enumerate() {
        match candidate_from_entry(entry) {
            Ok(candidate) => parsed.candidates.push(candidate),
            Err(reason) => {
                debug!(index, ?reason, "parse_reply: entry discarded");
                parsed.ignored += 1;
            }
        }
    }
    Ok(parsed)
}

fn candidate_from_entry(entry: &Value) -> Result<CandidateTask, RejectedEntry> {
    let fields = entry.as_object().ok_or(RejectedEntry::NotAnObject)?;
    let description = required_text(fields, "description")?;
    let assignee = required_text(fields, "assignee")?;
    let deadline = required_text(fields, "deadline")?;

    let raw_priority = fields.get("priority").and_then(Value::as_str);
    let priority = raw_priority
        .and_then(|raw| Priority::try_from(raw).ok())
        .ok_or_else(|| RejectedEntry::InvalidPriority(raw_priority.map(str::to_owned)))?;

    CandidateTask::new(description, assignee, deadline, priority).map_err(|err| {
        RejectedEntry::MissingField(match err {
            TaskDomainError::EmptyAssignee => "assignee",
            TaskDomainError::EmptyDeadline => "deadline",
            _ => "description",
        })
    })
}

fn required_text<'a>(
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, RejectedEntry> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .ok_or(RejectedEntry::MissingField(name))
}
