//! Command-line argument parsing for taskscribe.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use taskscribe::task::domain::{ParsePriorityError, Priority, TaskId, TaskPatch};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "taskscribe")]
#[command(author, version, about = "Turn meeting minutes into tracked action items", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Log filter directive, such as `debug` or `taskscribe=trace`
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract action items from minutes, review them and save them
    Extract {
        /// File holding the minutes (default: standard input, which needs --yes)
        #[arg(short, long)]
        file: Option<Utf8PathBuf>,

        /// Save without the interactive review
        #[arg(short, long, required_unless_present = "file")]
        yes: bool,

        /// Drop the extracted row at INDEX before saving (repeatable)
        #[arg(long = "drop", value_name = "INDEX")]
        drop_rows: Vec<usize>,
    },

    /// Show persisted tasks and summary counts
    List,

    /// Update fields of a persisted task
    Edit {
        /// Task identifier
        id: TaskId,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New assignee
        #[arg(long)]
        assignee: Option<String>,

        /// New deadline, kept as written
        #[arg(long)]
        deadline: Option<String>,

        /// New priority (P1, P2 or P3)
        #[arg(long)]
        priority: Option<Priority>,

        /// Mark the task completed or open
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Delete a persisted task
    Delete {
        /// Task identifier
        id: TaskId,

        /// Delete without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the configured identity
    Whoami,
}

/// One instruction typed at the candidate review prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// Save the remaining candidates.
    Save,
    /// Discard every candidate.
    Discard,
    /// Remove the candidate at the given row.
    Drop(usize),
    /// Apply `patch` to the candidate at `index`.
    Edit {
        /// Row being edited.
        index: usize,
        /// Field replacement.
        patch: TaskPatch,
    },
}

/// Error for review prompt input that cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewInputError {
    /// Nothing was typed.
    #[error("enter s to save, d N to drop, e N FIELD VALUE to edit or q to discard")]
    Empty,
    /// The command word is unknown.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// The row number is missing or not a number.
    #[error("expected a row number, got '{0}'")]
    InvalidIndex(String),
    /// The field name is not editable.
    #[error("unknown field '{0}', expected description, assignee, deadline or priority")]
    UnknownField(String),
    /// The replacement value is missing.
    #[error("missing value for {0}")]
    MissingValue(String),
    /// The priority spelling is invalid.
    #[error(transparent)]
    Priority(#[from] ParsePriorityError),
}

/// Parses one line typed at the review prompt.
///
/// # Errors
///
/// Returns [`ReviewInputError`] when the line is not a known instruction.
pub fn parse_review_action(line: &str) -> Result<ReviewAction, ReviewInputError> {
    let (command, rest) = split_word(line.trim());
    match command {
        "" => Err(ReviewInputError::Empty),
        "s" | "save" => Ok(ReviewAction::Save),
        "q" | "quit" | "discard" => Ok(ReviewAction::Discard),
        "d" | "drop" => parse_index(split_word(rest).0).map(ReviewAction::Drop),
        "e" | "edit" => {
            let (raw_index, fields) = split_word(rest);
            let index = parse_index(raw_index)?;
            let (field, value) = split_word(fields);
            if value.is_empty() && !field.is_empty() {
                return Err(ReviewInputError::MissingValue(field.to_owned()));
            }
            let patch = match field {
                "description" => TaskPatch::new().with_description(value),
                "assignee" => TaskPatch::new().with_assignee(value),
                "deadline" => TaskPatch::new().with_deadline(value),
                "priority" => TaskPatch::new().with_priority(Priority::try_from(value)?),
                other => return Err(ReviewInputError::UnknownField(other.to_owned())),
            };
            Ok(ReviewAction::Edit { index, patch })
        }
        other => Err(ReviewInputError::UnknownCommand(other.to_owned())),
    }
}

fn split_word(text: &str) -> (&str, &str) {
    text.split_once(char::is_whitespace)
        .map_or((text, ""), |(word, rest)| (word, rest.trim()))
}

fn parse_index(raw: &str) -> Result<usize, ReviewInputError> {
    raw.parse()
        .map_err(|_| ReviewInputError::InvalidIndex(raw.to_owned()))
}
