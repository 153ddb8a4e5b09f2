//! `taskscribe` command-line entry point.

mod cli;

use std::io::{self, BufRead, Read, Write};
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ReviewAction, parse_review_action};
use taskscribe::board::{
    domain::{BoardState, DeletionTarget},
    services::TaskBoard,
};
use taskscribe::config::{AppConfig, read_utf8_file};
use taskscribe::extraction::{
    adapters::openai::OpenAiCompletionSource, services::TaskExtractor,
};
use taskscribe::identity::Identity;
use taskscribe::task::{
    adapters::postgres::PostgresTaskStore,
    domain::{CandidateTask, PersistedTask, TaskPatch},
};

type Board = TaskBoard<PostgresTaskStore, OpenAiCompletionSource>;

fn setup_logging(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter {directive:?}"))?;
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let directive = cli
        .log_level
        .as_deref()
        .or(config.log_level.as_deref())
        .unwrap_or("info");
    setup_logging(directive)?;

    let identity = config
        .identity
        .require_identity()
        .context("An identity is required")?;
    if matches!(cli.command, Command::Whoami) {
        return print_identity(&identity);
    }

    let board = connect_board(&config)?;
    board
        .start_session(&identity)
        .await
        .context("Failed to load persisted tasks")?;
    run(cli.command, &board, &config).await
}

fn connect_board(config: &AppConfig) -> Result<Board> {
    let database_url = config.store.require_database_url()?;
    let store = PostgresTaskStore::connect(database_url, config.store.pool_size)
        .context("Failed to connect to the record store")?;
    let source = OpenAiCompletionSource::from_config(&config.completion)
        .context("Failed to build the completion client")?;
    let extractor =
        TaskExtractor::with_settings(Arc::new(source), config.completion.extraction_settings());
    Ok(TaskBoard::new(Arc::new(store), extractor))
}

async fn run(command: Command, board: &Board, config: &AppConfig) -> Result<()> {
    match command {
        Command::Extract {
            file,
            yes,
            drop_rows,
        } => {
            config.completion.api_key()?;
            // Stdin minutes always come with --yes; the review prompt reads stdin.
            let minutes = match file {
                Some(path) => read_utf8_file(&path)
                    .with_context(|| format!("Failed to read minutes from {path}"))?,
                None => read_stdin()?,
            };
            extract(board, &minutes, yes, drop_rows).await
        }
        Command::List => print_persisted(&board.snapshot()),
        Command::Edit {
            id,
            description,
            assignee,
            deadline,
            priority,
            completed,
        } => {
            let patch = TaskPatch {
                description,
                assignee,
                deadline,
                priority,
                completed,
            };
            let written = board.edit_persisted(id, patch).await?;
            let mut out = io::stdout().lock();
            if written {
                writeln!(out, "Updated task {id}")?;
            } else {
                writeln!(out, "Nothing to update")?;
            }
            Ok(())
        }
        Command::Delete { id, yes } => {
            board.request_deletion(DeletionTarget::Persisted(id))?;
            if yes || confirm(&format!("Delete task {id}?"))? {
                board.confirm_deletion().await?;
                writeln!(io::stdout().lock(), "Deleted task {id}")?;
            } else {
                board.cancel_deletion();
                writeln!(io::stdout().lock(), "Cancelled")?;
            }
            Ok(())
        }
        Command::Whoami => Ok(()),
    }
}

async fn extract(board: &Board, minutes: &str, yes: bool, drop_rows: Vec<usize>) -> Result<()> {
    let report = board.request_extraction(minutes).await;
    if report.candidates.is_empty() {
        writeln!(io::stdout().lock(), "No action items found.")?;
        return Ok(());
    }
    if report.ignored > 0 {
        writeln!(
            io::stdout().lock(),
            "({} reply entries ignored)",
            report.ignored
        )?;
    }
    drop_candidates(board, drop_rows)?;

    let keep = if yes {
        print_candidates(&board.snapshot())?;
        true
    } else {
        review(board)?
    };
    if !keep {
        board.clear_candidates();
        writeln!(io::stdout().lock(), "Discarded")?;
        return Ok(());
    }
    let saved = board.confirm_save().await?;
    info!(saved, "extract: tasks saved");
    writeln!(io::stdout().lock(), "Saved {saved} task(s)")?;
    Ok(())
}

fn drop_candidates(board: &Board, mut rows: Vec<usize>) -> Result<()> {
    rows.sort_unstable();
    rows.dedup();
    // Highest row first so earlier indices stay valid.
    for row in rows.into_iter().rev() {
        board
            .remove_candidate(row)
            .ok_or_else(|| eyre!("--drop {row}: no extracted row with that index"))?;
    }
    Ok(())
}

/// Runs the review prompt until the user saves or discards.
///
/// Returns `true` when the remaining candidates should be saved.
fn review(board: &Board) -> Result<bool> {
    let stdin = io::stdin();
    loop {
        let state = board.snapshot();
        if state.candidates().is_empty() {
            writeln!(io::stdout().lock(), "Nothing left to save.")?;
            return Ok(false);
        }
        print_candidates(&state)?;
        {
            let mut out = io::stdout().lock();
            write!(out, "[s]ave, [d]rop N, [e]dit N FIELD VALUE, [q]uit > ")?;
            out.flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let outcome = match parse_review_action(&line) {
            Ok(ReviewAction::Save) => return Ok(true),
            Ok(ReviewAction::Discard) => return Ok(false),
            Ok(ReviewAction::Drop(row)) => board
                .remove_candidate(row)
                .map_or_else(|| format!("No row {row}"), |_| format!("Dropped row {row}")),
            Ok(ReviewAction::Edit { index, patch }) => match board.edit_candidate(index, &patch) {
                Ok(true) => format!("Updated row {index}"),
                Ok(false) => format!("No row {index}"),
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };
        writeln!(io::stdout().lock(), "{outcome}")?;
    }
}

fn read_stdin() -> Result<String> {
    let mut minutes = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut minutes)
        .context("Failed to read minutes from standard input")?;
    Ok(minutes)
}

fn confirm(question: &str) -> Result<bool> {
    {
        let mut out = io::stdout().lock();
        write!(out, "{question} [y/N] ")?;
        out.flush()?;
    }
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn write_candidate(out: &mut impl Write, index: usize, candidate: &CandidateTask) -> Result<()> {
    writeln!(
        out,
        "{index:>3}  {:<15}  {}  [{}; due {}]",
        candidate.priority().label(),
        candidate.description(),
        candidate.assignee(),
        candidate.deadline(),
    )?;
    Ok(())
}

fn write_persisted(out: &mut impl Write, task: &PersistedTask) -> Result<()> {
    let mark = if task.is_completed() { "x" } else { " " };
    writeln!(
        out,
        "[{mark}] {}  {:<15}  {}  [{}; due {}]",
        task.id(),
        task.priority().label(),
        task.description(),
        task.assignee(),
        task.deadline(),
    )?;
    Ok(())
}

fn print_candidates(state: &BoardState) -> Result<()> {
    let mut out = io::stdout().lock();
    for (index, candidate) in state.candidates().iter().enumerate() {
        write_candidate(&mut out, index, candidate)?;
    }
    Ok(())
}

fn print_persisted(state: &BoardState) -> Result<()> {
    let mut out = io::stdout().lock();
    for task in state.persisted() {
        write_persisted(&mut out, task)?;
    }
    let summary = state.summary();
    writeln!(
        out,
        "{} task(s), {} completed, {} high priority",
        summary.total, summary.completed, summary.high_priority
    )?;
    Ok(())
}

fn print_identity(identity: &Identity) -> Result<()> {
    let mut out = io::stdout().lock();
    match identity.email() {
        Some(email) => writeln!(out, "{} <{email}>", identity.user_id())?,
        None => writeln!(out, "{}", identity.user_id())?,
    }
    Ok(())
}
