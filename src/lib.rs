//! Taskscribe: action items from meeting minutes.
//!
//! Free-text minutes are sent to a hosted completion service, which answers
//! with candidate action items. The user reviews and edits the candidates,
//! then confirms them into a record store keyed by the signed-in owner.
//!
//! # Architecture
//!
//! Taskscribe follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types, validation and state transitions
//! - **Ports**: Narrow async traits for the identity source, record store and
//!   text-completion source
//! - **Adapters**: In-memory, `PostgreSQL` and HTTP implementations of the
//!   ports
//!
//! # Modules
//!
//! - [`task`]: Candidate and persisted task model plus the record store
//! - [`extraction`]: Prompt construction, reply validation and the extractor
//! - [`identity`]: Signed-in user and sign-in state changes
//! - [`board`]: The reconciliation board driving a review session
//! - [`config`]: YAML configuration with environment overrides

pub mod board;
pub mod config;
pub mod extraction;
pub mod identity;
pub mod task;
