//! Action-item records for the meeting-minutes workflow.
//!
//! This module owns the task data model and its persistence boundary:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
