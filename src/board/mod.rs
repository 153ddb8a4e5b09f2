//! Task reconciliation board.
//!
//! The board holds one session's view: raw minutes, candidate tasks awaiting
//! approval, and a cached copy of the owner's persisted tasks. Every user
//! action is a pure transition on [`domain::BoardState`];
//! [`services::TaskBoard`] drives the asynchronous round-trips against the
//! record store, completion source and identity source around those
//! transitions.

pub mod domain;
pub mod services;
