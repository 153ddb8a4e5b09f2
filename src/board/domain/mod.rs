//! Board state and its transitions.

mod error;
mod state;

pub use error::BoardError;
pub use state::{BoardPhase, BoardState, BoardSummary, DeletionTarget, SaveBatch};
