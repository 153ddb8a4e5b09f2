//! Board orchestration services.

mod board;

pub use board::{SessionView, TaskBoard};
