//! Adapter implementations of the completion source port.

pub mod memory;
pub mod openai;
