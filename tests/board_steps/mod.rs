//! Step definitions for task board behaviour scenarios.

pub mod then;
