//! Signed-in user identity.
//!
//! The board only needs the current user's identifier, a way to watch it
//! change, and a way to end the session. The [`ports::IdentitySource`] port
//! captures exactly that; [`adapters::StaticIdentitySource`] is the
//! in-process implementation used by the command-line surface and tests.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use domain::Identity;
