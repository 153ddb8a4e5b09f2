//! Action-item extraction from free-text meeting minutes.
//!
//! A fixed instruction template wraps the raw text, a hosted completion
//! service answers with a JSON array, and the reply is cleaned and validated
//! into candidate tasks. Failures never escape the service: they are logged
//! and degrade to an empty result.
//!
//! - Prompt and reply handling in [`domain`]
//! - The completion source contract in [`ports`]
//! - HTTP and scripted completion sources in [`adapters`]
//! - The [`services::TaskExtractor`] orchestration service

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
