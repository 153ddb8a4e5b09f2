//! Identity source port.

use super::Identity;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Supplier of the current sign-in state.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Returns the current identity, or `None` when signed out.
    fn current(&self) -> Option<Identity>;

    /// Returns a receiver notified on every sign-in state change.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;

    /// Ends the current session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the provider rejects the request.
    async fn sign_out(&self) -> IdentityResult<()>;
}

/// Errors returned by identity sources.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The identity provider failed.
    #[error("identity provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Wraps a provider error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
