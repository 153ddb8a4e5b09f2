//! In-process identity source.

use super::{
    Identity,
    ports::{IdentityResult, IdentitySource},
};
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

/// Identity source holding the sign-in state in a watch channel.
#[derive(Debug, Clone)]
pub struct StaticIdentitySource {
    state: watch::Sender<Option<Identity>>,
}

impl StaticIdentitySource {
    /// Creates a source that starts signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self::with_state(Some(identity))
    }

    /// Creates a source that starts signed out.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::with_state(None)
    }

    fn with_state(initial: Option<Identity>) -> Self {
        let (state, _receiver) = watch::channel(initial);
        Self { state }
    }

    /// Signs in as `identity`, notifying subscribers.
    pub fn sign_in(&self, identity: Identity) {
        info!(user_id = %identity.user_id(), "sign_in: identity changed");
        self.state.send_replace(Some(identity));
    }
}

#[async_trait]
impl IdentitySource for StaticIdentitySource {
    fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        info!("sign_out: session ended");
        self.state.send_replace(None);
        Ok(())
    }
}
