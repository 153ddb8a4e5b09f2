//! Identity value type.

use crate::task::domain::OwnerId;
use serde::{Deserialize, Serialize};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    user_id: OwnerId,
    email: Option<String>,
}

impl Identity {
    /// Creates an identity for `user_id`.
    ///
    /// A blank email is treated as absent.
    #[must_use]
    pub fn new(user_id: OwnerId, email: Option<String>) -> Self {
        Self {
            user_id,
            email: email
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
        }
    }

    /// Returns the owner identifier used to scope persisted tasks.
    #[must_use]
    pub const fn user_id(&self) -> &OwnerId {
        &self.user_id
    }

    /// Returns the display email, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
