//! The signed-in account.

use serde::{Deserialize, Serialize};

/// An authenticated account as far as this demo is concerned.
///
/// Created by a successful password check (or, unverified, by a
/// conditional passkey sign-in) and dropped on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque account identifier.
    pub id: String,
    /// The login name typed into the form.
    pub username: String,
    /// Human-readable name shown in the UI and in the passkey manager.
    pub display_name: String,
}

impl Identity {
    /// Construct an identity from its parts.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: display_name.into(),
        }
    }

    /// The WebAuthn user handle for this account: the bytes of [`Self::id`].
    #[must_use]
    pub fn user_handle(&self) -> Vec<u8> {
        self.id.as_bytes().to_vec()
    }
}
