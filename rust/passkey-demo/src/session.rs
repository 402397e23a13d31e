//! The password side of the demo: one hard-coded account, checked after a
//! simulated round trip.
//!
//! A real application checks passwords on its server. Nothing here is
//! meant to be secure; it only gives the browser a password sign-in to
//! upgrade into a passkey.

use passkey_common::{Duration, SharedCell, TimerError, sleep};
use passkey_webauthn::Identity;
use thiserror::Error;

/// Simulated network latency of a login request.
pub const LOGIN_DELAY: Duration = Duration::from_millis(500);

/// Errors from [`SessionStore::login`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The simulated delay could not be scheduled.
    #[error(transparent)]
    Timer(#[from] TimerError),
}

struct Account {
    username: &'static str,
    password: &'static str,
    id: &'static str,
    display_name: &'static str,
}

const ACCOUNTS: &[Account] = &[Account {
    username: "demo",
    password: "password123",
    id: "1234567890",
    display_name: "Demo User",
}];

impl Account {
    fn identity(&self) -> Identity {
        Identity::new(self.id, self.username, self.display_name)
    }
}

/// Holds the signed-in [`Identity`], if any.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: SharedCell<Option<Identity>>,
}

impl SessionStore {
    /// An empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `username` / `password` after [`LOGIN_DELAY`]. On success the
    /// identity becomes current; on failure the session is left empty.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        sleep(LOGIN_DELAY).await?;

        let account = ACCOUNTS
            .iter()
            .find(|account| account.username == username && account.password == password);

        match account {
            Some(account) => {
                let identity = account.identity();
                tracing::info!(user = %identity.username, "Password sign-in succeeded");
                self.current.replace(Some(identity.clone()));
                Ok(identity)
            }
            None => {
                tracing::debug!(user = %username, "Password sign-in rejected");
                self.current.replace(None);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Make `identity` current without a password check.
    pub fn establish(&self, identity: Identity) {
        self.current.replace(Some(identity));
    }

    /// Forget the current identity. Safe to call when signed out.
    pub fn logout(&self) {
        self.current.replace(None);
    }

    /// The current identity.
    pub fn current(&self) -> Option<Identity> {
        self.current.get()
    }

    /// Whether anyone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn demo_account_signs_in_after_delay() {
        let session = SessionStore::new();
        let start = Instant::now();

        let identity = session.login("demo", "password123").await.unwrap();

        assert!(start.elapsed() >= LOGIN_DELAY);
        assert_eq!(identity, Identity::new("1234567890", "demo", "Demo User"));
        assert_eq!(session.current(), Some(identity));
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_password_and_unknown_user_are_rejected() {
        let session = SessionStore::new();

        for (username, password) in [("demo", "hunter2"), ("root", "password123"), ("", "")] {
            let start = Instant::now();
            let result = session.login(username, password).await;

            assert_eq!(result, Err(AuthError::InvalidCredentials));
            assert!(start.elapsed() >= LOGIN_DELAY);
            assert!(!session.is_authenticated());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn logout_is_idempotent() {
        let session = SessionStore::new();
        session.logout();
        assert_eq!(session.current(), None);

        session.login("demo", "password123").await.unwrap();
        session.logout();
        session.logout();
        assert_eq!(session.current(), None);
    }

    #[test]
    fn establish_sets_identity_directly() {
        let session = SessionStore::new();
        session.establish(Identity::new("cred", "passkey-user", "Passkey User"));
        assert!(session.is_authenticated());
    }
}
