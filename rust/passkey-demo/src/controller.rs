//! The demo's state machine.
//!
//! [`DemoController`] owns the session, the credential request facade and
//! the displayed [`DemoState`]. It knows nothing about the DOM: every
//! change is published as a state snapshot to an observer, and the Leptos
//! components render whatever snapshot they were last given.
//!
//! ```text
//!             submit (valid)                 sign out
//!  LoggedOut ───────────────▸ LoggedIn ─────────────────▸ LoggedOut
//!      │                         ▲
//!      └── conditional get ──────┘  (unverified shortcut)
//! ```

use crate::session::{AuthError, SessionStore};
use passkey_common::SharedCell;
use passkey_webauthn::{
    CapabilityFlags, CredentialPlatform, CredentialRequests, CredentialResult, Failure,
    FailureReason, Identity, RegisteredCredential, SignedInCredential,
};
use thiserror::Error;

/// Login name given to an account established through conditional get.
pub const PASSKEY_USERNAME: &str = "passkey-user";

/// Display name given to an account established through conditional get.
pub const PASSKEY_DISPLAY_NAME: &str = "Passkey User";

/// Programmer errors. Everything the platform or the user can cause is
/// rendered instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemoError {
    /// A passkey was requested with nobody signed in.
    #[error("User must be authenticated to create a passkey")]
    NotAuthenticated,
}

/// Which of the two screens is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    /// The password form.
    #[default]
    LoggedOut,
    /// The welcome status and passkey panel.
    LoggedIn,
}

/// Colour of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Something worked.
    Success,
    /// Something failed.
    Error,
    /// Progress or advice.
    Info,
}

impl Tone {
    /// CSS class for this tone.
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A single line of feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// How the line is coloured.
    pub tone: Tone,
    /// The line itself.
    pub text: String,
}

impl StatusMessage {
    /// A success message.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    /// An error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
        }
    }

    /// A neutral message.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            text: text.into(),
        }
    }
}

/// Explanation appended when the platform already holds a passkey.
pub const EXCLUDE_CREDENTIALS_NOTE: &str = "In a real deployment the server would list the account's existing credentials in excludeCredentials so the platform never offers a duplicate.";

/// What the passkey panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasskeyPanel {
    /// The browser cannot do conditional create.
    Unsupported,
    /// A conditional create is in flight.
    Attempting,
    /// The platform created a passkey.
    Created {
        /// The credential as pretty-printed JSON.
        details: String,
    },
    /// The platform declined or failed.
    Failed {
        /// Why the platform did not create a passkey.
        message: String,
        /// Extra explanation for specific failures.
        note: Option<String>,
    },
}

impl PasskeyPanel {
    /// The panel's main line.
    pub fn headline(&self) -> String {
        match self {
            Self::Unsupported => {
                "Your browser does not support conditional passkey creation.".to_string()
            }
            Self::Attempting => "Attempting to create a passkey conditionally...".to_string(),
            Self::Created { .. } => "Passkey created successfully!".to_string(),
            Self::Failed { message, .. } => format!("Failed to create passkey: {message}"),
        }
    }

    /// Tone of the main line.
    pub fn tone(&self) -> Tone {
        match self {
            Self::Attempting => Tone::Info,
            Self::Created { .. } => Tone::Success,
            Self::Unsupported | Self::Failed { .. } => Tone::Error,
        }
    }

    fn from_result(result: CredentialResult<RegisteredCredential>) -> Option<Self> {
        match result {
            CredentialResult::Success(credential) => {
                let details = serde_json::to_string_pretty(&credential)
                    .unwrap_or_else(|error| format!("unable to display credential: {error}"));
                Some(Self::Created { details })
            }
            CredentialResult::Failure(Failure { reason, message }) => Some(Self::Failed {
                message,
                note: (reason == FailureReason::AlreadyExists)
                    .then(|| EXCLUDE_CREDENTIALS_NOTE.to_string()),
            }),
            CredentialResult::NotAllowed { message } => Some(Self::Failed {
                message,
                note: None,
            }),
            CredentialResult::Aborted => None,
        }
    }
}

/// Everything the UI displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoState {
    /// The visible screen.
    pub screen: Screen,
    /// Result of the last capability probe; `None` until the first one.
    pub capabilities: Option<CapabilityFlags>,
    /// Line under the heading of the current screen.
    pub status: Option<StatusMessage>,
    /// Feedback about conditional sign-in, shown under the password form.
    pub sign_in_hint: Option<StatusMessage>,
    /// The passkey panel on the signed-in screen.
    pub passkey: Option<PasskeyPanel>,
    /// A password login is pending; the submit button is disabled.
    pub signing_in: bool,
    /// Who is signed in.
    pub identity: Option<Identity>,
    /// The identity came from conditional get and was never verified.
    pub unverified: bool,
}

type Observer = Box<dyn Fn(&DemoState)>;

/// Drives the demo. See the module docs.
pub struct DemoController<P> {
    session: SessionStore,
    requests: CredentialRequests<P>,
    state: SharedCell<DemoState>,
    observer: Option<Observer>,
}

impl<P> std::fmt::Debug for DemoController<P>
where
    P: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoController")
            .field("session", &self.session)
            .field("requests", &self.requests)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<P> DemoController<P>
where
    P: CredentialPlatform,
{
    /// A signed-out controller over `platform`.
    pub fn new(platform: P) -> Self {
        Self {
            session: SessionStore::new(),
            requests: CredentialRequests::new(platform),
            state: SharedCell::new(DemoState::default()),
            observer: None,
        }
    }

    /// Call `observer` with a snapshot after every state change.
    pub fn with_observer(mut self, observer: impl Fn(&DemoState) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The current state.
    pub fn state(&self) -> DemoState {
        self.state.get()
    }

    /// The session store.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The credential request facade.
    pub fn requests(&self) -> &CredentialRequests<P> {
        &self.requests
    }

    fn update(&self, change: impl FnOnce(&mut DemoState)) {
        let snapshot = {
            let mut state = self.state.write();
            change(&mut state);
            state.clone()
        };
        if let Some(observer) = &self.observer {
            observer(&snapshot);
        }
    }

    /// Page load: probe capabilities, then offer passkeys through autofill.
    pub async fn start(&self) {
        let capabilities = self.requests.probe().await;
        self.update(|state| state.capabilities = Some(capabilities));
        self.offer_passkey_sign_in().await;
    }

    /// Run a conditional get while the password form is shown. If the user
    /// picks a passkey, sign in with a synthesized identity.
    ///
    /// The credential is not verified. A real system must check an
    /// assertion against a stored public key before trusting it.
    pub async fn offer_passkey_sign_in(&self) {
        let capabilities = self.state.read().capabilities;
        let Some(capabilities) = capabilities else {
            return;
        };
        if !capabilities.webauthn_supported {
            return;
        }
        if !capabilities.conditional_get_supported {
            self.update(|state| {
                state.sign_in_hint = Some(StatusMessage::info(
                    "Passkey autofill is not available in this browser; sign in with your password.",
                ))
            });
            return;
        }

        match self.requests.get_conditionally().await {
            CredentialResult::Success(credential) => self.sign_in_with_passkey(credential),
            CredentialResult::Aborted | CredentialResult::NotAllowed { .. } => {
                tracing::debug!("Conditional sign-in ended without a credential");
            }
            CredentialResult::Failure(failure) => {
                tracing::warn!(message = %failure.message, "Conditional sign-in failed");
                self.update(|state| {
                    state.sign_in_hint = Some(StatusMessage::error(format!(
                        "Passkey sign-in is unavailable: {}",
                        failure.message
                    )))
                });
            }
        }
    }

    fn sign_in_with_passkey(&self, credential: SignedInCredential) {
        // A password login may have won the race while the get was settling.
        if self.session.is_authenticated() {
            return;
        }

        let identity = Identity::new(credential.id, PASSKEY_USERNAME, PASSKEY_DISPLAY_NAME);
        tracing::info!(id = %identity.id, "Signed in through conditional get (unverified)");
        self.session.establish(identity.clone());
        self.update(|state| {
            state.screen = Screen::LoggedIn;
            state.status = Some(StatusMessage::success(format!(
                "Welcome, {}! You signed in with a passkey.",
                identity.display_name
            )));
            state.sign_in_hint = None;
            state.passkey = None;
            state.identity = Some(identity);
            state.unverified = true;
        });
    }

    /// Password form submission: check the credentials, then try to upgrade
    /// the account to a passkey.
    pub async fn submit_login(&self, username: &str, password: &str) -> Result<(), DemoError> {
        self.update(|state| {
            state.signing_in = true;
            state.status = None;
        });

        match self.session.login(username.trim(), password).await {
            Ok(identity) => {
                self.update(|state| {
                    state.signing_in = false;
                    state.screen = Screen::LoggedIn;
                    state.status = Some(StatusMessage::success(format!(
                        "Welcome, {}! You've successfully signed in.",
                        identity.display_name
                    )));
                    state.sign_in_hint = None;
                    state.identity = Some(identity);
                    state.unverified = false;
                });
                self.create_passkey().await
            }
            Err(error) => {
                if let AuthError::Timer(_) = &error {
                    tracing::warn!(%error, "Login could not complete");
                }
                self.update(|state| {
                    state.signing_in = false;
                    state.screen = Screen::LoggedOut;
                    state.status = Some(StatusMessage::error(error.to_string()));
                    state.passkey = None;
                });
                Ok(())
            }
        }
    }

    /// Ask the platform to create a passkey for the signed-in account.
    pub async fn create_passkey(&self) -> Result<(), DemoError> {
        let identity = self.session.current().ok_or(DemoError::NotAuthenticated)?;

        let capabilities = self.requests.probe().await;
        self.update(|state| state.capabilities = Some(capabilities));
        if !capabilities.conditional_create_supported {
            self.update(|state| state.passkey = Some(PasskeyPanel::Unsupported));
            return Ok(());
        }

        self.update(|state| state.passkey = Some(PasskeyPanel::Attempting));
        let result = self.requests.create_conditionally(&identity).await;

        // Signed out (or switched accounts) while the platform was busy.
        if self.session.current().as_ref() != Some(&identity) {
            return Ok(());
        }

        let panel = PasskeyPanel::from_result(result);
        self.update(|state| state.passkey = panel);
        Ok(())
    }

    /// Sign out: cancel any pending request, clear the session and
    /// everything displayed except the capability panel.
    pub fn sign_out(&self) {
        self.requests.abort();
        self.session.logout();
        self.update(|state| {
            *state = DemoState {
                capabilities: state.capabilities,
                ..DemoState::default()
            }
        });
    }
}
