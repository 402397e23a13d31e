//! Typed outcomes of a credential request.

use crate::{AssertedCredential, CreatedCredential, PlatformError, PlatformErrorKind};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;

/// Message for a create that found an existing passkey.
pub const ALREADY_EXISTS_MESSAGE: &str = "A passkey already exists for this account";

/// Message for a conditional create the platform declined.
pub const CREATE_NOT_ALLOWED_MESSAGE: &str = "Conditions not met for automatic passkey creation";

/// Message for a conditional get the platform declined.
pub const GET_NOT_ALLOWED_MESSAGE: &str = "No passkey was selected for conditional sign-in";

/// Message when the credential API is missing altogether.
pub const UNSUPPORTED_MESSAGE: &str = "This browser does not support WebAuthn";

/// Message when the platform resolved without a credential.
pub const NO_CREDENTIAL_MESSAGE: &str = "No credential returned";

/// Which ceremony a result belongs to. The same platform error reads
/// differently depending on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `navigator.credentials.create()`
    Create,
    /// `navigator.credentials.get()`
    Get,
}

impl Operation {
    fn not_allowed_message(self) -> &'static str {
        match self {
            Self::Create => CREATE_NOT_ALLOWED_MESSAGE,
            Self::Get => GET_NOT_ALLOWED_MESSAGE,
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to create passkey",
            Self::Get => "Failed to get credential",
        }
    }
}

/// Why a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// The platform lacks the API or the requested feature.
    Unsupported,
    /// A credential already exists for this relying party and user. A real
    /// deployment avoids this with `excludeCredentials` from the server.
    AlreadyExists,
    /// The relying party id is not valid for the current origin.
    InvalidDomain,
    /// The platform resolved successfully but without a credential.
    NoCredential,
    /// Anything else; the message is the platform's own.
    Platform,
}

/// A failed request with a message fit for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Why the request failed.
    pub reason: FailureReason,
    /// What to show the user.
    pub message: String,
}

impl Failure {
    /// Construct a failure.
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

/// The outcome of one conditional request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialResult<C> {
    /// The platform produced a credential.
    Success(C),
    /// The request failed for a reason worth showing.
    Failure(Failure),
    /// A newer request cancelled this one. Expected; show nothing.
    Aborted,
    /// The platform declined because the conditions for a conditional
    /// request were not met.
    NotAllowed {
        /// Explanation for the user.
        message: String,
    },
}

impl<C> CredentialResult<C> {
    /// Map a platform error onto a result.
    ///
    /// Every [`PlatformErrorKind`] lands on exactly one variant; unknown
    /// kinds become [`FailureReason::Platform`] with the platform's message.
    pub fn from_platform_error(operation: Operation, error: PlatformError) -> Self {
        let PlatformError { kind, message } = error;
        match kind {
            PlatformErrorKind::Abort => Self::Aborted,
            PlatformErrorKind::NotAllowed => Self::NotAllowed {
                message: operation.not_allowed_message().to_string(),
            },
            PlatformErrorKind::InvalidState => match operation {
                Operation::Create => {
                    Self::Failure(Failure::new(FailureReason::AlreadyExists, ALREADY_EXISTS_MESSAGE))
                }
                Operation::Get => Self::platform_failure(operation, message),
            },
            PlatformErrorKind::NotSupported => {
                Self::Failure(Failure::new(FailureReason::Unsupported, message))
            }
            PlatformErrorKind::Security => {
                Self::Failure(Failure::new(FailureReason::InvalidDomain, message))
            }
            PlatformErrorKind::Other(_) => Self::platform_failure(operation, message),
        }
    }

    fn platform_failure(operation: Operation, message: String) -> Self {
        let message = if message.is_empty() {
            operation.fallback_message().to_string()
        } else {
            message
        };
        Self::Failure(Failure::new(FailureReason::Platform, message))
    }

    /// The result for a platform without the credential API.
    pub fn unsupported() -> Self {
        Self::Failure(Failure::new(FailureReason::Unsupported, UNSUPPORTED_MESSAGE))
    }

    /// The result for a platform that resolved with `null`.
    pub fn no_credential() -> Self {
        Self::Failure(Failure::new(FailureReason::NoCredential, NO_CREDENTIAL_MESSAGE))
    }

    /// Whether this is [`CredentialResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The user-facing message for unsuccessful, non-silent outcomes.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failure(failure) => Some(&failure.message),
            Self::NotAllowed { message } => Some(message),
            Self::Success(_) | Self::Aborted => None,
        }
    }
}

/// A newly created passkey, encoded for display or for sending to a server.
///
/// Serializes to the same JSON shape as a `PublicKeyCredential` passed
/// through base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredCredential {
    /// `credential.id`
    pub id: String,
    /// `credential.type`
    #[serde(rename = "type")]
    pub kind: String,
    /// Standard base64 of `rawId`.
    pub raw_id: String,
    /// COSE algorithm of the new public key, when the browser reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<i64>,
    /// The attestation payload.
    pub response: AttestationResponse,
}

/// The base64-encoded `AuthenticatorAttestationResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponse {
    /// Standard base64 of `clientDataJSON`.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    /// Standard base64 of `attestationObject`.
    pub attestation_object: String,
}

impl From<CreatedCredential> for RegisteredCredential {
    fn from(credential: CreatedCredential) -> Self {
        Self {
            id: credential.id,
            kind: credential.kind,
            raw_id: STANDARD.encode(&credential.raw_id),
            algorithm: credential.algorithm,
            response: AttestationResponse {
                client_data_json: STANDARD.encode(&credential.client_data_json),
                attestation_object: STANDARD.encode(&credential.attestation_object),
            },
        }
    }
}

/// A credential picked through conditional get. Carries no assertion data
/// and proves nothing until a server verifies an assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInCredential {
    /// `credential.id`
    pub id: String,
    /// `credential.type`
    #[serde(rename = "type")]
    pub kind: String,
    /// Standard base64 of `rawId`.
    pub raw_id: String,
}

impl From<AssertedCredential> for SignedInCredential {
    fn from(credential: AssertedCredential) -> Self {
        Self {
            id: credential.id,
            kind: credential.kind,
            raw_id: STANDARD.encode(&credential.raw_id),
        }
    }
}
