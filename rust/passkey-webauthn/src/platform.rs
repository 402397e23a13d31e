//! The seam between the request facade and the platform authenticator.

use crate::{CreationOptions, PlatformError, RequestOptions};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// The answer to `PublicKeyCredential.getClientCapabilities()`, reduced to
/// the capabilities this crate cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientCapabilities {
    /// `conditionalCreate`
    pub conditional_create: bool,
    /// `conditionalGet`
    pub conditional_get: bool,
}

/// What `navigator.credentials.create()` resolved with, as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCredential {
    /// `credential.id` (base64url, as reported by the platform)
    pub id: String,
    /// `credential.type`, normally `"public-key"`
    pub kind: String,
    /// `credential.rawId`
    pub raw_id: Vec<u8>,
    /// `credential.response.clientDataJSON`
    pub client_data_json: Vec<u8>,
    /// `credential.response.attestationObject`
    pub attestation_object: Vec<u8>,
    /// `credential.response.getPublicKeyAlgorithm()`, where supported
    pub algorithm: Option<i64>,
}

/// What `navigator.credentials.get()` resolved with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertedCredential {
    /// `credential.id`
    pub id: String,
    /// `credential.type`
    pub kind: String,
    /// `credential.rawId`
    pub raw_id: Vec<u8>,
}

/// A source of WebAuthn credentials.
///
/// Implementations report failures exactly as the platform names them (see
/// [`PlatformError`]); interpreting them is the facade's job. A request must
/// settle with [`PlatformErrorKind::Abort`](crate::PlatformErrorKind::Abort)
/// once `signal` is cancelled, although it may take its time doing so.
pub trait CredentialPlatform {
    /// Whether `PublicKeyCredential` and `navigator.credentials` exist.
    fn has_credential_api(&self) -> bool;

    /// Query the platform's client capabilities.
    fn client_capabilities(
        &self,
    ) -> impl Future<Output = Result<ClientCapabilities, PlatformError>>;

    /// The host name of the current page, or an empty string if there is none.
    fn host_name(&self) -> String;

    /// Issue `navigator.credentials.create()`.
    ///
    /// Resolves to `None` when the platform returned no credential.
    fn create(
        &self,
        options: &CreationOptions,
        signal: &CancellationToken,
    ) -> impl Future<Output = Result<Option<CreatedCredential>, PlatformError>>;

    /// Issue `navigator.credentials.get()`.
    fn get(
        &self,
        options: &RequestOptions,
        signal: &CancellationToken,
    ) -> impl Future<Output = Result<Option<AssertedCredential>, PlatformError>>;
}
