//! The credential request facade.

use crate::{
    AbortCoordinator, CapabilityFlags, CreationOptions, CredentialPlatform, CredentialResult,
    FALLBACK_RP_ID, Identity, Operation, PlatformError, PlatformErrorKind, RegisteredCredential,
    RequestOptions, RequestSettings, SignedInCredential, probe,
};

/// Issues conditional create and get requests against a platform.
///
/// Owns the [`AbortCoordinator`], so every request issued through one
/// `CredentialRequests` cancels its predecessor before it starts. Platform
/// errors never escape: each call returns a [`CredentialResult`].
#[derive(Debug)]
pub struct CredentialRequests<P> {
    platform: P,
    settings: RequestSettings,
    coordinator: AbortCoordinator,
}

impl<P> CredentialRequests<P>
where
    P: CredentialPlatform,
{
    /// Wrap `platform` with the default [`RequestSettings`].
    pub fn new(platform: P) -> Self {
        Self::with_settings(platform, RequestSettings::default())
    }

    /// Wrap `platform` with explicit settings.
    pub fn with_settings(platform: P, settings: RequestSettings) -> Self {
        Self {
            platform,
            settings,
            coordinator: AbortCoordinator::new(),
        }
    }

    /// The wrapped platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The settings every request is built from.
    pub fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    /// The coordinator guarding this facade's requests.
    pub fn coordinator(&self) -> &AbortCoordinator {
        &self.coordinator
    }

    /// Probe the platform's capabilities. See [`probe`].
    pub async fn probe(&self) -> CapabilityFlags {
        probe(&self.platform).await
    }

    /// Cancel whichever request is outstanding.
    pub fn abort(&self) {
        self.coordinator.abort();
    }

    /// The relying party id: the page's host name, or `localhost` when the
    /// page has none.
    pub fn rp_id(&self) -> String {
        let host = self.platform.host_name();
        if host.is_empty() {
            FALLBACK_RP_ID.to_string()
        } else {
            host
        }
    }

    /// Ask the platform to quietly create a passkey for `identity`.
    pub async fn create_conditionally(
        &self,
        identity: &Identity,
    ) -> CredentialResult<RegisteredCredential> {
        if !self.platform.has_credential_api() {
            return CredentialResult::unsupported();
        }

        let challenge = match self.challenge() {
            Ok(challenge) => challenge,
            Err(error) => return CredentialResult::from_platform_error(Operation::Create, error),
        };
        let options = CreationOptions::conditional(&self.settings, &self.rp_id(), identity, challenge);

        let handle = self.coordinator.begin_exclusive();
        tracing::debug!(rp_id = %options.rp.id, user = %identity.username, "Attempting conditional passkey creation");
        let outcome = self.platform.create(&options, handle.token()).await;
        self.coordinator.release(&handle);
        if handle.is_aborted() {
            tracing::debug!("Conditional creation was superseded; discarding its outcome");
            return CredentialResult::Aborted;
        }

        match outcome {
            Ok(Some(credential)) => {
                tracing::info!(id = %credential.id, "Passkey created successfully");
                CredentialResult::Success(credential.into())
            }
            Ok(None) => CredentialResult::no_credential(),
            Err(error) => {
                log_platform_error(Operation::Create, &error);
                CredentialResult::from_platform_error(Operation::Create, error)
            }
        }
    }

    /// Offer existing passkeys through autofill. Settles when the user picks
    /// one, when the platform gives up, or when a newer request aborts it.
    pub async fn get_conditionally(&self) -> CredentialResult<SignedInCredential> {
        if !self.platform.has_credential_api() {
            return CredentialResult::unsupported();
        }

        let challenge = match self.challenge() {
            Ok(challenge) => challenge,
            Err(error) => return CredentialResult::from_platform_error(Operation::Get, error),
        };
        let options = RequestOptions::conditional(&self.settings, &self.rp_id(), challenge);

        let handle = self.coordinator.begin_exclusive();
        tracing::debug!(rp_id = %options.rp_id, "Attempting conditional credential get");
        let outcome = self.platform.get(&options, handle.token()).await;
        self.coordinator.release(&handle);
        if handle.is_aborted() {
            tracing::debug!("Conditional get was superseded; discarding its outcome");
            return CredentialResult::Aborted;
        }

        match outcome {
            Ok(Some(credential)) => {
                tracing::info!(id = %credential.id, "Credential retrieved successfully");
                CredentialResult::Success(credential.into())
            }
            Ok(None) => CredentialResult::no_credential(),
            Err(error) => {
                log_platform_error(Operation::Get, &error);
                CredentialResult::from_platform_error(Operation::Get, error)
            }
        }
    }

    /// A fresh random challenge. Would come from the server in a real
    /// deployment.
    fn challenge(&self) -> Result<Vec<u8>, PlatformError> {
        let mut challenge = vec![0u8; self.settings.challenge_len];
        getrandom::getrandom(&mut challenge).map_err(|error| {
            PlatformError::new(
                PlatformErrorKind::NotSupported,
                format!("secure random source unavailable: {error}"),
            )
        })?;
        Ok(challenge)
    }
}

fn log_platform_error(operation: Operation, error: &PlatformError) {
    match error.kind {
        PlatformErrorKind::Abort => {
            tracing::debug!(?operation, "The WebAuthn call was aborted")
        }
        PlatformErrorKind::NotAllowed | PlatformErrorKind::InvalidState => {
            tracing::debug!(?operation, %error, "The platform declined the request")
        }
        _ => tracing::warn!(?operation, %error, "WebAuthn request failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ALREADY_EXISTS_MESSAGE, AssertedCredential, CREATE_NOT_ALLOWED_MESSAGE, CreatedCredential,
        Failure, FailureReason,
        helpers::{Scripted, ScriptedPlatform},
    };
    use pretty_assertions::assert_eq;

    fn demo_identity() -> Identity {
        Identity::new("1234567890", "demo", "Demo User")
    }

    fn created() -> CreatedCredential {
        CreatedCredential {
            id: "cred".into(),
            kind: "public-key".into(),
            raw_id: vec![1, 2, 3],
            client_data_json: b"{}".to_vec(),
            attestation_object: vec![0xa0],
            algorithm: Some(-7),
        }
    }

    fn asserted() -> AssertedCredential {
        AssertedCredential {
            id: "cred".into(),
            kind: "public-key".into(),
            raw_id: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn create_returns_encoded_credential_and_releases() {
        let platform = ScriptedPlatform::new().with_host("example.com");
        platform.push_create(Scripted::Resolve(Ok(Some(created()))));
        let requests = CredentialRequests::new(platform.clone());

        let result = requests.create_conditionally(&demo_identity()).await;

        assert_eq!(result, CredentialResult::Success(created().into()));
        assert!(requests.coordinator().is_idle());

        let issued = platform.create_requests();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].rp.id, "example.com");
        assert_eq!(issued[0].challenge.len(), 32);
        assert_eq!(issued[0].user.name, "demo");
    }

    #[tokio::test]
    async fn each_request_gets_a_fresh_challenge() {
        let platform = ScriptedPlatform::new();
        platform.push_create(Scripted::Resolve(Ok(Some(created()))));
        platform.push_create(Scripted::Resolve(Ok(Some(created()))));
        let requests = CredentialRequests::new(platform.clone());

        requests.create_conditionally(&demo_identity()).await;
        requests.create_conditionally(&demo_identity()).await;

        let issued = platform.create_requests();
        assert_ne!(issued[0].challenge, issued[1].challenge);
    }

    #[tokio::test]
    async fn empty_host_falls_back_to_localhost() {
        let platform = ScriptedPlatform::new().with_host("");
        platform.push_get(Scripted::Resolve(Ok(Some(asserted()))));
        let requests = CredentialRequests::new(platform.clone());

        requests.get_conditionally().await;

        assert_eq!(platform.get_requests()[0].rp_id, "localhost");
    }

    #[tokio::test]
    async fn create_maps_platform_errors() {
        let platform = ScriptedPlatform::new();
        platform.push_create(Scripted::Resolve(Err(PlatformError::named(
            "InvalidStateError",
            "excluded",
        ))));
        platform.push_create(Scripted::Resolve(Err(PlatformError::named(
            "NotAllowedError",
            "not now",
        ))));
        let requests = CredentialRequests::new(platform);

        assert_eq!(
            requests.create_conditionally(&demo_identity()).await,
            CredentialResult::Failure(Failure::new(
                FailureReason::AlreadyExists,
                ALREADY_EXISTS_MESSAGE
            ))
        );
        assert_eq!(
            requests.create_conditionally(&demo_identity()).await,
            CredentialResult::NotAllowed {
                message: CREATE_NOT_ALLOWED_MESSAGE.into()
            }
        );
        assert!(requests.coordinator().is_idle());
    }

    #[tokio::test]
    async fn missing_api_short_circuits() {
        let platform = ScriptedPlatform::new().without_credential_api();
        let requests = CredentialRequests::new(platform.clone());

        let create = requests.create_conditionally(&demo_identity()).await;
        let get = requests.get_conditionally().await;

        assert!(matches!(
            create,
            CredentialResult::Failure(Failure { reason: FailureReason::Unsupported, .. })
        ));
        assert!(matches!(
            get,
            CredentialResult::Failure(Failure { reason: FailureReason::Unsupported, .. })
        ));
        assert!(platform.create_requests().is_empty());
        assert!(platform.get_requests().is_empty());
    }

    #[tokio::test]
    async fn null_credential_is_a_failure() {
        let platform = ScriptedPlatform::new();
        platform.push_get(Scripted::Resolve(Ok(None)));
        let requests = CredentialRequests::new(platform);

        assert_eq!(
            requests.get_conditionally().await,
            CredentialResult::no_credential()
        );
    }

    #[tokio::test]
    async fn newer_request_aborts_pending_get() {
        let platform = ScriptedPlatform::new();
        platform.push_get(Scripted::UntilAborted);
        platform.push_create(Scripted::Resolve(Ok(Some(created()))));
        let requests = CredentialRequests::new(platform);
        let identity = demo_identity();

        let (get, create) = tokio::join!(
            requests.get_conditionally(),
            async {
                tokio::task::yield_now().await;
                requests.create_conditionally(&identity).await
            }
        );

        assert_eq!(get, CredentialResult::Aborted);
        assert!(create.is_success());
        assert!(requests.coordinator().is_idle());
    }

    #[tokio::test]
    async fn second_create_aborts_the_first() {
        let platform = ScriptedPlatform::new();
        platform.push_create(Scripted::UntilAborted);
        platform.push_create(Scripted::Resolve(Ok(Some(created()))));
        let requests = CredentialRequests::new(platform);
        let identity = demo_identity();

        let (first, second) = tokio::join!(
            requests.create_conditionally(&identity),
            async {
                tokio::task::yield_now().await;
                requests.create_conditionally(&identity).await
            }
        );

        assert_eq!(first, CredentialResult::Aborted);
        assert!(second.is_success());
        assert!(requests.coordinator().is_idle());
    }

    #[tokio::test]
    async fn superseded_get_is_aborted_even_if_the_platform_answers() {
        let platform = ScriptedPlatform::new();
        platform.push_get(Scripted::AfterAbort(Ok(Some(asserted()))));
        platform.push_create(Scripted::AfterAbort(Ok(Some(created()))));
        let requests = CredentialRequests::new(platform);
        let identity = demo_identity();

        let (get, ()) = tokio::join!(requests.get_conditionally(), async {
            tokio::task::yield_now().await;
            requests.coordinator().begin_exclusive();
        });
        assert_eq!(get, CredentialResult::Aborted);

        let (create, ()) = tokio::join!(requests.create_conditionally(&identity), async {
            tokio::task::yield_now().await;
            requests.abort();
        });
        assert_eq!(create, CredentialResult::Aborted);
        assert!(requests.coordinator().is_idle());
    }

    #[tokio::test]
    async fn explicit_abort_settles_pending_request() {
        let platform = ScriptedPlatform::new();
        platform.push_get(Scripted::UntilAborted);
        let requests = CredentialRequests::new(platform);

        let (get, ()) = tokio::join!(requests.get_conditionally(), async {
            tokio::task::yield_now().await;
            requests.abort();
        });

        assert_eq!(get, CredentialResult::Aborted);
        assert!(requests.coordinator().is_idle());
    }
}
