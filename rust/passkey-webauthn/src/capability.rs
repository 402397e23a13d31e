//! Feature detection.

use crate::CredentialPlatform;
use serde::Serialize;

/// Which parts of WebAuthn the current platform offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    /// `PublicKeyCredential` exists.
    pub webauthn_supported: bool,
    /// Conditional create (passkey upgrade after password sign-in).
    pub conditional_create_supported: bool,
    /// Conditional get (passkeys offered through autofill).
    pub conditional_get_supported: bool,
}

/// Probe the platform's WebAuthn support. Never fails: a failed capability
/// query only turns the conditional flags off, while
/// [`CapabilityFlags::webauthn_supported`] reflects the presence check alone.
pub async fn probe<P: CredentialPlatform>(platform: &P) -> CapabilityFlags {
    if !platform.has_credential_api() {
        return CapabilityFlags::default();
    }

    match platform.client_capabilities().await {
        Ok(capabilities) => CapabilityFlags {
            webauthn_supported: true,
            conditional_create_supported: capabilities.conditional_create,
            conditional_get_supported: capabilities.conditional_get,
        },
        Err(error) => {
            tracing::warn!(%error, "Error checking conditional create support");
            CapabilityFlags {
                webauthn_supported: true,
                ..CapabilityFlags::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientCapabilities, PlatformError, helpers::ScriptedPlatform};

    #[tokio::test]
    async fn missing_api_turns_everything_off() {
        let platform = ScriptedPlatform::new().without_credential_api();
        assert_eq!(probe(&platform).await, CapabilityFlags::default());
    }

    #[tokio::test]
    async fn reports_queried_capabilities() {
        let platform = ScriptedPlatform::new().with_capabilities(Ok(ClientCapabilities {
            conditional_create: true,
            conditional_get: false,
        }));
        assert_eq!(
            probe(&platform).await,
            CapabilityFlags {
                webauthn_supported: true,
                conditional_create_supported: true,
                conditional_get_supported: false,
            }
        );
    }

    #[tokio::test]
    async fn failed_query_keeps_presence_flag() {
        let platform = ScriptedPlatform::new().with_capabilities(Err(PlatformError::named(
            "TypeError",
            "getClientCapabilities is not a function",
        )));
        let flags = probe(&platform).await;
        assert!(flags.webauthn_supported);
        assert!(!flags.conditional_create_supported);
        assert!(!flags.conditional_get_supported);
    }
}
