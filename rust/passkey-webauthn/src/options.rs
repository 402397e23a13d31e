//! Option payloads for conditional create and get.
//!
//! These mirror `PublicKeyCredentialCreationOptions` and
//! `PublicKeyCredentialRequestOptions` closely enough that the browser
//! binding can copy them field by field into JS objects.

use crate::Identity;
use std::time::Duration;

/// COSE algorithm identifier for ECDSA with SHA-256 on P-256.
pub const ES256: i64 = -7;

/// COSE algorithm identifier for RSASSA-PKCS1-v1_5 with SHA-256.
pub const RS256: i64 = -257;

/// Relying party name used when none is configured.
pub const DEFAULT_RP_NAME: &str = "WebAuthn Conditional Create Demo";

/// Relying party id used when the page has no host name (e.g. `file://`).
pub const FALLBACK_RP_ID: &str = "localhost";

/// Tunables shared by every request the facade issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSettings {
    /// Relying party display name.
    pub rp_name: String,
    /// Timeout handed to the platform. No other timeout is enforced.
    pub timeout: Duration,
    /// Number of random bytes in each challenge.
    pub challenge_len: usize,
    /// Accepted public key algorithms, in order of preference.
    pub algorithms: Vec<i64>,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            rp_name: DEFAULT_RP_NAME.to_string(),
            timeout: Duration::from_secs(60),
            challenge_len: 32,
            algorithms: vec![ES256, RS256],
        }
    }
}

/// `mediation` for every request: offer the credential without a modal
/// prompt.
pub const MEDIATION: &str = "conditional";

/// `authenticatorSelection.residentKey` for conditional create. Only
/// discoverable credentials can be offered through autofill.
pub const RESIDENT_KEY: &str = "required";

/// `userVerification` for create and get.
pub const USER_VERIFICATION: &str = "preferred";

/// `attestation` for conditional create.
pub const ATTESTATION: &str = "none";

/// `PublicKeyCredentialRpEntity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelyingParty {
    /// Relying party id (a registrable domain suffix of the origin).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// `PublicKeyCredentialUserEntity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntity {
    /// The user handle.
    pub id: Vec<u8>,
    /// Account name.
    pub name: String,
    /// Display name.
    pub display_name: String,
}

/// Options for `navigator.credentials.create({ publicKey, mediation })`.
///
/// `mediation`, `residentKey`, `userVerification` and `attestation` are
/// fixed; see [`MEDIATION`], [`RESIDENT_KEY`], [`USER_VERIFICATION`] and
/// [`ATTESTATION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationOptions {
    /// Random bytes the authenticator signs over.
    pub challenge: Vec<u8>,
    /// The relying party the credential is scoped to.
    pub rp: RelyingParty,
    /// The account the credential is created for.
    pub user: UserEntity,
    /// `pubKeyCredParams` algorithms, in order of preference.
    pub algorithms: Vec<i64>,
    /// Timeout handed to the platform.
    pub timeout: Duration,
}

impl CreationOptions {
    /// The fixed payload for a conditional create on behalf of `identity`.
    ///
    /// User presence and user verification are reported as false by the
    /// authenticator for conditional creation, whatever is asked for here.
    pub fn conditional(
        settings: &RequestSettings,
        rp_id: &str,
        identity: &Identity,
        challenge: Vec<u8>,
    ) -> Self {
        Self {
            challenge,
            rp: RelyingParty {
                id: rp_id.to_string(),
                name: settings.rp_name.clone(),
            },
            user: UserEntity {
                id: identity.user_handle(),
                name: identity.username.clone(),
                display_name: identity.display_name.clone(),
            },
            algorithms: settings.algorithms.clone(),
            timeout: settings.timeout,
        }
    }
}

/// Options for `navigator.credentials.get({ publicKey, mediation })`.
///
/// No `allowCredentials` list is sent, so any discoverable credential for
/// the relying party may be offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Random bytes the authenticator signs over.
    pub challenge: Vec<u8>,
    /// The relying party id.
    pub rp_id: String,
    /// Timeout handed to the platform.
    pub timeout: Duration,
}

impl RequestOptions {
    /// The fixed payload for a conditional get.
    pub fn conditional(settings: &RequestSettings, rp_id: &str, challenge: Vec<u8>) -> Self {
        Self {
            challenge,
            rp_id: rp_id.to_string(),
            timeout: settings.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn conditional_create_uses_fixed_payload() {
        let identity = Identity::new("1234567890", "demo", "Demo User");
        let options =
            CreationOptions::conditional(&RequestSettings::default(), "example.com", &identity, vec![7; 32]);

        assert_eq!(
            options,
            CreationOptions {
                challenge: vec![7; 32],
                rp: RelyingParty {
                    id: "example.com".into(),
                    name: DEFAULT_RP_NAME.into(),
                },
                user: UserEntity {
                    id: b"1234567890".to_vec(),
                    name: "demo".into(),
                    display_name: "Demo User".into(),
                },
                algorithms: vec![ES256, RS256],
                timeout: Duration::from_secs(60),
            }
        );
    }

    #[test]
    fn conditional_get_uses_fixed_payload() {
        let options = RequestOptions::conditional(&RequestSettings::default(), "localhost", vec![1; 32]);
        assert_eq!(
            options,
            RequestOptions {
                challenge: vec![1; 32],
                rp_id: "localhost".into(),
                timeout: Duration::from_secs(60),
            }
        );
    }
}
