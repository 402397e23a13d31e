//! Errors reported by the credential platform.

use thiserror::Error;

/// The closed set of `DOMException` names the demo distinguishes.
///
/// Anything the platform throws that is not listed here lands in
/// [`PlatformErrorKind::Other`] with its original name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformErrorKind {
    /// `AbortError`: the request's signal was cancelled.
    Abort,
    /// `NotAllowedError`: the platform declined, e.g. the conditions for a
    /// conditional create were not met or the user dismissed the prompt.
    NotAllowed,
    /// `InvalidStateError`: a credential already exists for this user.
    InvalidState,
    /// `NotSupportedError`: the requested feature or algorithm is missing.
    NotSupported,
    /// `SecurityError`: the relying party id does not fit the origin.
    Security,
    /// Any other error name.
    Other(String),
}

impl PlatformErrorKind {
    /// Classify a `DOMException` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "AbortError" => Self::Abort,
            "NotAllowedError" => Self::NotAllowed,
            "InvalidStateError" => Self::InvalidState,
            "NotSupportedError" => Self::NotSupported,
            "SecurityError" => Self::Security,
            other => Self::Other(other.to_string()),
        }
    }

    /// The `DOMException` name this kind stands for.
    pub fn name(&self) -> &str {
        match self {
            Self::Abort => "AbortError",
            Self::NotAllowed => "NotAllowedError",
            Self::InvalidState => "InvalidStateError",
            Self::NotSupported => "NotSupportedError",
            Self::Security => "SecurityError",
            Self::Other(name) => name,
        }
    }
}

/// An error thrown by the platform while serving a credential request or
/// capability query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .kind.name(), .message)]
pub struct PlatformError {
    /// What kind of failure the platform reported.
    pub kind: PlatformErrorKind,
    /// The platform's message text, verbatim.
    pub message: String,
}

impl PlatformError {
    /// Construct an error of a known kind.
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Construct an error from a `DOMException` name and message.
    pub fn named(name: &str, message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::from_name(name), message)
    }

    /// Shorthand for the error a cancelled request settles with.
    pub fn aborted() -> Self {
        Self::new(PlatformErrorKind::Abort, "The operation was aborted.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for name in [
            "AbortError",
            "NotAllowedError",
            "InvalidStateError",
            "NotSupportedError",
            "SecurityError",
        ] {
            let kind = PlatformErrorKind::from_name(name);
            assert!(!matches!(kind, PlatformErrorKind::Other(_)), "{name}");
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn unknown_names_are_preserved() {
        let kind = PlatformErrorKind::from_name("ConstraintError");
        assert_eq!(kind, PlatformErrorKind::Other("ConstraintError".into()));
        assert_eq!(kind.name(), "ConstraintError");
    }

    #[test]
    fn display_includes_name_and_message() {
        let error = PlatformError::named("NotAllowedError", "The request is not allowed");
        assert_eq!(
            error.to_string(),
            "NotAllowedError: The request is not allowed"
        );
    }
}
