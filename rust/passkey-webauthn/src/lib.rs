#![warn(missing_docs)]

//! Conditional WebAuthn credential requests.
//!
//! This crate wraps the two WebAuthn ceremonies the demo performs with
//! `mediation: "conditional"`:
//!
//! - **Conditional create**: after a password sign-in, ask the platform's
//!   password manager to quietly upgrade the account to a passkey.
//! - **Conditional get**: offer existing passkeys through form autofill.
//!
//! Neither ceremony is verified here; the crate only sequences the platform
//! calls and turns whatever the platform throws into a [`CredentialResult`].
//!
//! # Architecture
//!
//! ```text
//! CredentialRequests ──▸ AbortCoordinator   (one request in flight)
//!        │
//!        └──────────────▸ CredentialPlatform (navigator.credentials, or a double)
//! ```
//!
//! - **[`CredentialPlatform`]**: the seam to the browser. On
//!   `wasm32-unknown-unknown` it is implemented by [`web::WebPlatform`];
//!   the `helpers` feature provides an in-memory implementation.
//! - **[`AbortCoordinator`]**: cancel-before-issue discipline so the
//!   platform never sees two overlapping requests.
//! - **[`CredentialRequests`]**: fixed option payloads, exclusivity, and
//!   the error mapping from [`PlatformError`] to [`CredentialResult`].
//! - **[`probe`]**: the capability check that never fails.

mod abort;
mod capability;
mod error;
mod identity;
mod options;
mod platform;
mod requests;
mod result;

pub use abort::*;
pub use capability::*;
pub use error::*;
pub use identity::*;
pub use options::*;
pub use platform::*;
pub use requests::*;
pub use result::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod web;

#[cfg(any(test, feature = "helpers"))]
pub mod helpers;
