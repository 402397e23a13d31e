#![warn(missing_docs)]

//! Browser demo of WebAuthn conditional create.
//!
//! A user signs in with a password; right after, the page asks the
//! platform to create a passkey with `mediation: "conditional"`. If the
//! user's password manager has just seen that password used, it may create
//! the passkey silently. Otherwise the request is declined and the page
//! explains why.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ components (Leptos)                                          │
//! │   renders RwSignal<DemoState>, reports submit / sign out     │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ callbacks
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │ DemoController                                               │
//! │   SessionStore ─ password check, current identity            │
//! │   CredentialRequests<P> ─ probe, create, get, abort          │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ CredentialPlatform
//!                 WebPlatform (browser) / ScriptedPlatform (tests)
//! ```
//!
//! # Modules
//!
//! - **[`session`]**: The hard-coded account table and current session.
//! - **[`controller`]**: The screen state machine, independent of the DOM.
//! - **[`components`]**: Leptos CSR UI.
//!
//! # Entry points
//!
//! - **`demo`** binary: installs logging and mounts the UI; built with
//!   Trunk from `index.html`.

pub mod components;
pub mod controller;
pub mod session;

pub use controller::*;
pub use session::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod app;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod logging;
