//! Leptos UI components for the demo page.
//!
//! The component tree is:
//!
//! ```text
//! DemoApp
//! ├── FeatureSupport        (capability flags)
//! ├── LoginForm             (LoggedOut: password form + autofill hint)
//! └── SignedIn              (LoggedIn: status, passkey panel, sign out)
//!     └── PasskeyResult     (outcome of the conditional create)
//! ```
//!
//! The components only render a [`DemoState`] signal and report user
//! actions through callbacks; the [`DemoController`](crate::DemoController)
//! behind those callbacks is wired up in [`crate::app`].

mod feature_support;
mod login_form;
mod passkey_result;

pub use feature_support::*;
pub use login_form::*;
pub use passkey_result::*;

use crate::{DemoState, Screen};
use leptos::prelude::*;

/// Root component for the demo page.
#[component]
pub fn DemoApp(
    /// The controller's latest state.
    state: RwSignal<DemoState>,
    /// Called with `(username, password)` when the form is submitted.
    on_login: impl Fn(String, String) + Send + Sync + 'static + Clone,
    /// Called when the sign-out button is pressed.
    on_sign_out: impl Fn() + Send + Sync + 'static + Clone,
) -> impl IntoView {
    view! {
        <main class="demo-root">
            <h1>"WebAuthn Conditional Create"</h1>
            <p class="lede">
                "Sign in with a password and, if your password manager allows it, "
                "a passkey is created for you without an extra prompt."
            </p>
            <FeatureSupport state=state />
            {move || {
                match state.with(|state| state.screen) {
                    Screen::LoggedOut => {
                        let on_login = on_login.clone();
                        view! { <LoginForm state=state on_login=on_login /> }.into_any()
                    }
                    Screen::LoggedIn => {
                        let on_sign_out = on_sign_out.clone();
                        view! { <SignedIn state=state on_sign_out=on_sign_out /> }.into_any()
                    }
                }
            }}
        </main>
    }
}

/// The signed-in screen.
#[component]
pub fn SignedIn(
    /// The controller's latest state.
    state: RwSignal<DemoState>,
    /// Called when the sign-out button is pressed.
    on_sign_out: impl Fn() + Send + Sync + 'static + Clone,
) -> impl IntoView {
    view! {
        <section class="passkey-section">
            <h2>"Signed in"</h2>
            {move || {
                state.with(|state| state.status.clone()).map(|status| {
                    view! { <p class=status.tone.class()>{status.text}</p> }
                })
            }}
            {move || {
                state.with(|state| state.unverified).then(|| {
                    view! {
                        <p class="caveat">
                            "This session was established from a conditional passkey selection "
                            "without verifying an assertion. A real application must verify it "
                            "on the server before trusting it."
                        </p>
                    }
                })
            }}
            <PasskeyResult state=state />
            <button class="sign-out" on:click=move |_| on_sign_out()>
                "Sign out"
            </button>
        </section>
    }
}
