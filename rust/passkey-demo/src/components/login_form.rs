//! Password form.
//!
//! The username field carries `autocomplete="username webauthn"` so that a
//! pending conditional get can offer passkeys in its autofill menu. The
//! input signals live in this component, so unmounting it on sign-in and
//! mounting it again on sign-out leaves both fields empty.

use crate::DemoState;
use leptos::prelude::*;

/// The signed-out screen.
#[component]
pub fn LoginForm(
    /// The controller's latest state.
    state: RwSignal<DemoState>,
    /// Called with `(username, password)` on submit.
    on_login: impl Fn(String, String) + Send + Sync + 'static + Clone,
) -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let signing_in = move || state.with(|state| state.signing_in);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        on_login(username.get(), password.get());
    };

    view! {
        <section class="login-section">
            <h2>"Sign in"</h2>
            <p class="hint">"Use " <code>"demo"</code> " / " <code>"password123"</code></p>
            <form class="login-form" on:submit=submit>
                <label for="username">"Username"</label>
                <input
                    id="username"
                    type="text"
                    name="username"
                    autocomplete="username webauthn"
                    required=true
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <label for="password">"Password"</label>
                <input
                    id="password"
                    type="password"
                    name="password"
                    autocomplete="current-password"
                    required=true
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=signing_in>
                    {move || if signing_in() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
            {move || {
                state.with(|state| state.status.clone()).map(|status| {
                    view! { <p class=status.tone.class()>{status.text}</p> }
                })
            }}
            {move || {
                state.with(|state| state.sign_in_hint.clone()).map(|hint| {
                    view! { <p class=hint.tone.class()>{hint.text}</p> }
                })
            }}
        </section>
    }
}
