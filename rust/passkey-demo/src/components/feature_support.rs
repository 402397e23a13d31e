//! Feature support panel.

use crate::DemoState;
use leptos::prelude::*;
use passkey_webauthn::CapabilityFlags;

/// Advice shown under the flags, if any.
pub fn support_notice(flags: &CapabilityFlags) -> Option<&'static str> {
    if !flags.webauthn_supported {
        Some(
            "Your browser does not support WebAuthn. Please use a modern browser like Chrome, Edge, or Safari.",
        )
    } else if !flags.conditional_create_supported {
        Some("Your browser does not support Conditional Create. Please use Chrome 108+ or equivalent.")
    } else {
        None
    }
}

fn flag_row(label: &'static str, supported: bool) -> impl IntoView {
    let (class, text) = if supported {
        ("success", "Supported")
    } else {
        ("error", "Not Supported")
    };
    view! {
        <p>{label}": "<span class=class>{text}</span></p>
    }
}

/// Shows the outcome of the last capability probe.
#[component]
pub fn FeatureSupport(
    /// The controller's latest state.
    state: RwSignal<DemoState>,
) -> impl IntoView {
    view! {
        <section class="feature-support">
            <h3>"Feature Support"</h3>
            {move || match state.with(|state| state.capabilities) {
                None => view! { <p class="loading">"Checking browser support..."</p> }.into_any(),
                Some(flags) => view! {
                    {flag_row("WebAuthn", flags.webauthn_supported)}
                    {flag_row("Conditional Create", flags.conditional_create_supported)}
                    {flag_row("Conditional Get", flags.conditional_get_supported)}
                    {support_notice(&flags).map(|notice| view! { <p class="error">{notice}</p> })}
                }
                .into_any(),
            }}
        </section>
    }
}
