//! Outcome of the conditional create.

use crate::{DemoState, PasskeyPanel};
use leptos::prelude::*;

/// Renders [`DemoState::passkey`].
#[component]
pub fn PasskeyResult(
    /// The controller's latest state.
    state: RwSignal<DemoState>,
) -> impl IntoView {
    view! {
        <div class="passkey-result">
            {move || {
                state.with(|state| state.passkey.clone()).map(|panel| {
                    let headline = panel.headline();
                    let class = panel.tone().class();
                    match panel {
                        PasskeyPanel::Created { details } => view! {
                            <p class=class>{headline}</p>
                            <p>
                                "In a real application, this credential would be sent to the "
                                "server for verification and registration."
                            </p>
                            <p class="caveat">
                                "User presence and user verification are reported as false for "
                                "conditionally created credentials; the server must accept them "
                                "and treat the passkey accordingly."
                            </p>
                            <details>
                                <summary>"Credential Details"</summary>
                                <pre>{details}</pre>
                            </details>
                        }
                        .into_any(),
                        PasskeyPanel::Failed { note, .. } => view! {
                            <p class=class>{headline}</p>
                            {note.map(|note| view! { <p class="note">{note}</p> })}
                            <p>"This could be because:"</p>
                            <ul>
                                <li>"You don't have a saved password for this site in your password manager"</li>
                                <li>"You haven't recently signed in with a password"</li>
                                <li>"Your password manager doesn't support this feature"</li>
                            </ul>
                        }
                        .into_any(),
                        PasskeyPanel::Unsupported | PasskeyPanel::Attempting => {
                            view! { <p class=class>{headline}</p> }.into_any()
                        }
                    }
                })
            }}
        </div>
    }
}
