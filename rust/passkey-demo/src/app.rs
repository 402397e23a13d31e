//! Wires a [`DemoController`] over the browser's credential API to the
//! Leptos components.

use std::rc::Rc;

use leptos::prelude::*;
use passkey_webauthn::web::WebPlatform;
use wasm_bindgen_futures::spawn_local;

use crate::components::DemoApp;
use crate::{DemoController, DemoState};

type Controller = Rc<DemoController<WebPlatform>>;

/// Build the controller, start the capability probe and mount the page.
pub fn mount() {
    mount_to_body(|| {
        let state = RwSignal::new(DemoState::default());
        let controller: Controller =
            Rc::new(DemoController::new(WebPlatform).with_observer(move |snapshot| {
                state.set(snapshot.clone());
            }));
        let controller = StoredValue::new_local(controller);

        spawn_local({
            let controller = controller.get_value();
            async move { controller.start().await }
        });

        let on_login = move |username: String, password: String| {
            let controller = controller.get_value();
            spawn_local(async move {
                if let Err(error) = controller.submit_login(&username, &password).await {
                    tracing::error!(%error, "Sign-in flow failed");
                }
            });
        };

        let on_sign_out = move || {
            let controller = controller.get_value();
            controller.sign_out();
            spawn_local(async move { controller.offer_passkey_sign_in().await });
        };

        view! { <DemoApp state=state on_login=on_login on_sign_out=on_sign_out /> }
    });
}
