//! End-to-end flows through [`DemoController`] against a scripted platform.

use std::{cell::RefCell, rc::Rc};

use passkey_demo::{
    AuthError, DemoController, DemoError, DemoState, EXCLUDE_CREDENTIALS_NOTE, LOGIN_DELAY,
    PASSKEY_USERNAME, PasskeyPanel, Screen, StatusMessage, Tone,
};
use passkey_webauthn::{
    ALREADY_EXISTS_MESSAGE, AssertedCredential, ClientCapabilities, CreatedCredential,
    CREATE_NOT_ALLOWED_MESSAGE, Identity, PlatformError,
    helpers::{Scripted, ScriptedPlatform},
};
use pretty_assertions::assert_eq;

fn created() -> CreatedCredential {
    CreatedCredential {
        id: "Y3JlZA".into(),
        kind: "public-key".into(),
        raw_id: vec![1, 2, 3],
        client_data_json: b"{}".to_vec(),
        attestation_object: vec![0xa0],
        algorithm: Some(-7),
    }
}

fn asserted() -> AssertedCredential {
    AssertedCredential {
        id: "cGFzc2tleQ".into(),
        kind: "public-key".into(),
        raw_id: vec![9, 9],
    }
}

fn demo_identity() -> Identity {
    Identity::new("1234567890", "demo", "Demo User")
}

#[tokio::test(start_paused = true)]
async fn password_sign_in_with_declined_creation_stays_signed_in() {
    let platform = ScriptedPlatform::new();
    platform.push_create(Scripted::Resolve(Err(PlatformError::named(
        "NotAllowedError",
        "The operation either timed out or was not allowed.",
    ))));
    let controller = DemoController::new(platform.clone());

    controller.submit_login("demo", "password123").await.unwrap();

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedIn);
    assert_eq!(
        state.status,
        Some(StatusMessage::success(
            "Welcome, Demo User! You've successfully signed in."
        ))
    );
    let panel = state.passkey.unwrap();
    assert!(panel.headline().contains(CREATE_NOT_ALLOWED_MESSAGE));
    assert_eq!(panel.tone(), Tone::Error);
    assert_eq!(controller.session().current(), Some(demo_identity()));

    let requests = platform.create_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user.name, "demo");
}

#[tokio::test(start_paused = true)]
async fn password_sign_in_creates_a_passkey() {
    let platform = ScriptedPlatform::new();
    platform.push_create(Scripted::Resolve(Ok(Some(created()))));
    let controller = DemoController::new(platform);

    controller.submit_login("  demo ", "password123").await.unwrap();

    match controller.state().passkey {
        Some(PasskeyPanel::Created { details }) => {
            assert!(details.contains("\"id\": \"Y3JlZA\""));
            assert!(details.contains("\"attestationObject\""));
        }
        other => panic!("unexpected panel: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn existing_passkey_explains_the_exclusion_list() {
    let platform = ScriptedPlatform::new();
    platform.push_create(Scripted::Resolve(Err(PlatformError::named(
        "InvalidStateError",
        "The authenticator already holds a credential.",
    ))));
    let controller = DemoController::new(platform);

    controller.submit_login("demo", "password123").await.unwrap();

    assert_eq!(
        controller.state().passkey,
        Some(PasskeyPanel::Failed {
            message: ALREADY_EXISTS_MESSAGE.into(),
            note: Some(EXCLUDE_CREDENTIALS_NOTE.into()),
        })
    );
}

#[tokio::test(start_paused = true)]
async fn wrong_password_stays_logged_out() {
    let platform = ScriptedPlatform::new();
    let controller = DemoController::new(platform.clone());

    controller.submit_login("demo", "hunter2").await.unwrap();

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedOut);
    assert!(!state.signing_in);
    assert_eq!(
        state.status,
        Some(StatusMessage::error(AuthError::InvalidCredentials.to_string()))
    );
    assert_eq!(controller.session().current(), None);
    assert!(platform.create_requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn observer_sees_signing_in_before_the_result() {
    let platform = ScriptedPlatform::new();
    platform.push_create(Scripted::Resolve(Ok(Some(created()))));
    let seen: Rc<RefCell<Vec<DemoState>>> = Rc::default();
    let controller = DemoController::new(platform).with_observer({
        let seen = seen.clone();
        move |state| seen.borrow_mut().push(state.clone())
    });

    controller.submit_login("demo", "password123").await.unwrap();

    let seen = seen.borrow();
    assert!(seen[0].signing_in);
    assert_eq!(seen[0].screen, Screen::LoggedOut);
    assert!(seen.iter().any(|state| state.passkey == Some(PasskeyPanel::Attempting)));
    assert_eq!(seen.last(), Some(&controller.state()));
}

#[tokio::test]
async fn creating_a_passkey_requires_a_session() {
    let controller = DemoController::new(ScriptedPlatform::new());
    assert_eq!(
        controller.create_passkey().await,
        Err(DemoError::NotAuthenticated)
    );
}

#[tokio::test(start_paused = true)]
async fn unsupported_conditional_create_skips_the_request() {
    let platform = ScriptedPlatform::new().with_capabilities(Ok(ClientCapabilities {
        conditional_create: false,
        conditional_get: false,
    }));
    let controller = DemoController::new(platform.clone());

    controller.submit_login("demo", "password123").await.unwrap();

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedIn);
    assert_eq!(state.passkey, Some(PasskeyPanel::Unsupported));
    assert!(platform.create_requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sign_out_clears_everything_but_capabilities() {
    let platform = ScriptedPlatform::new();
    platform.push_create(Scripted::Resolve(Ok(Some(created()))));
    let controller = DemoController::new(platform);

    controller.submit_login("demo", "password123").await.unwrap();
    let capabilities = controller.state().capabilities;
    assert!(capabilities.is_some());

    controller.sign_out();
    controller.sign_out();

    assert_eq!(
        controller.state(),
        DemoState {
            capabilities,
            ..DemoState::default()
        }
    );
    assert!(!controller.session().is_authenticated());
}

#[tokio::test]
async fn conditional_get_signs_in_without_verification() {
    let platform = ScriptedPlatform::new();
    platform.push_get(Scripted::Resolve(Ok(Some(asserted()))));
    let controller = DemoController::new(platform.clone());

    controller.start().await;

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedIn);
    assert!(state.unverified);
    let identity = state.identity.unwrap();
    assert_eq!(identity.id, "cGFzc2tleQ");
    assert_eq!(identity.username, PASSKEY_USERNAME);
    assert_eq!(platform.get_requests().len(), 1);
}

#[tokio::test]
async fn failed_conditional_get_explains_itself() {
    let platform = ScriptedPlatform::new();
    platform.push_get(Scripted::Resolve(Err(PlatformError::named(
        "SecurityError",
        "The relying party ID is not a registrable domain suffix.",
    ))));
    let controller = DemoController::new(platform);

    controller.start().await;

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedOut);
    assert_eq!(state.identity, None);
    let hint = state.sign_in_hint.unwrap();
    assert_eq!(hint.tone, Tone::Error);
    assert!(hint.text.starts_with("Passkey sign-in is unavailable: "));
    assert!(hint.text.contains("not a registrable domain suffix"));
}

#[tokio::test]
async fn autofill_answer_after_sign_out_is_discarded() {
    let platform = ScriptedPlatform::new();
    platform.push_get(Scripted::AfterAbort(Ok(Some(asserted()))));
    let controller = DemoController::new(platform);

    tokio::join!(controller.start(), async {
        tokio::task::yield_now().await;
        controller.sign_out();
    });

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedOut);
    assert_eq!(state.identity, None);
    assert!(!controller.session().is_authenticated());
}

#[tokio::test]
async fn missing_conditional_get_shows_a_hint() {
    let platform = ScriptedPlatform::new().with_capabilities(Ok(ClientCapabilities {
        conditional_create: true,
        conditional_get: false,
    }));
    let controller = DemoController::new(platform.clone());

    controller.start().await;

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedOut);
    assert_eq!(state.sign_in_hint.map(|hint| hint.tone), Some(Tone::Info));
    assert!(platform.get_requests().is_empty());
}

#[tokio::test]
async fn missing_webauthn_does_nothing_on_start() {
    let platform = ScriptedPlatform::new().without_credential_api();
    let controller = DemoController::new(platform.clone());

    controller.start().await;

    let state = controller.state();
    let capabilities = state.capabilities.unwrap();
    assert!(!capabilities.webauthn_supported);
    assert_eq!(state.sign_in_hint, None);
    assert!(platform.get_requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn password_sign_in_aborts_pending_autofill() {
    let platform = ScriptedPlatform::new();
    platform.push_get(Scripted::UntilAborted);
    platform.push_create(Scripted::Resolve(Ok(Some(created()))));
    let controller = DemoController::new(platform.clone());

    tokio::join!(controller.start(), async {
        tokio::task::yield_now().await;
        controller.submit_login("demo", "password123").await.unwrap();
    });

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedIn);
    assert!(!state.unverified);
    assert_eq!(state.identity, Some(demo_identity()));
    assert!(matches!(state.passkey, Some(PasskeyPanel::Created { .. })));
    assert!(controller.requests().coordinator().is_idle());
}

#[tokio::test(start_paused = true)]
async fn sign_out_abandons_a_pending_creation() {
    let platform = ScriptedPlatform::new();
    platform.push_create(Scripted::UntilAborted);
    let controller = DemoController::new(platform);

    tokio::join!(
        async { controller.submit_login("demo", "password123").await.unwrap() },
        async {
            tokio::time::sleep(LOGIN_DELAY * 2).await;
            assert_eq!(controller.state().passkey, Some(PasskeyPanel::Attempting));
            controller.sign_out();
        }
    );

    let state = controller.state();
    assert_eq!(state.screen, Screen::LoggedOut);
    assert_eq!(state.passkey, None);
}
