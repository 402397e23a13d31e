//! [`CredentialPlatform`] backed by the browser's Web Authentication API.
//!
//! Option payloads are copied into plain JS objects with `Reflect` and
//! handed to `navigator.credentials`; nothing here goes through the typed
//! `web_sys` credential bindings, which still lag behind conditional
//! mediation. Every JS exception is converted into a [`PlatformError`]
//! carrying the exception's `name` and `message`.

use crate::{
    ATTESTATION, AssertedCredential, ClientCapabilities, CreatedCredential, CreationOptions,
    CredentialPlatform, MEDIATION, PlatformError, PlatformErrorKind, RESIDENT_KEY,
    RequestOptions, USER_VERIFICATION,
};
use futures_util::future::{self, Either};
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use std::pin::pin;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::AbortController;

/// Failures of the JS glue itself, as opposed to errors the platform
/// throws on purpose.
#[derive(Debug, Clone, Error)]
pub enum WebBindingError {
    /// A global the binding needs is missing.
    #[error("not available: {0}")]
    NotAvailable(String),

    /// A JavaScript interop error occurred.
    #[error("JS error: {0}")]
    JsError(String),
}

impl From<WebBindingError> for PlatformError {
    fn from(error: WebBindingError) -> Self {
        match error {
            WebBindingError::NotAvailable(message) => {
                PlatformError::new(PlatformErrorKind::NotSupported, message)
            }
            WebBindingError::JsError(message) => PlatformError::named("TypeError", message),
        }
    }
}

/// The browser platform. Stateless; every call looks the globals up again.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPlatform;

impl WebPlatform {
    /// Create a handle to the browser platform.
    pub fn new() -> Self {
        Self
    }

    /// `PublicKeyCredential.isConditionalMediationAvailable()`, for browsers
    /// whose capability map predates `conditionalGet`.
    async fn conditional_mediation_available(&self) -> bool {
        let outcome: Result<bool, PlatformError> = async {
            let class = public_key_credential()?;
            let promise = call_static(&class, "isConditionalMediationAvailable")?;
            let available = JsFuture::from(promise).await.map_err(platform_error)?;
            Ok(available.as_bool().unwrap_or(false))
        }
        .await;
        outcome.unwrap_or(false)
    }
}

impl CredentialPlatform for WebPlatform {
    fn has_credential_api(&self) -> bool {
        public_key_credential().is_ok() && credentials_container().is_ok()
    }

    async fn client_capabilities(&self) -> Result<ClientCapabilities, PlatformError> {
        let class = public_key_credential()?;
        if !js_get(&class, "getClientCapabilities")?.is_function() {
            return Ok(ClientCapabilities {
                conditional_create: false,
                conditional_get: self.conditional_mediation_available().await,
            });
        }
        let promise = call_static(&class, "getClientCapabilities")?;
        let capabilities = JsFuture::from(promise).await.map_err(platform_error)?;

        let conditional_create = js_get(&capabilities, "conditionalCreate")?
            .as_bool()
            .unwrap_or(false);
        let conditional_get = match js_get(&capabilities, "conditionalGet")?.as_bool() {
            Some(supported) => supported,
            None => self.conditional_mediation_available().await,
        };

        Ok(ClientCapabilities {
            conditional_create,
            conditional_get,
        })
    }

    fn host_name(&self) -> String {
        Reflect::get(&js_sys::global(), &"location".into())
            .and_then(|location| Reflect::get(&location, &"hostname".into()))
            .ok()
            .and_then(|hostname| hostname.as_string())
            .unwrap_or_default()
    }

    async fn create(
        &self,
        options: &CreationOptions,
        signal: &CancellationToken,
    ) -> Result<Option<CreatedCredential>, PlatformError> {
        let controller = AbortController::new().map_err(platform_error)?;
        let request = creation_options(options, &controller)?;

        let credential = call_with_abort("create", &request, &controller, signal).await?;
        if credential.is_null() || credential.is_undefined() {
            return Ok(None);
        }

        let response = js_get(&credential, "response")?;
        Ok(Some(CreatedCredential {
            id: js_string(&credential, "id")?,
            kind: js_string(&credential, "type")?,
            raw_id: array_buffer_to_vec(&js_get(&credential, "rawId")?),
            client_data_json: array_buffer_to_vec(&js_get(&response, "clientDataJSON")?),
            attestation_object: array_buffer_to_vec(&js_get(&response, "attestationObject")?),
            algorithm: public_key_algorithm(&response),
        }))
    }

    async fn get(
        &self,
        options: &RequestOptions,
        signal: &CancellationToken,
    ) -> Result<Option<AssertedCredential>, PlatformError> {
        let controller = AbortController::new().map_err(platform_error)?;
        let request = request_options(options, &controller)?;

        let credential = call_with_abort("get", &request, &controller, signal).await?;
        if credential.is_null() || credential.is_undefined() {
            return Ok(None);
        }

        Ok(Some(AssertedCredential {
            id: js_string(&credential, "id")?,
            kind: js_string(&credential, "type")?,
            raw_id: array_buffer_to_vec(&js_get(&credential, "rawId")?),
        }))
    }
}

/// Call `navigator.credentials[method](request)` and await it, aborting the
/// JS request as soon as `signal` is cancelled. The JS promise then usually
/// rejects with `AbortError`; a credential produced before the abort landed
/// still resolves, and the facade discards it.
async fn call_with_abort(
    method: &str,
    request: &Object,
    controller: &AbortController,
    signal: &CancellationToken,
) -> Result<JsValue, PlatformError> {
    let credentials = credentials_container()?;
    let function: Function = js_get(&credentials, method)?
        .dyn_into()
        .map_err(|_| WebBindingError::NotAvailable(format!("navigator.credentials.{method}")))?;
    let promise: Promise = function
        .call1(&credentials, request)
        .map_err(platform_error)?
        .unchecked_into();

    let settled = pin!(JsFuture::from(promise));
    let abort_on_cancel = pin!(async {
        signal.cancelled().await;
        controller.abort();
    });

    match future::select(settled, abort_on_cancel).await {
        Either::Left((outcome, _)) => outcome.map_err(platform_error),
        Either::Right(((), settled)) => settled.await.map_err(platform_error),
    }
}

fn creation_options(
    options: &CreationOptions,
    controller: &AbortController,
) -> Result<Object, WebBindingError> {
    let public_key = Object::new();
    js_set(&public_key, "challenge", &Uint8Array::from(options.challenge.as_slice()))?;

    let rp = Object::new();
    js_set(&rp, "id", &JsValue::from_str(&options.rp.id))?;
    js_set(&rp, "name", &JsValue::from_str(&options.rp.name))?;
    js_set(&public_key, "rp", &rp)?;

    let user = Object::new();
    js_set(&user, "id", &Uint8Array::from(options.user.id.as_slice()))?;
    js_set(&user, "name", &JsValue::from_str(&options.user.name))?;
    js_set(
        &user,
        "displayName",
        &JsValue::from_str(&options.user.display_name),
    )?;
    js_set(&public_key, "user", &user)?;

    let params = Array::new();
    for algorithm in &options.algorithms {
        let param = Object::new();
        js_set(&param, "type", &JsValue::from_str("public-key"))?;
        js_set(&param, "alg", &JsValue::from_f64(*algorithm as f64))?;
        params.push(&param);
    }
    js_set(&public_key, "pubKeyCredParams", &params)?;

    let selection = Object::new();
    js_set(
        &selection,
        "residentKey",
        &JsValue::from_str(RESIDENT_KEY),
    )?;
    js_set(
        &selection,
        "userVerification",
        &JsValue::from_str(USER_VERIFICATION),
    )?;
    js_set(&public_key, "authenticatorSelection", &selection)?;

    js_set(
        &public_key,
        "timeout",
        &JsValue::from_f64(options.timeout.as_millis() as f64),
    )?;
    js_set(
        &public_key,
        "attestation",
        &JsValue::from_str(ATTESTATION),
    )?;

    let request = Object::new();
    js_set(&request, "publicKey", &public_key)?;
    js_set(&request, "mediation", &JsValue::from_str(MEDIATION))?;
    js_set(&request, "signal", &controller.signal())?;
    Ok(request)
}

fn request_options(
    options: &RequestOptions,
    controller: &AbortController,
) -> Result<Object, WebBindingError> {
    let public_key = Object::new();
    js_set(&public_key, "challenge", &Uint8Array::from(options.challenge.as_slice()))?;
    js_set(&public_key, "rpId", &JsValue::from_str(&options.rp_id))?;
    js_set(
        &public_key,
        "userVerification",
        &JsValue::from_str(USER_VERIFICATION),
    )?;
    js_set(
        &public_key,
        "timeout",
        &JsValue::from_f64(options.timeout.as_millis() as f64),
    )?;

    let request = Object::new();
    js_set(&request, "publicKey", &public_key)?;
    js_set(&request, "mediation", &JsValue::from_str(MEDIATION))?;
    js_set(&request, "signal", &controller.signal())?;
    Ok(request)
}

/// Convert a thrown JS value into a [`PlatformError`].
fn platform_error(value: JsValue) -> PlatformError {
    let name = Reflect::get(&value, &"name".into())
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_default();
    let message = Reflect::get(&value, &"message".into())
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    PlatformError::named(&name, message)
}

/// `response.getPublicKeyAlgorithm()`, where the browser implements it.
fn public_key_algorithm(response: &JsValue) -> Option<i64> {
    let function: Function = js_get(response, "getPublicKeyAlgorithm").ok()?.dyn_into().ok()?;
    let algorithm = function.call0(response).ok()?.as_f64()?;
    Some(algorithm as i64)
}

/// Get the global `PublicKeyCredential` class.
fn public_key_credential() -> Result<JsValue, WebBindingError> {
    let class = Reflect::get(&js_sys::global(), &"PublicKeyCredential".into())
        .map_err(|_| WebBindingError::NotAvailable("PublicKeyCredential not found".into()))?;
    if class.is_undefined() || class.is_null() {
        return Err(WebBindingError::NotAvailable(
            "PublicKeyCredential is undefined".into(),
        ));
    }
    Ok(class)
}

/// Get `navigator.credentials`.
fn credentials_container() -> Result<JsValue, WebBindingError> {
    let navigator = Reflect::get(&js_sys::global(), &"navigator".into())
        .map_err(|_| WebBindingError::NotAvailable("navigator not found".into()))?;
    if navigator.is_undefined() {
        return Err(WebBindingError::NotAvailable(
            "navigator is undefined".into(),
        ));
    }
    let credentials = Reflect::get(&navigator, &"credentials".into())
        .map_err(|_| WebBindingError::NotAvailable("credentials not found".into()))?;
    if credentials.is_undefined() {
        return Err(WebBindingError::NotAvailable(
            "navigator.credentials is undefined".into(),
        ));
    }
    Ok(credentials)
}

/// Call a promise-returning static method such as
/// `PublicKeyCredential.getClientCapabilities()`.
fn call_static(class: &JsValue, method: &str) -> Result<Promise, PlatformError> {
    let function: Function = js_get(class, method)?
        .dyn_into()
        .map_err(|_| WebBindingError::NotAvailable(format!("PublicKeyCredential.{method}")))?;
    let promise = function.call0(class).map_err(platform_error)?;
    Ok(promise.unchecked_into())
}

/// Shorthand for `Reflect::get` with a string key.
fn js_get(obj: &JsValue, key: &str) -> Result<JsValue, WebBindingError> {
    Reflect::get(obj, &JsValue::from_str(key))
        .map_err(|e| WebBindingError::JsError(format!("failed to get '{key}': {e:?}")))
}

/// Read a string property, failing if it is missing.
fn js_string(obj: &JsValue, key: &str) -> Result<String, WebBindingError> {
    js_get(obj, key)?
        .as_string()
        .ok_or_else(|| WebBindingError::JsError(format!("'{key}' is not a string")))
}

/// Shorthand for `Reflect::set` with a string key.
fn js_set(obj: &Object, key: &str, value: &JsValue) -> Result<(), WebBindingError> {
    Reflect::set(obj, &JsValue::from_str(key), value)
        .map_err(|e| WebBindingError::JsError(format!("failed to set '{key}': {e:?}")))?;
    Ok(())
}

/// Convert a JS `ArrayBuffer` (or typed-array view) to `Vec<u8>`.
fn array_buffer_to_vec(value: &JsValue) -> Vec<u8> {
    Uint8Array::new(value).to_vec()
}
