//! An in-memory [`CredentialPlatform`] for tests.
//!
//! Each `create` / `get` call pops the next scripted response from its
//! queue. An exhausted queue behaves like a conditional request nobody
//! answers: it stays pending until its signal is cancelled.

use crate::{
    AssertedCredential, ClientCapabilities, CreatedCredential, CreationOptions,
    CredentialPlatform, PlatformError, RequestOptions,
};
use passkey_common::SharedCell;
use std::{collections::VecDeque, sync::Arc};
use tokio_util::sync::CancellationToken;

/// A scripted answer to one request.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    /// Settle immediately with this outcome.
    Resolve(Result<Option<T>, PlatformError>),
    /// Stay pending until the request's signal is cancelled, then settle
    /// with `AbortError`.
    UntilAborted,
    /// Stay pending until the request's signal is cancelled, then settle
    /// with this outcome anyway, as a platform does when the credential
    /// was already produced by the time the abort arrived.
    AfterAbort(Result<Option<T>, PlatformError>),
}

#[derive(Debug)]
struct State {
    credential_api: bool,
    capabilities: Result<ClientCapabilities, PlatformError>,
    host: String,
    creates: VecDeque<Scripted<CreatedCredential>>,
    gets: VecDeque<Scripted<AssertedCredential>>,
    create_requests: Vec<CreationOptions>,
    get_requests: Vec<RequestOptions>,
}

/// A cloneable, scriptable platform. Clones share their script and their
/// record of issued requests, so a test can keep one clone while the code
/// under test owns another.
#[derive(Debug, Clone)]
pub struct ScriptedPlatform {
    state: Arc<SharedCell<State>>,
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPlatform {
    /// A platform with the credential API, both conditional capabilities,
    /// host `localhost`, and empty scripts.
    pub fn new() -> Self {
        Self {
            state: Arc::new(SharedCell::new(State {
                credential_api: true,
                capabilities: Ok(ClientCapabilities {
                    conditional_create: true,
                    conditional_get: true,
                }),
                host: "localhost".to_string(),
                creates: VecDeque::new(),
                gets: VecDeque::new(),
                create_requests: Vec::new(),
                get_requests: Vec::new(),
            })),
        }
    }

    /// Remove `PublicKeyCredential` from the platform.
    pub fn without_credential_api(self) -> Self {
        self.state.write().credential_api = false;
        self
    }

    /// Answer capability queries with `capabilities`.
    pub fn with_capabilities(self, capabilities: Result<ClientCapabilities, PlatformError>) -> Self {
        self.state.write().capabilities = capabilities;
        self
    }

    /// Report `host` as the page's host name.
    pub fn with_host(self, host: &str) -> Self {
        self.state.write().host = host.to_string();
        self
    }

    /// Queue the answer to the next unanswered `create`.
    pub fn push_create(&self, response: Scripted<CreatedCredential>) {
        self.state.write().creates.push_back(response);
    }

    /// Queue the answer to the next unanswered `get`.
    pub fn push_get(&self, response: Scripted<AssertedCredential>) {
        self.state.write().gets.push_back(response);
    }

    /// Options of every `create` issued so far.
    pub fn create_requests(&self) -> Vec<CreationOptions> {
        self.state.read().create_requests.clone()
    }

    /// Options of every `get` issued so far.
    pub fn get_requests(&self) -> Vec<RequestOptions> {
        self.state.read().get_requests.clone()
    }
}

async fn settle<T>(
    response: Option<Scripted<T>>,
    signal: &CancellationToken,
) -> Result<Option<T>, PlatformError> {
    match response {
        Some(Scripted::Resolve(outcome)) => outcome,
        Some(Scripted::UntilAborted) | None => {
            signal.cancelled().await;
            Err(PlatformError::aborted())
        }
        Some(Scripted::AfterAbort(outcome)) => {
            signal.cancelled().await;
            outcome
        }
    }
}

impl CredentialPlatform for ScriptedPlatform {
    fn has_credential_api(&self) -> bool {
        self.state.read().credential_api
    }

    async fn client_capabilities(&self) -> Result<ClientCapabilities, PlatformError> {
        self.state.read().capabilities.clone()
    }

    fn host_name(&self) -> String {
        self.state.read().host.clone()
    }

    async fn create(
        &self,
        options: &CreationOptions,
        signal: &CancellationToken,
    ) -> Result<Option<CreatedCredential>, PlatformError> {
        let response = {
            let mut state = self.state.write();
            state.create_requests.push(options.clone());
            state.creates.pop_front()
        };
        settle(response, signal).await
    }

    async fn get(
        &self,
        options: &RequestOptions,
        signal: &CancellationToken,
    ) -> Result<Option<AssertedCredential>, PlatformError> {
        let response = {
            let mut state = self.state.write();
            state.get_requests.push(options.clone());
            state.gets.pop_front()
        };
        settle(response, signal).await
    }
}
