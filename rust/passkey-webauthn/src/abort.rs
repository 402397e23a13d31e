//! Single-flight coordination for platform credential requests.
//!
//! Browsers refuse (or race) a second WebAuthn request while one is still
//! pending, and a conditional get may sit pending for the lifetime of the
//! page. The coordinator therefore cancels whatever it holds *before*
//! handing out a token for the next request. The cancelled request is not
//! awaited: it may settle as aborted after the new one is already in
//! flight, and callers must tolerate that.

use passkey_common::SharedCell;
use tokio_util::sync::CancellationToken;

/// The cancellation token for one request, tagged so that the coordinator
/// can tell its own tokens apart.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    generation: u64,
    token: CancellationToken,
}

impl AbortHandle {
    /// The token to hand to the platform for this request.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether a newer request (or an explicit abort) cancelled this one.
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl PartialEq for AbortHandle {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
    }
}

impl Eq for AbortHandle {}

#[derive(Debug, Default)]
struct Slot {
    issued: u64,
    active: Option<AbortHandle>,
}

/// Holds at most one live [`AbortHandle`].
#[derive(Debug, Default)]
pub struct AbortCoordinator {
    slot: SharedCell<Slot>,
}

impl AbortCoordinator {
    /// Create an idle coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the outstanding request, if any, then register and return a
    /// handle for a new one.
    pub fn begin_exclusive(&self) -> AbortHandle {
        let (previous, handle) = {
            let mut slot = self.slot.write();
            slot.issued += 1;
            let handle = AbortHandle {
                generation: slot.issued,
                token: CancellationToken::new(),
            };
            let previous = slot.active.replace(handle.clone());
            (previous, handle)
        };

        if let Some(previous) = previous {
            tracing::debug!(
                generation = previous.generation,
                "Aborting ongoing WebAuthn operation"
            );
            previous.token.cancel();
        }
        handle
    }

    /// Forget `handle` if it is still the active one. A handle that was
    /// superseded leaves the newer request's registration alone.
    pub fn release(&self, handle: &AbortHandle) {
        let mut slot = self.slot.write();
        if slot.active.as_ref() == Some(handle) {
            slot.active = None;
        }
    }

    /// Cancel the outstanding request, if any, and leave the coordinator
    /// idle.
    pub fn abort(&self) {
        let previous = self.slot.write().active.take();
        if let Some(previous) = previous {
            tracing::debug!(
                generation = previous.generation,
                "Aborting ongoing WebAuthn operation"
            );
            previous.token.cancel();
        }
    }

    /// Whether no request is registered.
    pub fn is_idle(&self) -> bool {
        self.slot.read().active.is_none()
    }
}
