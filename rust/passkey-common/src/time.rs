//! Cross-platform timers.
//!
//! Native targets sleep on the tokio timer; `wasm32-unknown-unknown`
//! schedules a `setTimeout` on the JS global and awaits it as a promise.

pub use std::time::Duration;

use thiserror::Error;

/// Timer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The JS global has no usable `setTimeout`
    #[error("Unable to schedule timer: {0}")]
    Unavailable(String),
}

/// Suspend the current task for `duration`.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub async fn sleep(duration: Duration) -> Result<(), TimerError> {
    tokio::time::sleep(duration).await;
    Ok(())
}

/// Suspend the current task for `duration`.
///
/// Works in windows and workers alike because `setTimeout` is looked up on
/// the JS global rather than on `window`.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub async fn sleep(duration: Duration) -> Result<(), TimerError> {
    use js_sys::{Function, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    let global = js_sys::global();
    let set_timeout: Function = Reflect::get(&global, &JsValue::from_str("setTimeout"))
        .map_err(|e| TimerError::Unavailable(format!("{e:?}")))?
        .dyn_into()
        .map_err(|_| TimerError::Unavailable("setTimeout is not a function".into()))?;

    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let mut scheduled = Ok(());
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Err(e) = set_timeout.call2(&global, &resolve, &JsValue::from(millis)) {
            scheduled = Err(TimerError::Unavailable(format!("{e:?}")));
        }
    });
    scheduled?;

    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| TimerError::Unavailable(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn it_sleeps_for_the_requested_duration() {
        let start = tokio::time::Instant::now();
        sleep(Duration::from_millis(500)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
