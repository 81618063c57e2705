//! Background key generation.
//!
//! [`dispatch`] runs a job on a named worker thread and hands its result to an
//! observer. The callback and future forms of key generation are two
//! observers over the same dispatch.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{EccError, Result};
use crate::key::EccKey;

/// Run `job` on a new thread called `thread_name`, then call `notify` with its
/// output on that same thread.
///
/// # Errors
///
/// Returns `AllocationFailed` if the thread cannot be spawned. `job` and
/// `notify` are dropped without running in that case.
pub fn dispatch<T, J, N>(thread_name: &str, job: J, notify: N) -> Result<()>
where
    T: Send + 'static,
    J: FnOnce() -> T + Send + 'static,
    N: FnOnce(T) + Send + 'static,
{
    thread::Builder::new()
        .name(thread_name.to_string())
        .spawn(move || notify(job()))
        .map(|_handle| debug!(worker = thread_name, "Dispatched key generation"))
        .map_err(|e| EccError::AllocationFailed(format!("cannot spawn {thread_name}: {e}")))
}

/// Future returned by [`EccKey::generate_async`].
///
/// Resolves to the populated key, or to the generation error. Dropping it
/// discards the result; the key is zeroized when the worker drops it.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct KeyGenFuture {
    receiver: oneshot::Receiver<Result<EccKey>>,
}

impl KeyGenFuture {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<EccKey>>) -> Self {
        Self { receiver }
    }
}

impl Future for KeyGenFuture {
    type Output = Result<EccKey>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_closed) => Err(EccError::GenerationAborted(
                "worker exited without reporting a result".to_string(),
            )),
        })
    }
}
