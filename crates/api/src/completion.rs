//! One-shot completion plumbing for asynchronous requests
//!
//! Submitting a request yields a [`Pending`] handle. The driver keeps the
//! matching [`Completer`] and resolves it exactly once when the primitive
//! engine reports back; consuming `self` in [`Completer::complete`] makes a
//! second resolution impossible. If the completer is dropped without being
//! resolved the handle reports [`Error::CompletionLost`].

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::types::KppRequest;

/// Final state of an asynchronous request
#[derive(Debug)]
pub struct Completion {
    /// The request, handed back with its destination buffer filled on success
    pub request: KppRequest,
    /// Number of bytes written on success, or the failure
    pub result: Result<usize>,
}

impl Completion {
    /// Consume the completion, returning the written output bytes on success
    pub fn into_output(self) -> Result<Vec<u8>> {
        let written = self.result?;
        Ok(self.request.dst.to_vec(written))
    }
}

/// Sending half: resolves the matching [`Pending`] exactly once
pub struct Completer {
    tx: oneshot::Sender<Completion>,
}

impl Completer {
    /// Deliver the final result. A caller that stopped listening is ignored.
    pub fn complete(self, request: KppRequest, result: Result<usize>) {
        let _ = self.tx.send(Completion { request, result });
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer").finish_non_exhaustive()
    }
}

/// Receiving half: resolves once with the request's [`Completion`]
///
/// Usable both as a future and, outside an async runtime, through
/// [`Pending::wait`].
pub struct Pending {
    rx: oneshot::Receiver<Completion>,
}

impl Pending {
    /// Block the current thread until the request completes
    ///
    /// Must not be called from within an asynchronous execution context.
    pub fn wait(self) -> Result<Completion> {
        self.rx.blocking_recv().map_err(|_| Error::CompletionLost)
    }
}

impl Future for Pending {
    type Output = Result<Completion>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| Error::CompletionLost))
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}

/// Create a linked completer / pending pair
pub fn pending() -> (Completer, Pending) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx }, Pending { rx })
}

/// A request refused at submission time, handed back untouched
#[derive(Debug)]
pub struct Rejected {
    /// Why the request was not submitted
    pub error: Error,
    /// The caller's request, with `dst` and `dst_len` unchanged
    pub request: KppRequest,
}

impl Rejected {
    /// Pair an error with the request it refers to
    pub fn new(error: Error, request: KppRequest) -> Self {
        Self { error, request }
    }
}

impl From<Rejected> for Error {
    fn from(rejected: Rejected) -> Self {
        rejected.error
    }
}

/// Outcome of submitting a request: in progress, or refused synchronously
pub type Submission = core::result::Result<Pending, Rejected>;
