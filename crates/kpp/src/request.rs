//! Submission and completion plumbing shared by the DH and ECDH pipelines
//!
//! A request moves `Idle -> Submitted -> AsyncRunning -> Completed`. Power is
//! taken on submission and held by the completion closure; the in-flight flag
//! is claimed before anything else. Both guards, and the completion's handle
//! on the context, are dropped before the caller is notified, on every path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tekpp_api::error::{Error as ApiError, Result as ApiResult};
use tekpp_api::{pending, KppRequest, Rejected, Submission};
use tekpp_engine::{EngineStatus, Job, Operation, PowerRef};

use crate::context::KppContext;
use crate::error::status_to_error;
use crate::transform::KppTfm;

/// Marks a transform as having a request in flight; cleared on drop
#[derive(Debug)]
pub(crate) struct InFlight {
    flag: Arc<AtomicBool>,
}

impl InFlight {
    pub(crate) fn claim(flag: &Arc<AtomicBool>, context: &'static str) -> ApiResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::Busy { context })?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub(crate) fn poisoned(operation: &'static str) -> ApiError {
    status_to_error(EngineStatus::Poisoned, operation)
}

/// Run `f` on the locked context of `ctx`
pub(crate) fn with_context<T>(
    ctx: &Mutex<KppContext>,
    operation: &'static str,
    f: impl FnOnce(&mut KppContext) -> ApiResult<T>,
) -> ApiResult<T> {
    let mut guard = ctx.lock().map_err(|_| poisoned(operation))?;
    f(&mut guard)
}

/// Completion step of a pipeline: export results into the request
pub(crate) type Finish =
    Box<dyn FnOnce(&mut KppContext, Operation, &mut KppRequest) -> ApiResult<usize> + Send>;

/// Take power, claim a queue slot and hand `op` to the engine
///
/// Any failure here is synchronous: guards are released, `op` is dropped
/// and the request comes back untouched inside [`Rejected`].
pub(crate) fn launch(
    tfm: &KppTfm,
    req: KppRequest,
    inflight: InFlight,
    op: Operation,
    operation: &'static str,
    finish: Finish,
) -> Submission {
    let power = match PowerRef::acquire(tfm.power()) {
        Ok(power) => power,
        Err(status) => return Err(Rejected::new(status_to_error(status, operation), req)),
    };
    let slot = match tfm.engine().reserve() {
        Ok(slot) => slot,
        Err(status) => {
            drop(power);
            log::debug!("{}: submission refused: {}", operation, status);
            return Err(Rejected::new(status_to_error(status, operation), req));
        }
    };

    let (completer, pending) = pending();
    let ctx = Arc::clone(tfm.context());
    let job = Job::new(op, move |status, op| {
        let mut req = req;
        let result = if status.is_success() {
            match ctx.lock() {
                Ok(mut guard) => finish(&mut *guard, op, &mut req),
                Err(_) => Err(poisoned(operation)),
            }
        } else {
            drop(op);
            Err(status_to_error(status, operation))
        };
        drop(ctx);
        drop(power);
        drop(inflight);
        match &result {
            Ok(written) => log::trace!("{}: completed, {} bytes", operation, written),
            Err(err) => log::debug!("{}: failed: {}", operation, err),
        }
        completer.complete(req, result);
    });
    slot.submit(job);
    Ok(pending)
}

/// A completion handed an operation of the wrong kind
pub(crate) fn mismatched(operation: &'static str) -> ApiError {
    status_to_error(EngineStatus::Generic, operation)
}
