//! DH request pipeline

use tekpp_api::error::{Error as ApiError, Result as ApiResult};
use tekpp_api::{KppRequest, Rejected, Submission};
use tekpp_common::SecretVec;
use tekpp_engine::{DhmComputeShared, DhmMakePublic, Engine, EngineStatus, Operation};
use tekpp_internal::constant_time::ct_is_zero;

use crate::context::{DhState, KppContext};
use crate::error::status_to_error;
use crate::request::{launch, mismatched, with_context, InFlight};
use crate::transform::KppTfm;

const GENERATE: &str = "dh generate_public_key";
const COMPUTE: &str = "dh compute_shared_secret";

fn dh_state<'a>(ctx: &'a mut KppContext, operation: &'static str) -> ApiResult<&'a mut DhState> {
    match ctx {
        KppContext::Dh(state) if state.p_size != 0 => Ok(state),
        KppContext::Dh(_) => Err(ApiError::MissingSecret { context: operation }),
        KppContext::Ecdh(_) => Err(mismatched(operation)),
    }
}

fn make_public_op(state: &DhState, engine: &Engine) -> ApiResult<(DhmMakePublic, usize)> {
    let err = |status: EngineStatus| status_to_error(status, GENERATE);
    let op = DhmMakePublic {
        p: state.p.duplicate().map_err(err)?,
        g: state.g.duplicate().map_err(err)?,
        x: state.x.duplicate().map_err(err)?,
        gx: engine.bn_alloc().map_err(err)?,
    };
    Ok((op, state.p_size))
}

/// Submit DH public-key generation for `tfm`
pub(crate) fn generate_public_key(tfm: &KppTfm, req: KppRequest) -> Submission {
    let inflight = match InFlight::claim(tfm.busy(), GENERATE) {
        Ok(guard) => guard,
        Err(err) => return Err(Rejected::new(err, req)),
    };
    let prepared = with_context(tfm.context(), GENERATE, |ctx| {
        let state = dh_state(ctx, GENERATE)?;
        make_public_op(state, tfm.engine())
    });
    let (op, p_size) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return Err(Rejected::new(err, req)),
    };

    launch(
        tfm,
        req,
        inflight,
        Operation::DhMakePublic(op),
        GENERATE,
        Box::new(move |ctx: &mut KppContext, op: Operation, req: &mut KppRequest| {
            let Operation::DhMakePublic(op) = op else {
                return Err(mismatched(GENERATE));
            };
            let state = dh_state(ctx, GENERATE)?;
            let err = |status: EngineStatus| status_to_error(status, GENERATE);

            if state.x_size == 0 {
                state.x.copy_from(&op.x).map_err(err)?;
                state.x_size = op.x.byte_len().map_err(err)?;
            }
            state.gx.copy_from(&op.gx).map_err(err)?;

            let mut out = SecretVec::zeroed(p_size);
            state.gx.export(out.as_mut_slice()).map_err(|_| ApiError::BadKeyLength {
                context: GENERATE,
                expected: p_size,
                actual: state.gx.byte_len().unwrap_or(0),
            })?;
            if ct_is_zero(out.as_slice()) {
                return Err(status_to_error(EngineStatus::Generic, GENERATE));
            }
            let copied = req.dst.copy_from_buffer(out.as_slice());
            tekpp_api::error::validation::length(GENERATE, copied, p_size)?;
            req.dst_len = copied;
            Ok(copied)
        }),
    )
}

fn compute_shared_op(
    state: &DhState,
    engine: &Engine,
    req: &KppRequest,
) -> ApiResult<(DhmComputeShared, usize)> {
    let err = |status: EngineStatus| status_to_error(status, COMPUTE);
    if state.x.is_zero().map_err(err)? {
        return Err(ApiError::MissingSecret { context: COMPUTE });
    }
    let p_size = state.p_size;

    // Scratch values first, so allocation failure aborts before power is taken
    let px = engine.bn_alloc().map_err(err)?;
    let vi = engine.bn_alloc().map_err(err)?;
    let vf = engine.bn_alloc().map_err(err)?;

    let mut peer = SecretVec::zeroed(p_size);
    let copied = req
        .src
        .as_ref()
        .map_or(0, |src| src.copy_to_buffer(peer.as_mut_slice()));
    if req.src_len != p_size || copied != p_size {
        return Err(ApiError::InvalidKeyFormat {
            context: COMPUTE,
            reason: "peer public value length does not match modulus",
        });
    }
    let mut gy = engine.bn_alloc().map_err(err)?;
    gy.import_bounded(peer.as_slice(), p_size).map_err(err)?;

    let op = DhmComputeShared {
        p: state.p.duplicate().map_err(err)?,
        x: state.x.duplicate().map_err(err)?,
        gy,
        k: engine.bn_alloc().map_err(err)?,
        px,
        vi,
        vf,
    };
    Ok((op, p_size))
}

/// Submit DH shared-secret computation for `tfm`
pub(crate) fn compute_shared_secret(tfm: &KppTfm, req: KppRequest) -> Submission {
    let inflight = match InFlight::claim(tfm.busy(), COMPUTE) {
        Ok(guard) => guard,
        Err(err) => return Err(Rejected::new(err, req)),
    };
    let prepared = with_context(tfm.context(), COMPUTE, |ctx| {
        let state = dh_state(ctx, COMPUTE)?;
        compute_shared_op(state, tfm.engine(), &req)
    });
    let (op, p_size) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return Err(Rejected::new(err, req)),
    };

    launch(
        tfm,
        req,
        inflight,
        Operation::DhComputeShared(op),
        COMPUTE,
        Box::new(move |ctx: &mut KppContext, op: Operation, req: &mut KppRequest| {
            let Operation::DhComputeShared(mut op) = op else {
                return Err(mismatched(COMPUTE));
            };
            op.px.free();
            op.vi.free();
            op.vf.free();

            let state = dh_state(ctx, COMPUTE)?;
            let err = |status: EngineStatus| status_to_error(status, COMPUTE);
            state.gy.copy_from(&op.gy).map_err(err)?;
            state.k.copy_from(&op.k).map_err(err)?;

            let mut out = SecretVec::zeroed(p_size);
            state.k.export(out.as_mut_slice()).map_err(|_| ApiError::BadKeyLength {
                context: COMPUTE,
                expected: p_size,
                actual: state.k.byte_len().unwrap_or(0),
            })?;
            let copied = req.dst.copy_from_buffer(out.as_slice());
            if copied != p_size {
                return Err(ApiError::InvalidArgument {
                    context: COMPUTE,
                    reason: "destination shorter than the shared secret",
                });
            }
            req.dst_len = copied;
            Ok(copied)
        }),
    )
}
