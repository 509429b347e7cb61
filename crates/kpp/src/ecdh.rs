//! ECDH request pipeline
//!
//! Public points cross the driver boundary as `X || Y`; the `0x04` tag is
//! added on import and stripped on export.

use tekpp_api::error::{Error as ApiError, Result as ApiResult};
use tekpp_api::{KppRequest, Rejected, Submission};
use tekpp_common::SecretVec;
use tekpp_engine::{EcdhComputeShared, EcdhGenPublic, Engine, EngineStatus, Operation};
use tekpp_internal::constant_time::ct_is_zero;
use tekpp_params::traditional::ecdh::UNCOMPRESSED_POINT_TAG;

use crate::context::{EcdhState, KppContext};
use crate::error::status_to_error;
use crate::request::{launch, mismatched, with_context, InFlight};
use crate::transform::KppTfm;

const GENERATE: &str = "ecdh generate_public_key";
const COMPUTE: &str = "ecdh compute_shared_secret";

fn ecdh_state<'a>(ctx: &'a mut KppContext, operation: &'static str) -> ApiResult<&'a mut EcdhState> {
    match ctx {
        KppContext::Ecdh(state) if state.keyed => Ok(state),
        KppContext::Ecdh(_) => Err(ApiError::MissingSecret { context: operation }),
        KppContext::Dh(_) => Err(mismatched(operation)),
    }
}

fn gen_public_op(state: &EcdhState, engine: &Engine) -> ApiResult<EcdhGenPublic> {
    let err = |status: EngineStatus| status_to_error(status, GENERATE);
    Ok(EcdhGenPublic {
        group: state.group.duplicate().map_err(err)?,
        d: state.d.duplicate().map_err(err)?,
        q: engine.point_alloc().map_err(err)?,
    })
}

/// Submit ECDH public-key generation for `tfm`
pub(crate) fn generate_public_key(tfm: &KppTfm, req: KppRequest) -> Submission {
    let inflight = match InFlight::claim(tfm.busy(), GENERATE) {
        Ok(guard) => guard,
        Err(err) => return Err(Rejected::new(err, req)),
    };
    let prepared = with_context(tfm.context(), GENERATE, |ctx| {
        let state = ecdh_state(ctx, GENERATE)?;
        Ok((gen_public_op(state, tfm.engine())?, state.curve))
    });
    let (op, curve) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return Err(Rejected::new(err, req)),
    };

    launch(
        tfm,
        req,
        inflight,
        Operation::EcdhMakePublic(op),
        GENERATE,
        Box::new(move |ctx: &mut KppContext, op: Operation, req: &mut KppRequest| {
            let Operation::EcdhMakePublic(op) = op else {
                return Err(mismatched(GENERATE));
            };
            let state = ecdh_state(ctx, GENERATE)?;
            let err = |status: EngineStatus| status_to_error(status, GENERATE);

            state.q.copy_from(&op.q).map_err(err)?;
            if state.privkey_sz == 0 {
                state.d.copy_from(&op.d).map_err(err)?;
                state.privkey_sz = op.d.byte_len().map_err(err)?;
            }

            let coords = curve.public_key_size();
            let mut tagged = SecretVec::zeroed(coords + 1);
            let written = state.q.export(tagged.as_mut_slice()).map_err(err)?;
            tekpp_api::error::validation::length(GENERATE, written, coords + 1)?;
            let point = &tagged.as_slice()[1..];
            if ct_is_zero(point) {
                return Err(status_to_error(EngineStatus::Generic, GENERATE));
            }
            let copied = req.dst.copy_from_buffer(point);
            tekpp_api::error::validation::length(GENERATE, copied, coords)?;
            req.dst_len = copied;
            Ok(copied)
        }),
    )
}

fn compute_shared_op(
    state: &EcdhState,
    engine: &Engine,
    req: &KppRequest,
) -> ApiResult<EcdhComputeShared> {
    let err = |status: EngineStatus| status_to_error(status, COMPUTE);
    if state.d.is_zero().map_err(err)? {
        return Err(ApiError::MissingSecret { context: COMPUTE });
    }

    let coords = state.curve.public_key_size();
    let mut pubkey = vec![0u8; coords + 1];
    pubkey[0] = UNCOMPRESSED_POINT_TAG;
    let copied = req
        .src
        .as_ref()
        .map_or(0, |src| src.copy_to_buffer(&mut pubkey[1..]));
    if req.src_len != coords || copied != coords {
        return Err(ApiError::InvalidKeyFormat {
            context: COMPUTE,
            reason: "peer point length does not match curve",
        });
    }

    let mut other_q = engine.point_alloc().map_err(err)?;
    other_q
        .import(&state.group, &pubkey)
        .map_err(|status| match status {
            EngineStatus::BadInputData => ApiError::InvalidKeyFormat {
                context: COMPUTE,
                reason: "peer point is not a valid curve point",
            },
            other => status_to_error(other, COMPUTE),
        })?;

    Ok(EcdhComputeShared {
        group: state.group.duplicate().map_err(err)?,
        d: state.d.duplicate().map_err(err)?,
        other_q,
        k: engine.bn_alloc().map_err(err)?,
    })
}

/// Submit ECDH shared-secret computation for `tfm`
pub(crate) fn compute_shared_secret(tfm: &KppTfm, req: KppRequest) -> Submission {
    let inflight = match InFlight::claim(tfm.busy(), COMPUTE) {
        Ok(guard) => guard,
        Err(err) => return Err(Rejected::new(err, req)),
    };
    let prepared = with_context(tfm.context(), COMPUTE, |ctx| {
        let state = ecdh_state(ctx, COMPUTE)?;
        compute_shared_op(state, tfm.engine(), &req)
    });
    let op = match prepared {
        Ok(op) => op,
        Err(err) => return Err(Rejected::new(err, req)),
    };

    launch(
        tfm,
        req,
        inflight,
        Operation::EcdhComputeShared(op),
        COMPUTE,
        Box::new(move |ctx: &mut KppContext, op: Operation, req: &mut KppRequest| {
            let Operation::EcdhComputeShared(op) = op else {
                return Err(mismatched(COMPUTE));
            };
            let state = ecdh_state(ctx, COMPUTE)?;
            let err = |status: EngineStatus| status_to_error(status, COMPUTE);
            state.other_q.copy_from(&op.other_q).map_err(err)?;
            state.k.copy_from(&op.k).map_err(err)?;

            let len = state.k.byte_len().map_err(err)?;
            let mut out = SecretVec::zeroed(len);
            state.k.export(out.as_mut_slice()).map_err(err)?;
            let copied = req.dst.copy_from_buffer(out.as_slice());
            if copied != len {
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
