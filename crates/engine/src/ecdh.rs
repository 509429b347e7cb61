//! Elliptic-curve Diffie-Hellman primitives

use tekpp_common::SecretVec;

use crate::bn::Mpi;
use crate::curve;
use crate::drbg::Drbg;
use crate::ecp::{EcpGroup, EcpPoint};
use crate::status::{EngineStatus, Result};

/// Compute `Q = d * G`, generating `d` first if it is zero
#[derive(Debug)]
pub struct EcdhGenPublic {
    /// Curve the key pair lives on
    pub group: EcpGroup,
    /// Private scalar; zero requests generation
    pub d: Mpi,
    /// Public point out
    pub q: EcpPoint,
}

/// Compute the X coordinate of `d * other_Q`
#[derive(Debug)]
pub struct EcdhComputeShared {
    /// Curve both points live on
    pub group: EcpGroup,
    /// Private scalar
    pub d: Mpi,
    /// Peer public point, validated on import
    pub other_q: EcpPoint,
    /// Shared secret out
    pub k: Mpi,
}

fn scalar_bytes(d: &Mpi, field_bytes: usize) -> Result<SecretVec> {
    let mut buf = SecretVec::zeroed(field_bytes);
    d.export(buf.as_mut_slice())
        .map_err(|_| EngineStatus::BadInputData)?;
    Ok(buf)
}

/// Run [`EcdhGenPublic`]
pub fn gen_public(op: &mut EcdhGenPublic, rng: &mut Drbg) -> Result<()> {
    let curve = op.group.loaded()?;
    if op.d.is_zero()? {
        rng.reseed_if_due()?;
        let d = curve::gen_scalar(curve, rng);
        op.d.import(d.as_slice())?;
        log::trace!("ecdh: generated {}-byte scalar on {}", op.d.byte_len()?, curve.name());
    } else if op.d.cmp_mpi(op.group.order())?.is_ge() {
        return Err(EngineStatus::BadInputData);
    }

    let d = scalar_bytes(&op.d, op.group.field_bytes()?)?;
    let q = curve::base_mul(curve, d.as_slice())?;
    op.q.set_tagged(q)
}

/// Run [`EcdhComputeShared`]
pub fn compute_shared(op: &mut EcdhComputeShared, _rng: &mut Drbg) -> Result<()> {
    let curve = op.group.loaded()?;
    if op.d.is_zero()? {
        return Err(EngineStatus::BadParams);
    }
    let d = scalar_bytes(&op.d, op.group.field_bytes()?)?;
    let x = curve::ecdh_x(curve, d.as_slice(), op.other_q.tagged()?)?;
    op.k.import(x.as_slice())
}
