//! Finite-field Diffie-Hellman primitives
//!
//! Both primitives work on owned big numbers carried in the operation
//! descriptor and write their result back into it. The shared-secret
//! computation blinds the peer value before exponentiation:
//!
//! ```text
//! Vi random in [2, P - 2]
//! Vf = (Vi^X)^-1 mod P
//! K  = ((GY * Vi)^X * Vf) mod P
//! ```
//!
//! `pX` records the exponent the `(Vi, Vf)` pair was derived for. When the
//! same exponent is used again the pair is refreshed by squaring instead of
//! being redrawn.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use zeroize::Zeroize;

use crate::bn::Mpi;
use crate::drbg::Drbg;
use crate::status::{EngineStatus, Result};

/// Attempts at drawing a value in `[2, P - 2]` before giving up
const MAX_DRAWS: usize = 32;

/// Compute `GX = G^X mod P`, generating `X` first if it is zero
#[derive(Debug)]
pub struct DhmMakePublic {
    /// Prime modulus
    pub p: Mpi,
    /// Generator
    pub g: Mpi,
    /// Private exponent; zero requests generation
    pub x: Mpi,
    /// Public value out
    pub gx: Mpi,
}

/// Compute `K = GY^X mod P` with base blinding
#[derive(Debug)]
pub struct DhmComputeShared {
    /// Prime modulus
    pub p: Mpi,
    /// Private exponent
    pub x: Mpi,
    /// Peer public value
    pub gy: Mpi,
    /// Shared secret out
    pub k: Mpi,
    /// Exponent the blinding pair belongs to
    pub px: Mpi,
    /// Blinding value
    pub vi: Mpi,
    /// Unblinding value
    pub vf: Mpi,
}

fn modulus(p: &Mpi) -> Result<BigUint> {
    let p = p.to_biguint()?;
    // [2, P - 2] must be non-empty and P odd
    if p < BigUint::from(5u8) || !p.bit(0) {
        return Err(EngineStatus::BadInputData);
    }
    Ok(p)
}

/// `1 < v < P - 1`
fn in_open_range(v: &BigUint, p: &BigUint) -> bool {
    let one = BigUint::one();
    *v > one && *v < p - &one
}

/// Uniform value in `[2, P - 2]` by rejection sampling
fn random_in_range(p: &BigUint, rng: &mut Drbg) -> Result<BigUint> {
    let bits = p.bits() as usize;
    let len = bits.div_ceil(8);
    let top_mask = 0xFFu8 >> (len * 8 - bits);
    let upper = p - 2u8;
    let mut buf = vec![0u8; len];
    for _ in 0..MAX_DRAWS {
        rng.fill(&mut buf)?;
        buf[0] &= top_mask;
        let v = BigUint::from_bytes_be(&buf);
        if v >= BigUint::from(2u8) && v <= upper {
            buf.zeroize();
            return Ok(v);
        }
    }
    buf.zeroize();
    log::warn!("dhm: no value in range after {} draws", MAX_DRAWS);
    Err(EngineStatus::GenRandom)
}

/// Run [`DhmMakePublic`]
pub fn make_public(op: &mut DhmMakePublic, rng: &mut Drbg) -> Result<()> {
    let p = modulus(&op.p)?;
    let g = op.g.to_biguint()?;
    if !in_open_range(&g, &p) {
        return Err(EngineStatus::BadInputData);
    }

    let x = if op.x.is_zero()? {
        let x = random_in_range(&p, rng)?;
        op.x.set_biguint(&x)?;
        log::trace!("dhm: generated {}-byte exponent", op.x.byte_len()?);
        x
    } else {
        let x = op.x.to_biguint()?;
        if x < BigUint::from(2u8) || x > &p - 2u8 {
            return Err(EngineStatus::BadInputData);
        }
        x
    };

    let gx = g.modpow(&x, &p);
    if !in_open_range(&gx, &p) {
        return Err(EngineStatus::BadInputData);
    }
    op.gx.set_biguint(&gx)
}

fn refresh_blinding(op: &mut DhmComputeShared, x: &BigUint, p: &BigUint, rng: &mut Drbg) -> Result<()> {
    if op.px.cmp_mpi(&op.x)?.is_eq() && !op.vi.is_zero()? {
        let vi = op.vi.to_biguint()?;
        let vf = op.vf.to_biguint()?;
        op.vi.set_biguint(&(&vi * &vi % p))?;
        op.vf.set_biguint(&(&vf * &vf % p))?;
        return Ok(());
    }

    let vi = random_in_range(p, rng)?;
    // Fermat inverse, P is prime
    let vf = vi.modpow(x, p).modpow(&(p - 2u8), p);
    if vf.is_zero() {
        return Err(EngineStatus::BadInputData);
    }
    op.vi.set_biguint(&vi)?;
    op.vf.set_biguint(&vf)?;
    op.px.copy_from(&op.x)
}

/// Run [`DhmComputeShared`]
pub fn compute_shared(op: &mut DhmComputeShared, rng: &mut Drbg) -> Result<()> {
    let p = modulus(&op.p)?;
    let gy = op.gy.to_biguint()?;
    if !in_open_range(&gy, &p) {
        return Err(EngineStatus::BadInputData);
    }
    if op.x.is_zero()? {
        return Err(EngineStatus::BadParams);
    }
    let x = op.x.to_biguint()?;

    refresh_blinding(op, &x, &p, rng)?;
    let vi = op.vi.to_biguint()?;
    let vf = op.vf.to_biguint()?;

    let blinded = (&gy * &vi) % &p;
    let k = (blinded.modpow(&x, &p) * &vf) % &p;
    op.k.set_biguint(&k)
}
