//! Per-transform key-exchange context
//!
//! A [`KppContext`] owns every big number and point one transform needs. All
//! handles are allocated up front by [`KppContext::init`]; `set_secret`
//! replaces key material without allocating into the live handles, so a
//! rejected secret leaves the context exactly as it was.

use core::cmp::Ordering;
use core::mem;

use tekpp_api::error::{validation, Error as ApiError, Result as ApiResult};
use tekpp_engine::{EcpGroup, EcpPoint, Engine, EngineStatus, Mpi};
use tekpp_params::traditional::ecdh::ECC_CURVE_UNSET;
use tekpp_params::CurveId;

use crate::error::status_to_error;
use crate::secret::{DhSecret, EcdhSecret};

/// Which key agreement a context serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Finite-field Diffie-Hellman
    Dh,
    /// ECDH bound to one curve
    Ecdh(CurveId),
}

impl Variant {
    /// Whether this is the DH variant
    pub const fn is_dh(self) -> bool {
        matches!(self, Variant::Dh)
    }
}

/// DH key material
#[derive(Debug)]
pub struct DhState {
    pub(crate) p: Mpi,
    pub(crate) g: Mpi,
    pub(crate) x: Mpi,
    pub(crate) gx: Mpi,
    pub(crate) gy: Mpi,
    pub(crate) k: Mpi,
    pub(crate) p_size: usize,
    pub(crate) x_size: usize,
}

/// ECDH key material
#[derive(Debug)]
pub struct EcdhState {
    pub(crate) curve: CurveId,
    pub(crate) group: EcpGroup,
    pub(crate) d: Mpi,
    pub(crate) q: EcpPoint,
    pub(crate) other_q: EcpPoint,
    pub(crate) k: Mpi,
    pub(crate) privkey_sz: usize,
    pub(crate) keyed: bool,
}

/// Key-exchange context, one per transform
#[derive(Debug)]
pub enum KppContext {
    Dh(DhState),
    Ecdh(EcdhState),
}

fn engine_err(context: &'static str) -> impl Fn(EngineStatus) -> ApiError {
    move |status| status_to_error(status, context)
}

impl DhState {
    fn alloc(engine: &Engine) -> Result<Self, EngineStatus> {
        Ok(Self {
            p: engine.bn_alloc()?,
            g: engine.bn_alloc()?,
            x: engine.bn_alloc()?,
            gx: engine.bn_alloc()?,
            gy: engine.bn_alloc()?,
            k: engine.bn_alloc()?,
            p_size: 0,
            x_size: 0,
        })
    }

    /// Byte length of the modulus, zero before a secret is set
    pub fn p_size(&self) -> usize {
        self.p_size
    }

    /// Byte length of the private exponent, zero while it is to be generated
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    fn set_secret(&mut self, secret: &[u8]) -> ApiResult<()> {
        const CTX: &str = "dh set_secret";
        let blob = DhSecret::decode(secret)?;
        validation::key(blob.p[0] != 0, CTX, "modulus has leading zero bytes")?;
        validation::key(blob.p[blob.p.len() - 1] & 1 == 1, CTX, "modulus is even")?;

        let err = engine_err(CTX);
        let meter = self.p.meter();
        let mut p = Mpi::alloc(meter).map_err(&err)?;
        let mut g = Mpi::alloc(meter).map_err(&err)?;
        let mut x = Mpi::alloc(meter).map_err(&err)?;
        let mut top = Mpi::alloc(meter).map_err(&err)?;
        p.import(blob.p).map_err(&err)?;
        g.import_bounded(blob.g, blob.p.len()).map_err(&err)?;
        if blob.key.is_empty() {
            x.import_scalar(0).map_err(&err)?;
        } else {
            x.import_bounded(blob.key, blob.p.len()).map_err(&err)?;
        }

        // P is odd, so P - 1 only clears the low bit
        let mut p_minus_one = blob.p.to_vec();
        if let Some(last) = p_minus_one.last_mut() {
            *last &= 0xFE;
        }
        top.import(&p_minus_one).map_err(&err)?;

        validation::key(g.bit_len().map_err(&err)? > 1, CTX, "generator below 2")?;
        validation::key(
            g.cmp_mpi(&top).map_err(&err)? == Ordering::Less,
            CTX,
            "generator not below modulus minus one",
        )?;
        if !blob.key.is_empty() {
            validation::key(x.bit_len().map_err(&err)? > 1, CTX, "private exponent below 2")?;
            validation::key(
                x.cmp_mpi(&top).map_err(&err)? == Ordering::Less,
                CTX,
                "private exponent not below modulus minus one",
            )?;
        }

        // Outputs derived from the previous key are stale
        self.gx.import_scalar(0).map_err(&err)?;
        self.gy.import_scalar(0).map_err(&err)?;
        self.k.import_scalar(0).map_err(&err)?;
        mem::swap(&mut self.p, &mut p);
        mem::swap(&mut self.g, &mut g);
        mem::swap(&mut self.x, &mut x);
        self.p_size = blob.p.len();
        self.x_size = blob.key.len();
        log::debug!(
            "dh: secret set, p_size {}, x_size {}",
            self.p_size,
            self.x_size
        );
        Ok(())
    }

    fn release(&mut self) {
        for v in [
            &mut self.p,
            &mut self.g,
            &mut self.x,
            &mut self.gx,
            &mut self.gy,
            &mut self.k,
        ] {
            v.free();
        }
        self.p_size = 0;
        self.x_size = 0;
    }
}

/// Resolve the curve named in an ECDH secret against the transform's curve
fn resolve_curve(bound: CurveId, curve_id: u16) -> ApiResult<CurveId> {
    if curve_id == ECC_CURVE_UNSET {
        return Ok(bound);
    }
    match CurveId::from_kernel_id(curve_id) {
        Some(curve) if curve == bound => Ok(curve),
        _ => Err(ApiError::UnsupportedCurve { curve_id }),
    }
}

impl EcdhState {
    fn alloc(engine: &Engine, curve: CurveId) -> Result<Self, EngineStatus> {
        Ok(Self {
            curve,
            group: engine.group_alloc()?,
            d: engine.bn_alloc()?,
            q: engine.point_alloc()?,
            other_q: engine.point_alloc()?,
            k: engine.bn_alloc()?,
            privkey_sz: 0,
            keyed: false,
        })
    }

    /// Curve the context is bound to
    pub fn curve(&self) -> CurveId {
        self.curve
    }

    /// Byte length of the private scalar, zero while it is to be generated
    pub fn privkey_sz(&self) -> usize {
        self.privkey_sz
    }

    fn set_secret(&mut self, secret: &[u8]) -> ApiResult<()> {
        const CTX: &str = "ecdh set_secret";
        let blob = EcdhSecret::decode(secret)?;
        let curve = resolve_curve(self.curve, blob.curve_id)?;
        validation::max_length(CTX, blob.key.len(), curve.field_bytes())?;

        let err = engine_err(CTX);
        let meter = self.d.meter();
        let mut d = Mpi::alloc(meter).map_err(&err)?;
        if blob.key.is_empty() {
            d.import_scalar(0).map_err(&err)?;
        } else {
            d.import_bounded(blob.key, curve.field_bytes()).map_err(&err)?;
            let mut n = Mpi::alloc(meter).map_err(&err)?;
            n.import(curve.domain().n).map_err(&err)?;
            validation::key(!d.is_zero().map_err(&err)?, CTX, "private key is zero")?;
            validation::key(
                d.cmp_mpi(&n).map_err(&err)? == Ordering::Less,
                CTX,
                "private key not below group order",
            )?;
        }

        self.group.load(curve).map_err(&err)?;
        self.q.reset().map_err(&err)?;
        self.other_q.reset().map_err(&err)?;
        self.k.import_scalar(0).map_err(&err)?;
        mem::swap(&mut self.d, &mut d);
        self.privkey_sz = blob.key.len();
        self.keyed = true;
        log::debug!(
            "ecdh: secret set on {}, privkey_sz {}",
            curve.name(),
            self.privkey_sz
        );
        Ok(())
    }

    fn release(&mut self) {
        self.group.free();
        self.d.free();
        self.q.free();
        self.other_q.free();
        self.k.free();
        self.privkey_sz = 0;
        self.keyed = false;
    }
}

impl KppContext {
    /// Allocate every handle `variant` needs
    ///
    /// On failure the handles allocated so far are released and
    /// [`ApiError::AllocationError`] is returned.
    pub fn init(variant: Variant, engine: &Engine) -> ApiResult<Self> {
        let ctx = match variant {
            Variant::Dh => DhState::alloc(engine).map(KppContext::Dh),
            Variant::Ecdh(curve) => EcdhState::alloc(engine, curve).map(KppContext::Ecdh),
        };
        ctx.map_err(|status| {
            log::debug!("kpp: context init failed: {}", status);
            status_to_error(status, "kpp context init")
        })
    }

    /// The variant this context was created for
    pub fn variant(&self) -> Variant {
        match self {
            KppContext::Dh(_) => Variant::Dh,
            KppContext::Ecdh(state) => Variant::Ecdh(state.curve),
        }
    }

    /// Whether this is a DH context
    pub fn is_dh(&self) -> bool {
        self.variant().is_dh()
    }

    /// Install an encoded secret; on error the context is unchanged
    pub fn set_secret(&mut self, secret: &[u8]) -> ApiResult<()> {
        match self {
            KppContext::Dh(state) => state.set_secret(secret),
            KppContext::Ecdh(state) => state.set_secret(secret),
        }
    }

    /// Whether a secret has been installed
    pub fn has_secret(&self) -> bool {
        match self {
            KppContext::Dh(state) => state.p_size != 0,
            KppContext::Ecdh(state) => state.keyed,
        }
    }

    /// Size of the public value (and of the DH shared secret)
    pub fn max_size(&self) -> usize {
        match self {
            KppContext::Dh(state) => state.p_size,
            KppContext::Ecdh(state) => state.curve.public_key_size(),
        }
    }

    /// Wipe and free every handle. Calling again is a no-op.
    pub fn release(&mut self) {
        match self {
            KppContext::Dh(state) => state.release(),
            KppContext::Ecdh(state) => state.release(),
        }
    }
}

impl Drop for KppContext {
    fn drop(&mut self) {
        self.release();
    }
}
