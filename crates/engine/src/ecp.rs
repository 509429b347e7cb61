//! Elliptic-curve groups and points
//!
//! An [`EcpGroup`] holds the domain parameters of one of the supported NIST
//! curves as big numbers. An [`EcpPoint`] holds an affine point in its tagged
//! uncompressed encoding; a point is only ever stored after validation against
//! its group, so every stored point is on the curve and not the identity.

use core::fmt;
use std::sync::Arc;

use tekpp_common::SecretVec;
use tekpp_params::CurveId;
use zeroize::Zeroize;

use crate::bn::Mpi;
use crate::curve;
use crate::meter::ResourceMeter;
use crate::status::{EngineStatus, Result};

/// Curve domain parameters
#[derive(Debug)]
pub struct EcpGroup {
    curve: Option<CurveId>,
    p: Mpi,
    n: Mpi,
    gx: Mpi,
    gy: Mpi,
}

impl EcpGroup {
    /// Allocate an unloaded group
    ///
    /// If any of the parameter handles cannot be allocated, the ones already
    /// allocated are released before the error is returned.
    pub fn alloc(meter: &Arc<ResourceMeter>) -> Result<Self> {
        let p = Mpi::alloc(meter)?;
        let n = Mpi::alloc(meter)?;
        let gx = Mpi::alloc(meter)?;
        let gy = Mpi::alloc(meter)?;
        Ok(Self {
            curve: None,
            p,
            n,
            gx,
            gy,
        })
    }

    /// Load the domain parameters of `curve`
    pub fn load(&mut self, curve: CurveId) -> Result<()> {
        let domain = curve.domain();
        self.p.import(domain.p)?;
        self.n.import(domain.n)?;
        self.gx.import(domain.gx)?;
        self.gy.import(domain.gy)?;
        self.curve = Some(curve);
        Ok(())
    }

    /// The loaded curve, if any
    pub fn curve(&self) -> Option<CurveId> {
        self.curve
    }

    pub(crate) fn loaded(&self) -> Result<CurveId> {
        self.curve.ok_or(EngineStatus::BadParams)
    }

    /// Bit length of the field prime
    pub fn field_bits(&self) -> Result<usize> {
        let bits = self.p.bit_len()?;
        if bits == 0 {
            return Err(EngineStatus::BadParams);
        }
        Ok(bits)
    }

    /// Byte length of one coordinate
    pub fn field_bytes(&self) -> Result<usize> {
        Ok(self.field_bits()?.div_ceil(8))
    }

    /// Group order
    pub fn order(&self) -> &Mpi {
        &self.n
    }

    /// Allocate a second group holding the same parameters
    pub fn duplicate(&self) -> Result<Self> {
        let mut dup = Self::alloc(self.p.meter())?;
        if let Some(curve) = self.curve {
            dup.load(curve)?;
        }
        Ok(dup)
    }

    /// Wipe and release all parameter handles
    pub fn free(&mut self) {
        self.curve = None;
        self.p.free();
        self.n.free();
        self.gx.free();
        self.gy.free();
    }
}

/// Affine curve point stored as `0x04 || X || Y`
pub struct EcpPoint {
    tagged: Option<SecretVec>,
    meter: Arc<ResourceMeter>,
}

impl EcpPoint {
    /// Allocate an unset point
    pub fn alloc(meter: &Arc<ResourceMeter>) -> Result<Self> {
        meter.charge()?;
        Ok(Self {
            tagged: Some(SecretVec::default()),
            meter: Arc::clone(meter),
        })
    }

    fn slot(&self) -> Result<&SecretVec> {
        self.tagged.as_ref().ok_or(EngineStatus::BadParams)
    }

    fn slot_mut(&mut self) -> Result<&mut SecretVec> {
        self.tagged.as_mut().ok_or(EngineStatus::BadParams)
    }

    /// Whether the point holds a value
    pub fn is_set(&self) -> bool {
        self.tagged.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Import a tagged uncompressed encoding, validating it against `group`
    ///
    /// Off-curve points, the identity and encodings of the wrong length are
    /// rejected with [`EngineStatus::BadInputData`]; the point is unchanged.
    pub fn import(&mut self, group: &EcpGroup, tagged: &[u8]) -> Result<()> {
        let curve = group.loaded()?;
        curve::validate_point(curve, tagged)?;
        *self.slot_mut()? = SecretVec::from_slice(tagged);
        Ok(())
    }

    /// Export the tagged uncompressed encoding into the front of `out`
    ///
    /// Returns the number of bytes written.
    pub fn export(&self, out: &mut [u8]) -> Result<usize> {
        let tagged = self.slot()?;
        if tagged.is_empty() {
            return Err(EngineStatus::BadParams);
        }
        if out.len() < tagged.len() {
            return Err(EngineStatus::ShortBuffer);
        }
        out[..tagged.len()].copy_from_slice(tagged.as_slice());
        Ok(tagged.len())
    }

    /// Forget the stored value, keeping the handle
    pub fn reset(&mut self) -> Result<()> {
        *self.slot_mut()? = SecretVec::default();
        Ok(())
    }

    pub(crate) fn tagged(&self) -> Result<&[u8]> {
        let tagged = self.slot()?;
        if tagged.is_empty() {
            return Err(EngineStatus::BadParams);
        }
        Ok(tagged.as_slice())
    }

    pub(crate) fn set_tagged(&mut self, tagged: Vec<u8>) -> Result<()> {
        *self.slot_mut()? = SecretVec::from(tagged);
        Ok(())
    }

    /// Allocate a new point holding a copy of `self`
    pub fn duplicate(&self) -> Result<Self> {
        let src = self.slot()?.clone();
        let mut dup = Self::alloc(&self.meter)?;
        *dup.slot_mut()? = src;
        Ok(dup)
    }

    /// Copy the value of `other` into `self`
    pub fn copy_from(&mut self, other: &EcpPoint) -> Result<()> {
        let src = other.slot()?.clone();
        *self.slot_mut()? = src;
        Ok(())
    }

    /// Wipe and release the point. Calling again is a no-op.
    pub fn free(&mut self) {
        if let Some(mut tagged) = self.tagged.take() {
            tagged.zeroize();
            self.meter.refund();
        }
    }
}

impl Drop for EcpPoint {
    fn drop(&mut self) {
        self.free();
    }
}

impl fmt::Debug for EcpPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tagged {
            Some(t) if t.is_empty() => write!(f, "EcpPoint(unset)"),
            Some(t) => write!(f, "EcpPoint(bytes={})", t.len()),
            None => write!(f, "EcpPoint(freed)"),
        }
    }
}
