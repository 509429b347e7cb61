//! Arbitrary-precision unsigned integers owned by the engine
//!
//! An [`Mpi`] keeps its magnitude as minimal big-endian bytes in a zeroizing
//! buffer. Arithmetic converts to `num_bigint::BigUint` transiently. Freeing
//! wipes the magnitude, returns the handle to the meter and leaves the handle
//! empty, so a second free does nothing.

use core::cmp::Ordering;
use core::fmt;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::Zero;
use tekpp_common::SecretVec;
use zeroize::Zeroize;

use crate::meter::ResourceMeter;
use crate::status::{EngineStatus, Result};

/// Engine big-number handle
pub struct Mpi {
    mag: Option<SecretVec>,
    meter: Arc<ResourceMeter>,
}

impl Mpi {
    /// Allocate a handle holding zero
    pub fn alloc(meter: &Arc<ResourceMeter>) -> Result<Self> {
        meter.charge()?;
        Ok(Self {
            mag: Some(SecretVec::default()),
            meter: Arc::clone(meter),
        })
    }

    /// Allocate a new handle holding a copy of `self`
    pub fn duplicate(&self) -> Result<Self> {
        let mut dup = Self::alloc(&self.meter)?;
        dup.copy_from(self)?;
        Ok(dup)
    }

    /// The meter this handle is charged to
    pub fn meter(&self) -> &Arc<ResourceMeter> {
        &self.meter
    }

    /// Whether the handle has been freed
    pub fn is_freed(&self) -> bool {
        self.mag.is_none()
    }

    /// Wipe and release the handle. Calling again is a no-op.
    pub fn free(&mut self) {
        if let Some(mut mag) = self.mag.take() {
            mag.zeroize();
            self.meter.refund();
        }
    }

    fn mag(&self) -> Result<&SecretVec> {
        self.mag.as_ref().ok_or(EngineStatus::BadParams)
    }

    fn mag_mut(&mut self) -> Result<&mut SecretVec> {
        self.mag.as_mut().ok_or(EngineStatus::BadParams)
    }

    /// Import an unsigned big-endian value
    pub fn import(&mut self, bytes: &[u8]) -> Result<()> {
        let mag = self.mag_mut()?;
        *mag = SecretVec::from_slice(bytes);
        mag.strip_leading_zeros();
        Ok(())
    }

    /// Import an unsigned big-endian value that must fit in `max_len` bytes
    ///
    /// Leading zero bytes do not count against the bound; a value with more
    /// significant bytes is rejected, never truncated.
    pub fn import_bounded(&mut self, bytes: &[u8], max_len: usize) -> Result<()> {
        let significant = bytes.iter().skip_while(|b| **b == 0).count();
        if significant > max_len {
            return Err(EngineStatus::BadInputData);
        }
        self.import(bytes)
    }

    /// Import a small non-negative scalar
    pub fn import_scalar(&mut self, value: i32) -> Result<()> {
        let value = u32::try_from(value).map_err(|_| EngineStatus::BadParams)?;
        self.import(&value.to_be_bytes())
    }

    /// Copy the value of `other` into `self`
    pub fn copy_from(&mut self, other: &Mpi) -> Result<()> {
        let src = other.mag()?.clone();
        *self.mag_mut()? = src;
        Ok(())
    }

    /// Export as big-endian bytes, left-padded with zeros to `out.len()`
    pub fn export(&self, out: &mut [u8]) -> Result<()> {
        let mag = self.mag()?;
        if mag.len() > out.len() {
            return Err(EngineStatus::ShortBuffer);
        }
        let pad = out.len() - mag.len();
        out[..pad].fill(0);
        out[pad..].copy_from_slice(mag.as_slice());
        Ok(())
    }

    /// Minimal number of bytes needed to represent the value (0 for zero)
    pub fn byte_len(&self) -> Result<usize> {
        Ok(self.mag()?.len())
    }

    /// Number of significant bits (0 for zero)
    pub fn bit_len(&self) -> Result<usize> {
        let mag = self.mag()?;
        Ok(match mag.as_slice().first() {
            None => 0,
            Some(top) => (mag.len() - 1) * 8 + (8 - top.leading_zeros() as usize),
        })
    }

    /// Whether the value is zero
    pub fn is_zero(&self) -> Result<bool> {
        Ok(self.mag()?.is_empty())
    }

    /// Compare two values numerically
    pub fn cmp_mpi(&self, other: &Mpi) -> Result<Ordering> {
        let a = self.mag()?.as_slice();
        let b = other.mag()?.as_slice();
        Ok(a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
    }

    pub(crate) fn to_biguint(&self) -> Result<BigUint> {
        Ok(BigUint::from_bytes_be(self.mag()?.as_slice()))
    }

    pub(crate) fn set_biguint(&mut self, value: &BigUint) -> Result<()> {
        if value.is_zero() {
            *self.mag_mut()? = SecretVec::default();
            return Ok(());
        }
        let mut bytes = value.to_bytes_be();
        let res = self.import(&bytes);
        bytes.zeroize();
        res
    }
}

impl Drop for Mpi {
    fn drop(&mut self) {
        self.free();
    }
}

impl fmt::Debug for Mpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mag {
            Some(mag) => write!(f, "Mpi(bytes={}, [REDACTED])", mag.len()),
            None => write!(f, "Mpi(freed)"),
        }
    }
}
