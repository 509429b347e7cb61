//! ECDH secret blob
//!
//! ```text
//! header | curve_id: u16 | key_size: u16 | key
//! ```
//!
//! `curve_id` uses the kernel numbering (`ECC_CURVE_NIST_P192 = 1`,
//! `ECC_CURVE_NIST_P256 = 2`); zero leaves the choice to the algorithm.

use tekpp_common::SecretVec;
use tekpp_internal::endian::{read_u16_le, u16_to_le_bytes};

use super::{open, seal, KPP_SECRET_ECDH, SECRET_HEADER_SIZE};
use crate::error::{Error, Result};

const CONTEXT: &str = "ecdh secret";

/// Size of the fixed part of an ECDH blob, header included
pub const ECDH_SECRET_FIXED_SIZE: usize = SECRET_HEADER_SIZE + 2 * 2;

/// Decoded view of an ECDH secret blob
///
/// An empty `key` asks for a private scalar to be generated.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EcdhSecret<'a> {
    /// Kernel curve identifier
    pub curve_id: u16,
    /// Private scalar, big-endian
    pub key: &'a [u8],
}

impl<'a> EcdhSecret<'a> {
    /// Length of the encoding of `self`
    pub fn encoded_len(&self) -> usize {
        ECDH_SECRET_FIXED_SIZE + self.key.len()
    }

    /// Encode into a blob accepted by [`EcdhSecret::decode`]
    pub fn encode(&self) -> Result<SecretVec> {
        let key_size = u16::try_from(self.key.len()).map_err(|_| Error::Encode {
            context: CONTEXT,
            reason: "private key too long",
        })?;
        let mut out = seal(KPP_SECRET_ECDH, self.encoded_len(), CONTEXT)?;
        out.extend_from_slice(&u16_to_le_bytes(self.curve_id));
        out.extend_from_slice(&u16_to_le_bytes(key_size));
        out.extend_from_slice(self.key);
        Ok(SecretVec::new(out))
    }

    /// Decode a blob, borrowing the key
    pub fn decode(buf: &'a [u8]) -> Result<Self> {
        let payload = open(buf, KPP_SECRET_ECDH, CONTEXT)?;
        let (Some(curve_id), Some(key_size)) = (read_u16_le(payload, 0), read_u16_le(payload, 2))
        else {
            return Err(Error::Decode {
                context: CONTEXT,
                reason: "truncated size fields",
            });
        };
        let key = &payload[4..];
        if key.len() != usize::from(key_size) {
            return Err(Error::Decode {
                context: CONTEXT,
                reason: "key size does not match payload",
            });
        }
        Ok(Self { curve_id, key })
    }
}

impl core::fmt::Debug for EcdhSecret<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EcdhSecret")
            .field("curve_id", &self.curve_id)
            .field("key_size", &self.key.len())
            .finish()
    }
}
