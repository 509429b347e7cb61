//! DH secret blob
//!
//! ```text
//! header | key_size: u32 | p_size: u32 | g_size: u32 | key | p | g
//! ```

use tekpp_common::SecretVec;
use tekpp_internal::endian::{read_u32_le, u32_to_le_bytes};

use super::{open, seal, KPP_SECRET_DH, SECRET_HEADER_SIZE};
use crate::error::{Error, Result};

const CONTEXT: &str = "dh secret";

/// Size of the fixed part of a DH blob, header included
pub const DH_SECRET_FIXED_SIZE: usize = SECRET_HEADER_SIZE + 3 * 4;

/// Decoded view of a DH secret blob
///
/// An empty `key` asks for a private exponent to be generated.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DhSecret<'a> {
    /// Private exponent, big-endian
    pub key: &'a [u8],
    /// Prime modulus, big-endian
    pub p: &'a [u8],
    /// Generator, big-endian
    pub g: &'a [u8],
}

fn fail(reason: &'static str) -> Error {
    Error::Decode {
        context: CONTEXT,
        reason,
    }
}

fn size_field(payload: &[u8], offset: usize) -> Result<usize> {
    let value = read_u32_le(payload, offset).ok_or(fail("truncated size fields"))?;
    usize::try_from(value).map_err(|_| fail("size field out of range"))
}

impl<'a> DhSecret<'a> {
    /// Length of the encoding of `self`
    pub fn encoded_len(&self) -> usize {
        DH_SECRET_FIXED_SIZE + self.key.len() + self.p.len() + self.g.len()
    }

    /// Encode into a blob accepted by [`DhSecret::decode`]
    pub fn encode(&self) -> Result<SecretVec> {
        let total = self.encoded_len();
        let mut out = seal(KPP_SECRET_DH, total, CONTEXT)?;
        for part in [self.key, self.p, self.g] {
            let len = u32::try_from(part.len()).map_err(|_| Error::Encode {
                context: CONTEXT,
                reason: "component too long",
            })?;
            out.extend_from_slice(&u32_to_le_bytes(len));
        }
        out.extend_from_slice(self.key);
        out.extend_from_slice(self.p);
        out.extend_from_slice(self.g);
        Ok(SecretVec::new(out))
    }

    /// Decode a blob, borrowing its components
    pub fn decode(buf: &'a [u8]) -> Result<Self> {
        let payload = open(buf, KPP_SECRET_DH, CONTEXT)?;
        let key_size = size_field(payload, 0)?;
        let p_size = size_field(payload, 4)?;
        let g_size = size_field(payload, 8)?;

        if p_size == 0 {
            return Err(fail("empty modulus"));
        }
        if g_size == 0 {
            return Err(fail("empty generator"));
        }
        if key_size > p_size {
            return Err(fail("private key longer than modulus"));
        }
        if g_size > p_size {
            return Err(fail("generator longer than modulus"));
        }

        let body = &payload[12..];
        if body.len() != key_size + p_size + g_size {
            return Err(fail("component sizes do not match payload"));
        }
        let (key, rest) = body.split_at(key_size);
        let (p, g) = rest.split_at(p_size);
        Ok(Self { key, p, g })
    }
}

impl core::fmt::Debug for DhSecret<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DhSecret")
            .field("key_size", &self.key.len())
            .field("p_size", &self.p.len())
            .field("g_size", &self.g.len())
            .finish()
    }
}
