//! Encoded key material accepted by `set_secret`
//!
//! Every blob starts with a little-endian header `{type: u16, len: u16}` where
//! `len` covers the whole blob, header included. The payload layout depends on
//! the type; see [`dh`] and [`ecdh`].

pub mod dh;
pub mod ecdh;

pub use dh::DhSecret;
pub use ecdh::EcdhSecret;

use tekpp_internal::endian::{read_u16_le, u16_to_le_bytes};

use crate::error::{Error, Result};

/// Blob type of a DH secret
pub const KPP_SECRET_DH: u16 = 1;

/// Blob type of an ECDH secret
pub const KPP_SECRET_ECDH: u16 = 2;

/// Size of the common header
pub const SECRET_HEADER_SIZE: usize = 4;

/// Check the header of `buf` and return the payload after it
pub(crate) fn open<'a>(buf: &'a [u8], kind: u16, context: &'static str) -> Result<&'a [u8]> {
    let (Some(found), Some(len)) = (read_u16_le(buf, 0), read_u16_le(buf, 2)) else {
        return Err(Error::Decode {
            context,
            reason: "truncated header",
        });
    };
    if found != kind {
        return Err(Error::Decode {
            context,
            reason: "wrong secret type",
        });
    }
    if usize::from(len) != buf.len() {
        return Err(Error::Decode {
            context,
            reason: "length field does not match buffer",
        });
    }
    Ok(&buf[SECRET_HEADER_SIZE..])
}

/// Start an encoding of `total` bytes with the header filled in
pub(crate) fn seal(kind: u16, total: usize, context: &'static str) -> Result<Vec<u8>> {
    let len = u16::try_from(total).map_err(|_| Error::Encode {
        context,
        reason: "encoding exceeds 65535 bytes",
    })?;
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&u16_to_le_bytes(kind));
    out.extend_from_slice(&u16_to_le_bytes(len));
    Ok(out)
}
