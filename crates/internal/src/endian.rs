//! Endianness utility functions for fixed-layout wire headers
//!
//! The `read_*` helpers are bounds-checked and return `None` when the input
//! is too short, so decoders can map truncation to their own error type.

/// Read a little-endian u16 at `offset`
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Option<u16> {
    let b = bytes.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

/// Read a little-endian u32 at `offset`
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let b = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Convert a u16 from native byte order to little-endian bytes
pub fn u16_to_le_bytes(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Convert a u32 from native byte order to little-endian bytes
pub fn u32_to_le_bytes(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}
