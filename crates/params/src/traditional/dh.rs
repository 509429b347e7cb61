//! Constants for Diffie-Hellman key exchange

/// DH with 2048-bit modulus
pub const DH_MODULUS_2048: usize = 2048;

/// Byte length for DH-2048 values
pub const DH_2048_BYTE_LENGTH: usize = DH_MODULUS_2048 / 8;

/// Generator shared by the groups below
pub const DH_GENERATOR: [u8; 1] = [0x02];

/// A finite-field Diffie-Hellman group: safe prime modulus and generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhGroup {
    /// Short group name
    pub name: &'static str,
    /// Big-endian prime modulus
    pub prime: &'static [u8],
    /// Big-endian generator
    pub generator: &'static [u8],
}

impl DhGroup {
    /// Byte length of the modulus
    pub const fn p_size(&self) -> usize {
        self.prime.len()
    }
}

/// RFC 3526 MODP Group 14 (2048 bits), generator 2
pub const MODP_2048: DhGroup = DhGroup {
    name: "modp2048",
    prime: &MODP_2048_PRIME,
    generator: &DH_GENERATOR,
};

/// 256-bit safe prime `2^256 - 36113` with generator 2
///
/// Far too small for real use; sized for fast tests and known-answer vectors.
pub const TEST_SAFE_PRIME_256: DhGroup = DhGroup {
    name: "test256",
    prime: &TEST_SAFE_PRIME_256_P,
    generator: &DH_GENERATOR,
};

/// RFC 3526 group 14 prime, `2^2048 - 2^1984 - 1 + 2^64 * (floor(2^1918 pi) + 124476)`
pub const MODP_2048_PRIME: [u8; DH_2048_BYTE_LENGTH] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC9, 0x0F, 0xDA, 0xA2,
    0x21, 0x68, 0xC2, 0x34, 0xC4, 0xC6, 0x62, 0x8B, 0x80, 0xDC, 0x1C, 0xD1,
    0x29, 0x02, 0x4E, 0x08, 0x8A, 0x67, 0xCC, 0x74, 0x02, 0x0B, 0xBE, 0xA6,
    0x3B, 0x13, 0x9B, 0x22, 0x51, 0x4A, 0x08, 0x79, 0x8E, 0x34, 0x04, 0xDD,
    0xEF, 0x95, 0x19, 0xB3, 0xCD, 0x3A, 0x43, 0x1B, 0x30, 0x2B, 0x0A, 0x6D,
    0xF2, 0x5F, 0x14, 0x37, 0x4F, 0xE1, 0x35, 0x6D, 0x6D, 0x51, 0xC2, 0x45,
    0xE4, 0x85, 0xB5, 0x76, 0x62, 0x5E, 0x7E, 0xC6, 0xF4, 0x4C, 0x42, 0xE9,
    0xA6, 0x37, 0xED, 0x6B, 0x0B, 0xFF, 0x5C, 0xB6, 0xF4, 0x06, 0xB7, 0xED,
    0xEE, 0x38, 0x6B, 0xFB, 0x5A, 0x89, 0x9F, 0xA5, 0xAE, 0x9F, 0x24, 0x11,
    0x7C, 0x4B, 0x1F, 0xE6, 0x49, 0x28, 0x66, 0x51, 0xEC, 0xE4, 0x5B, 0x3D,
    0xC2, 0x00, 0x7C, 0xB8, 0xA1, 0x63, 0xBF, 0x05, 0x98, 0xDA, 0x48, 0x36,
    0x1C, 0x55, 0xD3, 0x9A, 0x69, 0x16, 0x3F, 0xA8, 0xFD, 0x24, 0xCF, 0x5F,
    0x83, 0x65, 0x5D, 0x23, 0xDC, 0xA3, 0xAD, 0x96, 0x1C, 0x62, 0xF3, 0x56,
    0x20, 0x85, 0x52, 0xBB, 0x9E, 0xD5, 0x29, 0x07, 0x70, 0x96, 0x96, 0x6D,
    0x67, 0x0C, 0x35, 0x4E, 0x4A, 0xBC, 0x98, 0x04, 0xF1, 0x74, 0x6C, 0x08,
    0xCA, 0x18, 0x21, 0x7C, 0x32, 0x90, 0x5E, 0x46, 0x2E, 0x36, 0xCE, 0x3B,
    0xE3, 0x9E, 0x77, 0x2C, 0x18, 0x0E, 0x86, 0x03, 0x9B, 0x27, 0x83, 0xA2,
    0xEC, 0x07, 0xA2, 0x8F, 0xB5, 0xC5, 0x5D, 0xF0, 0x6F, 0x4C, 0x52, 0xC9,
    0xDE, 0x2B, 0xCB, 0xF6, 0x95, 0x58, 0x17, 0x18, 0x39, 0x95, 0x49, 0x7C,
    0xEA, 0x95, 0x6A, 0xE5, 0x15, 0xD2, 0x26, 0x18, 0x98, 0xFA, 0x05, 0x10,
    0x15, 0x72, 0x8E, 0x5A, 0x8A, 0xAC, 0xAA, 0x68, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF,
];

/// `2^256 - 36113`; both it and `(p - 1) / 2` are prime
pub const TEST_SAFE_PRIME_256_P: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x72, 0xEF,
];
