//! Constants for Elliptic Curve Diffie-Hellman
//!
//! Only the two NIST prime curves the driver registers are described here.
//! Domain parameters are big-endian byte strings.

/// Kernel-style curve identifier meaning "no curve selected"
pub const ECC_CURVE_UNSET: u16 = 0x0000;

/// Kernel-style curve identifier for NIST P-192
pub const ECC_CURVE_NIST_P192: u16 = 0x0001;

/// Kernel-style curve identifier for NIST P-256
pub const ECC_CURVE_NIST_P256: u16 = 0x0002;

/// Tag byte prefixed to an uncompressed point encoding
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Supported named curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveId {
    /// NIST P-192 (secp192r1)
    Secp192r1,
    /// NIST P-256 (secp256r1, prime256v1)
    Secp256r1,
}

impl CurveId {
    /// Map a kernel curve identifier; `None` for unset or unknown ids
    pub const fn from_kernel_id(id: u16) -> Option<Self> {
        match id {
            ECC_CURVE_NIST_P192 => Some(Self::Secp192r1),
            ECC_CURVE_NIST_P256 => Some(Self::Secp256r1),
            _ => None,
        }
    }

    /// The kernel curve identifier for this curve
    pub const fn kernel_id(self) -> u16 {
        match self {
            Self::Secp192r1 => ECC_CURVE_NIST_P192,
            Self::Secp256r1 => ECC_CURVE_NIST_P256,
        }
    }

    /// Bit length of the underlying prime field
    pub const fn field_bits(self) -> usize {
        match self {
            Self::Secp192r1 => 192,
            Self::Secp256r1 => 256,
        }
    }

    /// Byte length of one field element (one point coordinate)
    pub const fn field_bytes(self) -> usize {
        (self.field_bits() + 7) / 8
    }

    /// Byte length of an untagged public point: `X || Y`
    pub const fn public_key_size(self) -> usize {
        2 * self.field_bytes()
    }

    /// Byte length of a tagged uncompressed point: `0x04 || X || Y`
    pub const fn tagged_public_key_size(self) -> usize {
        self.public_key_size() + 1
    }

    /// Standard curve name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Secp192r1 => "secp192r1",
            Self::Secp256r1 => "secp256r1",
        }
    }

    /// Domain parameters for this curve
    pub const fn domain(self) -> &'static CurveDomain {
        match self {
            Self::Secp192r1 => &P192_DOMAIN,
            Self::Secp256r1 => &P256_DOMAIN,
        }
    }
}

/// Short Weierstrass domain parameters (`a = -3` for both curves)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveDomain {
    /// Field prime
    pub p: &'static [u8],
    /// Order of the base point
    pub n: &'static [u8],
    /// Base point X coordinate
    pub gx: &'static [u8],
    /// Base point Y coordinate
    pub gy: &'static [u8],
}

/// NIST P-192 domain parameters
pub const P192_DOMAIN: CurveDomain = CurveDomain {
    p: &P192_P,
    n: &P192_N,
    gx: &P192_GX,
    gy: &P192_GY,
};

/// NIST P-256 domain parameters
pub const P256_DOMAIN: CurveDomain = CurveDomain {
    p: &P256_P,
    n: &P256_N,
    gx: &P256_GX,
    gy: &P256_GY,
};

/// NIST P-192 field prime
pub const P192_P: [u8; 24] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// NIST P-192 group order
pub const P192_N: [u8; 24] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x99, 0xDE, 0xF8, 0x36, 0x14, 0x6B, 0xC9, 0xB1, 0xB4, 0xD2, 0x28, 0x31,
];

/// NIST P-192 base point X
pub const P192_GX: [u8; 24] = [
    0x18, 0x8D, 0xA8, 0x0E, 0xB0, 0x30, 0x90, 0xF6, 0x7C, 0xBF, 0x20, 0xEB,
    0x43, 0xA1, 0x88, 0x00, 0xF4, 0xFF, 0x0A, 0xFD, 0x82, 0xFF, 0x10, 0x12,
];

/// NIST P-192 base point Y
pub const P192_GY: [u8; 24] = [
    0x07, 0x19, 0x2B, 0x95, 0xFF, 0xC8, 0xDA, 0x78, 0x63, 0x10, 0x11, 0xED,
    0x6B, 0x24, 0xCD, 0xD5, 0x73, 0xF9, 0x77, 0xA1, 0x1E, 0x79, 0x48, 0x11,
];

/// NIST P-256 field prime
pub const P256_P: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// NIST P-256 group order
pub const P256_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84,
    0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63, 0x25, 0x51,
];

/// NIST P-256 base point X
pub const P256_GX: [u8; 32] = [
    0x6B, 0x17, 0xD1, 0xF2, 0xE1, 0x2C, 0x42, 0x47, 0xF8, 0xBC, 0xE6, 0xE5,
    0x63, 0xA4, 0x40, 0xF2, 0x77, 0x03, 0x7D, 0x81, 0x2D, 0xEB, 0x33, 0xA0,
    0xF4, 0xA1, 0x39, 0x45, 0xD8, 0x98, 0xC2, 0x96,
];

/// NIST P-256 base point Y
pub const P256_GY: [u8; 32] = [
    0x4F, 0xE3, 0x42, 0xE2, 0xFE, 0x1A, 0x7F, 0x9B, 0x8E, 0xE7, 0xEB, 0x4A,
    0x7C, 0x0F, 0x9E, 0x16, 0x2B, 0xCE, 0x33, 0x57, 0x6B, 0x31, 0x5E, 0xCE,
    0xCB, 0xB6, 0x40, 0x68, 0x37, 0xBF, 0x51, 0xF5,
];
