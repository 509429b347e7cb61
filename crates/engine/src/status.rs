//! Engine status codes
//!
//! Every engine entry point reports one of these. Completion callbacks carry
//! [`EngineStatus::Success`] or the failure that ended the operation.

use core::fmt;

/// Device-style status reported by the primitive engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    /// Operation completed
    Success,
    /// Unclassified failure
    Generic,
    /// A parameter handed to the engine was malformed or uninitialized
    BadParams,
    /// Input data (an imported value or point) was rejected
    BadInputData,
    /// An object could not be allocated
    NoMem,
    /// A value did not have the length the operation requires
    BadKeyLength,
    /// An output buffer was too small for the value
    ShortBuffer,
    /// The random source could not be seeded or read
    GenRandom,
    /// The job queue has no free slot
    Busy,
    /// The engine has been shut down
    Stopped,
    /// A context lock was poisoned by a panicking holder
    Poisoned,
    /// The power domain refused to power up
    PowerFailure,
}

/// Result type for engine operations
pub type Result<T> = core::result::Result<T, EngineStatus>;

impl EngineStatus {
    /// Numeric status code, as the hardware library would report it
    pub const fn code(self) -> u32 {
        match self {
            Self::Success => 0x0000_0000,
            Self::Generic => 0xFFFF_0000,
            Self::BadParams => 0xFFFF_0001,
            Self::BadInputData => 0xFFFF_0002,
            Self::NoMem => 0xFFFF_0003,
            Self::BadKeyLength => 0xFFFF_0004,
            Self::ShortBuffer => 0xFFFF_0005,
            Self::GenRandom => 0xFFFF_0006,
            Self::Busy => 0xFFFF_0007,
            Self::Stopped => 0xFFFF_0008,
            Self::Poisoned => 0xFFFF_0009,
            Self::PowerFailure => 0xFFFF_000A,
        }
    }

    /// Check for [`EngineStatus::Success`]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Collapse a result into the status a completion callback carries
    pub fn from_result(res: Result<()>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(status) => status,
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            Self::Success => "success",
            Self::Generic => "generic failure",
            Self::BadParams => "bad parameters",
            Self::BadInputData => "bad input data",
            Self::NoMem => "out of memory",
            Self::BadKeyLength => "bad key length",
            Self::ShortBuffer => "output buffer too small",
            Self::GenRandom => "random generation failed",
            Self::Busy => "queue full",
            Self::Stopped => "engine stopped",
            Self::Poisoned => "lock poisoned",
            Self::PowerFailure => "power domain failure",
        };
        write!(f, "{} ({:#010x})", what, self.code())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineStatus {}
