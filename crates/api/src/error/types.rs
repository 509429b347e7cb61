//! Error type definitions for key-agreement operations

/// Primary error type for key-agreement operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A big-number, point or context allocation failed
    AllocationError {
        context: &'static str,
    },

    /// Caller-supplied key material could not be decoded
    InvalidKeyFormat {
        context: &'static str,
        reason: &'static str,
    },

    /// A curve identifier outside the registered curves was requested
    UnsupportedCurve {
        curve_id: u16,
    },

    /// An exported value did not have the fixed size the variant requires
    BadKeyLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The random bit source could not be seeded or read
    RngError {
        context: &'static str,
    },

    /// The primitive engine reported a device-specific failure
    PrimitiveEngineError {
        operation: &'static str,
        code: i32,
    },

    /// Invalid argument error (buffer sizes, copy-length mismatch)
    InvalidArgument {
        context: &'static str,
        reason: &'static str,
    },

    /// Another request is already in flight on this context, or the engine queue is full
    Busy {
        context: &'static str,
    },

    /// No key material has been set on the transform yet
    MissingSecret {
        context: &'static str,
    },

    /// The completion side of a request was dropped without delivering a result
    CompletionLost,
}

/// Result type for key-agreement operations
pub type Result<T> = core::result::Result<T, Error>;

const ENOMEM: i32 = 12;
const EINVAL: i32 = 22;
const EBUSY: i32 = 16;
const EIO: i32 = 5;
const EAGAIN: i32 = 11;
const ECANCELED: i32 = 125;

impl Error {
    /// Negative errno equivalent of this error, as a kernel caller would see it
    pub fn errno(&self) -> i32 {
        match self {
            Self::AllocationError { .. } => -ENOMEM,
            Self::InvalidKeyFormat { .. }
            | Self::UnsupportedCurve { .. }
            | Self::BadKeyLength { .. }
            | Self::InvalidArgument { .. }
            | Self::MissingSecret { .. } => -EINVAL,
            Self::RngError { .. } => -EAGAIN,
            Self::PrimitiveEngineError { .. } => -EIO,
            Self::Busy { .. } => -EBUSY,
            Self::CompletionLost => -ECANCELED,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AllocationError { context } => {
                write!(f, "{}: allocation failed", context)
            }
            Self::InvalidKeyFormat { context, reason } => {
                write!(f, "Invalid key format: {}: {}", context, reason)
            }
            Self::UnsupportedCurve { curve_id } => {
                write!(f, "Unsupported curve id {:#06x}", curve_id)
            }
            Self::BadKeyLength { context, expected, actual } => {
                write!(
                    f,
                    "{}: bad key length (expected {}, got {})",
                    context, expected, actual
                )
            }
            Self::RngError { context } => {
                write!(f, "Random generation error: {}", context)
            }
            Self::PrimitiveEngineError { operation, code } => {
                write!(f, "Primitive engine error in {}: status {:#x}", operation, code)
            }
            Self::InvalidArgument { context, reason } => {
                write!(f, "{}: {}", context, reason)
            }
            Self::Busy { context } => {
                write!(f, "{}: device busy", context)
            }
            Self::MissingSecret { context } => {
                write!(f, "{}: no secret has been set", context)
            }
            Self::CompletionLost => {
                write!(f, "request completion was dropped before delivering a result")
            }
        }
    }
}
