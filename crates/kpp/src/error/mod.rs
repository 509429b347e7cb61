//! Error handling for the KPP driver core
//!
//! Engine failures arrive as an [`EngineStatus`]; [`status_to_error`] is the
//! single table that turns them into the public error taxonomy.

use core::fmt;

use tekpp_api::error::Error as ApiError;
use tekpp_engine::EngineStatus;

/// Errors raised inside the driver before they reach the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An encoded secret could not be decoded
    Decode {
        context: &'static str,
        reason: &'static str,
    },

    /// Key material does not fit the encoding
    Encode {
        context: &'static str,
        reason: &'static str,
    },
}

/// Result type for driver-internal operations
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode { context, reason } => write!(f, "cannot decode {}: {}", context, reason),
            Error::Encode { context, reason } => write!(f, "cannot encode {}: {}", context, reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Map an engine status to the caller-visible error
///
/// `operation` names the failing step and becomes the error context.
pub fn status_to_error(status: EngineStatus, operation: &'static str) -> ApiError {
    match status {
        EngineStatus::NoMem => ApiError::AllocationError { context: operation },
        EngineStatus::BadInputData => ApiError::InvalidKeyFormat {
            context: operation,
            reason: "value rejected by the engine",
        },
        EngineStatus::GenRandom => ApiError::RngError { context: operation },
        EngineStatus::BadKeyLength => ApiError::BadKeyLength {
            context: operation,
            expected: 0,
            actual: 0,
        },
        EngineStatus::Busy => ApiError::Busy { context: operation },
        other => ApiError::PrimitiveEngineError {
            operation,
            code: other.code() as i32,
        },
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Decode { context, reason } => ApiError::InvalidKeyFormat { context, reason },
            Error::Encode { context, reason } => ApiError::InvalidArgument { context, reason },
        }
    }
}
