//! Validation helpers returning typed errors

use super::{Error, Result};

/// Validate that a length matches exactly
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::BadKeyLength {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate that a length does not exceed a bound
pub fn max_length(context: &'static str, actual: usize, max: usize) -> Result<()> {
    if actual > max {
        return Err(Error::InvalidKeyFormat {
            context,
            reason: "value exceeds the size of its field",
        });
    }
    Ok(())
}

/// Validate key material
pub fn key(condition: bool, context: &'static str, reason: &'static str) -> Result<()> {
    if !condition {
        return Err(Error::InvalidKeyFormat { context, reason });
    }
    Ok(())
}
