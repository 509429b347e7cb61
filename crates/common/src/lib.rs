//! Common implementations and shared functionality for tekpp
//!
//! This crate provides the zeroizing containers the driver uses for key
//! material that crosses crate boundaries.

pub mod security;

// Re-export core security types
pub use security::SecretVec;
