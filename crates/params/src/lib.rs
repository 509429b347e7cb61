//! Constant values for the tekpp key-agreement driver
//!
//! Curve identifiers and domain parameters for the two supported NIST curves,
//! and well-known finite-field Diffie-Hellman groups.

#![cfg_attr(not(test), no_std)]

pub mod traditional;

pub use traditional::dh::DhGroup;
pub use traditional::ecdh::CurveId;
