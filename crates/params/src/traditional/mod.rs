//! Parameters for traditional key agreement

pub mod dh;
pub mod ecdh;
