//! Internal utilities shared by the tekpp crates
//!
//! Not part of the public API; items here may change between releases.

#![cfg_attr(not(test), no_std)]

pub mod constant_time;
pub mod endian;
