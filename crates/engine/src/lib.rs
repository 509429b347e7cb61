//! Software primitive engine for tekpp
//!
//! This crate plays the part of the trust-engine hardware: it owns big-number
//! and curve-point handles, runs DH and ECDH primitives on worker threads and
//! reports completion through a callback carrying an [`EngineStatus`].
//!
//! Every handle is charged to the engine's [`ResourceMeter`], so tests can
//! check that all allocations were released exactly once.

pub mod bn;
pub mod config;
mod curve;
pub mod dhm;
pub mod drbg;
pub mod ecdh;
pub mod ecp;
pub mod engine;
pub mod meter;
pub mod power;
pub mod status;

pub use bn::Mpi;
pub use config::{EngineConfig, FaultPlan};
pub use dhm::{DhmComputeShared, DhmMakePublic};
pub use drbg::Drbg;
pub use ecdh::{EcdhComputeShared, EcdhGenPublic};
pub use ecp::{EcpGroup, EcpPoint};
pub use engine::{Engine, Job, Operation, Refused, Slot};
pub use meter::ResourceMeter;
pub use power::{AlwaysOn, CountingPower, PowerDomain, PowerRef};
pub use status::EngineStatus;
