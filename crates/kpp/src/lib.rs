//! Key-agreement (KPP) driver core
//!
//! Three parts sit on top of the primitive engine:
//!
//! - the context manager ([`KppContext`]) owns the big numbers and points of
//!   one transform and installs encoded secrets;
//! - the request pipelines translate between caller byte buffers and engine
//!   handles and drive the asynchronous DH and ECDH primitives;
//! - the registry ([`KPP_ALGS`], [`Registry`]) names the offered algorithms
//!   and instantiates [`KppTfm`] transforms.
//!
//! Requests resolve through a one-shot [`tekpp_api::Pending`] handle. Only one
//! request may be in flight per transform.

pub mod context;
mod dh;
mod ecdh;
pub mod error;
pub mod registry;
mod request;
pub mod secret;
pub mod transform;

pub use context::{DhState, EcdhState, KppContext, Variant};
pub use error::status_to_error;
pub use registry::{register_algs, unregister_algs, AlgRegistrar, KppAlg, Registry, KPP_ALGS};
pub use secret::{DhSecret, EcdhSecret};
pub use transform::KppTfm;
