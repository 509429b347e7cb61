//! # tekpp
//!
//! A key-agreement (KPP) driver: finite-field Diffie-Hellman and NIST
//! P-192/P-256 ECDH behind an asynchronous, completion-based request
//! pipeline.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tekpp::prelude::*;
//!
//! let engine = Arc::new(Engine::with_defaults()?);
//! let registry = Registry::with_driver_algs()?;
//! let tfm = registry.alloc_tfm("ecdh-nist-p256", engine, Arc::new(AlwaysOn))?;
//!
//! let secret = EcdhSecret { curve_id: 0, key: &[] }.encode()?;
//! tfm.set_secret(secret.as_slice())?;
//! let public = tfm
//!     .generate_public_key(KppRequest::new(tfm.max_size()))
//!     .map_err(Error::from)?
//!     .wait()?
//!     .into_output()?;
//! assert_eq!(public.len(), 64);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - `std` (default)
//! - `serde`: `Serialize`/`Deserialize` for engine configuration and curve ids
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`api`]: error taxonomy, the [`Kpp`](api::Kpp) trait, requests and completions
//! - [`common`]: zeroizing secret storage
//! - [`params`]: curve identifiers, domain parameters and DH groups
//! - [`engine`]: the primitive engine
//! - [`kpp`]: secret codecs, context manager, request pipeline and registry

pub use tekpp_api as api;
pub use tekpp_common as common;
pub use tekpp_engine as engine;
pub use tekpp_internal as internal;
pub use tekpp_kpp as kpp;
pub use tekpp_params as params;

/// Common imports for tekpp users
pub mod prelude {
    pub use crate::api::{Error, Kpp, KppRequest, Pending, Result, SgList};

    pub use crate::common::SecretVec;
    pub use zeroize::Zeroize;

    pub use crate::engine::{AlwaysOn, Engine, EngineConfig, PowerDomain};
    pub use crate::kpp::{DhSecret, EcdhSecret, KppTfm, Registry};
    pub use crate::params::{CurveId, DhGroup};
}
