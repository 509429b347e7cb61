//! Trait definition for Key-agreement Protocol Primitives (KPP)
//!
//! A KPP transform holds one party's key material and offers the three
//! operations of an interactive key agreement: set the secret, generate the
//! matching public value, and combine the peer's public value into a shared
//! secret. The two value-producing operations are asynchronous.

use crate::completion::Submission;
use crate::error::Result;
use crate::types::KppRequest;

/// Trait for key-agreement transforms.
///
/// # Sequencing
///
/// The supported call sequence is `set_secret`, `generate_public_key`,
/// `compute_shared_secret`. Only one request may be in flight per transform;
/// a second submission while one is pending is refused with
/// [`crate::Error::Busy`].
pub trait Kpp: Send + Sync {
    /// Returns the algorithm name the transform was allocated for.
    fn alg_name(&self) -> &'static str;

    /// Install encoded key material (and domain parameters, for DH).
    ///
    /// An encoding without a private key selects a randomly generated one at
    /// public-key generation time.
    fn set_secret(&self, secret: &[u8]) -> Result<()>;

    /// Size in bytes of the public value and of the DH shared secret.
    fn max_size(&self) -> usize;

    /// Write this party's public value into `req.dst`.
    ///
    /// Returns a pending handle on successful submission; the result and the
    /// request are delivered through it exactly once.
    fn generate_public_key(&self, req: KppRequest) -> Submission;

    /// Combine the peer's public value in `req.src` into `req.dst`.
    fn compute_shared_secret(&self, req: KppRequest) -> Submission;
}
