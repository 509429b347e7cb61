//! Public API traits and types for tekpp
//!
//! This crate provides the public contract of the key-agreement driver: the
//! error taxonomy, the [`Kpp`] capability trait, the request and
//! scatter-gather buffer types, and the one-shot completion handle through
//! which asynchronous results are delivered.

pub mod completion;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use completion::{pending, Completer, Completion, Pending, Rejected, Submission};
pub use error::{Error, Result};
pub use traits::Kpp;
pub use types::{KppRequest, SgList};
