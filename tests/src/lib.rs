//! Test support for the tekpp integration tests
//!
//! [`fixtures`] builds engines, transforms and secret blobs, [`harness`] runs
//! whole key-agreement flows under injected faults, and [`vectors`] holds the
//! known-answer values.

pub mod fixtures;

/// Route `log` output through `env_logger` when `RUST_LOG` is set
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
