//! Capability traits implemented by key-agreement transforms

pub mod kpp;

pub use kpp::Kpp;
