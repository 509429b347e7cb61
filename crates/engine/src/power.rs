//! Device power and clock references
//!
//! Work on the engine is bracketed by a [`PowerRef`]; acquiring one calls
//! [`PowerDomain::get`] and dropping it calls [`PowerDomain::put`] exactly once.

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::status::{EngineStatus, Result};

/// A power/clock domain the engine must hold while it works
pub trait PowerDomain: Send + Sync {
    /// Take a reference, powering the domain up if needed
    fn get(&self) -> Result<()>;

    /// Drop a reference taken with [`PowerDomain::get`]
    fn put(&self);
}

/// Held power reference, released on drop
#[must_use = "dropping the guard releases power immediately"]
pub struct PowerRef {
    domain: Arc<dyn PowerDomain>,
}

impl PowerRef {
    /// Take a reference on `domain`
    pub fn acquire(domain: &Arc<dyn PowerDomain>) -> Result<Self> {
        domain.get()?;
        Ok(Self {
            domain: Arc::clone(domain),
        })
    }
}

impl Drop for PowerRef {
    fn drop(&mut self) {
        self.domain.put();
    }
}

impl fmt::Debug for PowerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PowerRef")
    }
}

/// Domain that is permanently powered
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOn;

impl PowerDomain for AlwaysOn {
    fn get(&self) -> Result<()> {
        Ok(())
    }

    fn put(&self) {}
}

/// Domain that counts references and can refuse the Nth `get`
#[derive(Debug, Default)]
pub struct CountingPower {
    attempts: AtomicUsize,
    gets: AtomicUsize,
    puts: AtomicUsize,
    fail_get_at: Option<usize>,
}

impl CountingPower {
    /// Counting domain that never fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Counting domain whose `n`th `get` (1-based) fails
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_get_at: Some(n),
            ..Self::default()
        }
    }

    /// Successful `get` calls
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// `put` calls
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// References currently held
    pub fn held(&self) -> usize {
        self.gets().saturating_sub(self.puts())
    }

    /// Whether every successful `get` was matched by exactly one `put`
    pub fn balanced(&self) -> bool {
        self.gets() == self.puts()
    }
}

impl PowerDomain for CountingPower {
    fn get(&self) -> Result<()> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_get_at == Some(n) {
            log::debug!("power: injected failure at get {}", n);
            return Err(EngineStatus::PowerFailure);
        }
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn put(&self) {
        let puts = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if puts > self.gets() {
            log::warn!("power: unbalanced put ({} puts, {} gets)", puts, self.gets());
        }
    }
}
