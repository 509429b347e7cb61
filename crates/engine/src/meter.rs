//! Accounting for engine-owned objects
//!
//! Every big number, point and group handle registers with the meter when
//! allocated and deregisters when freed, so a balanced meter proves that no
//! handle leaked and none was freed twice. The meter also applies the
//! allocation fault from the engine's [`FaultPlan`].

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::config::FaultPlan;
use crate::status::{EngineStatus, Result};

/// Live-object counter shared by an engine and every handle it allocated
#[derive(Debug, Default)]
pub struct ResourceMeter {
    attempts: AtomicUsize,
    allocated: AtomicUsize,
    freed: AtomicUsize,
    reserves: AtomicUsize,
    faults: FaultPlan,
}

impl ResourceMeter {
    /// Meter without injected faults
    pub fn new() -> Self {
        Self::default()
    }

    /// Meter applying `faults`
    pub fn with_faults(faults: FaultPlan) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Record an allocation attempt; fails if the fault plan says so
    pub(crate) fn charge(&self) -> Result<()> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.faults.fail_alloc_at == Some(n) {
            log::debug!("meter: injected allocation failure at attempt {}", n);
            return Err(EngineStatus::NoMem);
        }
        self.allocated.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Record a release of a previously charged object
    pub(crate) fn refund(&self) {
        self.freed.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a queue slot reservation; fails if the fault plan says so
    pub(crate) fn reserve(&self) -> Result<()> {
        let n = self.reserves.fetch_add(1, Ordering::SeqCst) + 1;
        if self.faults.fail_reserve_at == Some(n) {
            log::debug!("meter: injected reservation failure at attempt {}", n);
            return Err(EngineStatus::Busy);
        }
        Ok(())
    }

    /// The fault plan this meter applies
    pub fn faults(&self) -> &FaultPlan {
        &self.faults
    }

    /// Successful allocations so far
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::SeqCst)
    }

    /// Releases so far
    pub fn freed(&self) -> usize {
        self.freed.load(Ordering::SeqCst)
    }

    /// Objects currently alive
    pub fn live(&self) -> usize {
        self.allocated().saturating_sub(self.freed())
    }

    /// Allocation attempts so far, including injected failures
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}
