//! Engine configuration and fault injection

use crate::status::{EngineStatus, Result};

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 1;

/// Default job queue depth
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

/// Default number of random draws between DRBG reseeds
pub const DEFAULT_RESEED_INTERVAL: u64 = 1024;

/// Runtime configuration of an [`crate::Engine`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Worker threads executing primitives
    pub workers: usize,
    /// Maximum number of queued, not yet running, jobs
    pub queue_depth: usize,
    /// Random draws between DRBG reseeds from the OS RNG
    pub reseed_interval: u64,
    /// Injected failures
    pub faults: FaultPlan,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            reseed_interval: DEFAULT_RESEED_INTERVAL,
            faults: FaultPlan::default(),
        }
    }
}

impl EngineConfig {
    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the job queue depth
    pub fn with_queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth;
        self
    }

    /// Set the DRBG reseed interval
    pub fn with_reseed_interval(mut self, interval: u64) -> Self {
        self.reseed_interval = interval;
        self
    }

    /// Install a fault plan
    pub fn with_faults(mut self, faults: FaultPlan) -> Self {
        self.faults = faults;
        self
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 || self.queue_depth == 0 || self.reseed_interval == 0 {
            return Err(EngineStatus::BadParams);
        }
        Ok(())
    }
}

/// Failures to inject into an engine, for exercising cleanup paths
///
/// Ordinals are 1-based and count attempts over the engine's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaultPlan {
    /// Fail the Nth big-number or point allocation with `NoMem`
    pub fail_alloc_at: Option<usize>,
    /// Fail every DRBG seeding attempt with `GenRandom`
    pub fail_rng_seed: bool,
    /// Refuse the Nth slot reservation with `Busy`
    pub fail_reserve_at: Option<usize>,
    /// Complete every primitive with this status instead of running it
    #[cfg_attr(feature = "serde", serde(skip))]
    pub fail_primitive: Option<EngineStatus>,
}

impl FaultPlan {
    /// No injected failures
    pub fn none() -> Self {
        Self::default()
    }

    /// Fail the Nth allocation
    pub fn alloc_at(n: usize) -> Self {
        Self {
            fail_alloc_at: Some(n),
            ..Self::default()
        }
    }

    /// Fail every primitive with `status`
    pub fn primitive(status: EngineStatus) -> Self {
        Self {
            fail_primitive: Some(status),
            ..Self::default()
        }
    }

    /// Fail DRBG seeding
    pub fn rng_seed() -> Self {
        Self {
            fail_rng_seed: true,
            ..Self::default()
        }
    }

    /// Refuse the Nth slot reservation
    pub fn reserve_at(n: usize) -> Self {
        Self {
            fail_reserve_at: Some(n),
            ..Self::default()
        }
    }
}
