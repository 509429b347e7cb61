//! Asynchronous job queue in front of the primitives
//!
//! Submission is split in two: [`Engine::reserve`] claims a queue slot and can
//! fail synchronously, [`Slot::submit`] hands over the job and cannot. Once a
//! job is queued its callback runs exactly once on a worker thread, with the
//! final status and the operation descriptor handed back.

use core::fmt;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, error::TrySendError, OwnedPermit};

use crate::bn::Mpi;
use crate::config::EngineConfig;
use crate::dhm::{self, DhmComputeShared, DhmMakePublic};
use crate::drbg::Drbg;
use crate::ecdh::{self, EcdhComputeShared, EcdhGenPublic};
use crate::ecp::{EcpGroup, EcpPoint};
use crate::meter::ResourceMeter;
use crate::status::{EngineStatus, Result};

/// Operation descriptor
#[derive(Debug)]
pub enum Operation {
    /// DH make-public
    DhMakePublic(DhmMakePublic),
    /// DH compute-shared
    DhComputeShared(DhmComputeShared),
    /// ECDH make-public
    EcdhMakePublic(EcdhGenPublic),
    /// ECDH compute-shared
    EcdhComputeShared(EcdhComputeShared),
}

impl Operation {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::DhMakePublic(_) => "dh-make-public",
            Self::DhComputeShared(_) => "dh-compute-shared",
            Self::EcdhMakePublic(_) => "ecdh-make-public",
            Self::EcdhComputeShared(_) => "ecdh-compute-shared",
        }
    }

    fn run(&mut self, rng: &mut Drbg) -> Result<()> {
        match self {
            Self::DhMakePublic(op) => dhm::make_public(op, rng),
            Self::DhComputeShared(op) => dhm::compute_shared(op, rng),
            Self::EcdhMakePublic(op) => ecdh::gen_public(op, rng),
            Self::EcdhComputeShared(op) => ecdh::compute_shared(op, rng),
        }
    }
}

type Callback = Box<dyn FnOnce(EngineStatus, Operation) + Send + 'static>;

/// An operation together with its completion callback
pub struct Job {
    op: Operation,
    callback: Callback,
}

impl Job {
    /// Pair `op` with the callback that receives its outcome
    pub fn new<F>(op: Operation, callback: F) -> Self
    where
        F: FnOnce(EngineStatus, Operation) + Send + 'static,
    {
        Self {
            op,
            callback: Box::new(callback),
        }
    }

    /// The queued operation
    pub fn operation(&self) -> &Operation {
        &self.op
    }

    fn finish(self, status: EngineStatus) {
        (self.callback)(status, self.op)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("op", &self.op.name()).finish_non_exhaustive()
    }
}

/// A claimed queue slot
#[must_use = "an unused slot is returned to the queue on drop"]
pub struct Slot {
    permit: OwnedPermit<Job>,
}

impl Slot {
    /// Queue `job`; its callback will run exactly once
    pub fn submit(self, job: Job) {
        log::trace!("engine: queued {}", job.op.name());
        self.permit.send(job);
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Slot")
    }
}

/// A job that could not be queued
#[derive(Debug)]
pub struct Refused {
    /// Why the job was refused
    pub status: EngineStatus,
    /// The job, callback not run
    pub job: Job,
}

/// Software primitive engine
pub struct Engine {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    meter: Arc<ResourceMeter>,
    config: EngineConfig,
}

impl Engine {
    /// Start the worker threads
    pub fn start(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let (tx, rx) = mpsc::channel::<Job>(config.queue_depth);
        let rx = Arc::new(Mutex::new(rx));
        let mut workers = Vec::with_capacity(config.workers);
        for id in 0..config.workers {
            let rx = Arc::clone(&rx);
            let cfg = config.clone();
            let handle = thread::Builder::new()
                .name(format!("tekpp-engine-{}", id))
                .spawn(move || worker(id, rx, cfg))
                .map_err(|e| {
                    log::warn!("engine: cannot spawn worker {}: {}", id, e);
                    EngineStatus::NoMem
                })?;
            workers.push(handle);
        }
        log::debug!(
            "engine: started {} worker(s), queue depth {}",
            config.workers,
            config.queue_depth
        );
        Ok(Self {
            sender: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            meter: Arc::new(ResourceMeter::with_faults(config.faults.clone())),
            config,
        })
    }

    /// Start with the default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::start(EngineConfig::default())
    }

    /// Configuration the engine was started with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Meter every handle allocated through this engine is charged to
    pub fn meter(&self) -> &Arc<ResourceMeter> {
        &self.meter
    }

    /// Allocate a big number
    pub fn bn_alloc(&self) -> Result<Mpi> {
        Mpi::alloc(&self.meter)
    }

    /// Allocate an unloaded curve group
    pub fn group_alloc(&self) -> Result<EcpGroup> {
        EcpGroup::alloc(&self.meter)
    }

    /// Allocate an unset curve point
    pub fn point_alloc(&self) -> Result<EcpPoint> {
        EcpPoint::alloc(&self.meter)
    }

    /// Claim a queue slot without blocking
    ///
    /// Fails with [`EngineStatus::Busy`] when the queue is full and
    /// [`EngineStatus::Stopped`] after shutdown.
    pub fn reserve(&self) -> Result<Slot> {
        let sender = self
            .sender
            .lock()
            .map_err(|_| EngineStatus::Poisoned)?
            .clone()
            .ok_or(EngineStatus::Stopped)?;
        self.meter.reserve()?;
        match sender.try_reserve_owned() {
            Ok(permit) => Ok(Slot { permit }),
            Err(TrySendError::Full(_)) => Err(EngineStatus::Busy),
            Err(TrySendError::Closed(_)) => Err(EngineStatus::Stopped),
        }
    }

    /// Queue `job`, handing it back if no slot is free
    pub fn submit(&self, job: Job) -> core::result::Result<(), Refused> {
        match self.reserve() {
            Ok(slot) => {
                slot.submit(job);
                Ok(())
            }
            Err(status) => Err(Refused { status, job }),
        }
    }

    /// Stop accepting jobs, drain the queue and join the workers
    ///
    /// Jobs already queued still complete. Calling again is a no-op.
    pub fn shutdown(&self) {
        let sender = match self.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if sender.is_none() {
            return;
        }
        drop(sender);

        let handles: Vec<JoinHandle<()>> = match self.workers.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        let current = thread::current().id();
        for handle in handles {
            // The last reference may be dropped from a completion callback
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::warn!("engine: worker panicked");
            }
        }
        log::debug!("engine: shut down");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn worker(id: usize, rx: Arc<Mutex<mpsc::Receiver<Job>>>, config: EngineConfig) {
    let mut drbg: Option<Drbg> = None;
    loop {
        let next = match rx.lock() {
            Ok(mut guard) => guard.blocking_recv(),
            Err(poisoned) => poisoned.into_inner().blocking_recv(),
        };
        let Some(job) = next else {
            log::trace!("engine: worker {} exiting", id);
            return;
        };

        if let Some(status) = config.faults.fail_primitive {
            log::debug!("engine: injected {} for {}", status, job.op.name());
            job.finish(status);
            continue;
        }

        if drbg.is_none() {
            match Drbg::build(config.reseed_interval, config.faults.fail_rng_seed) {
                Ok(fresh) => drbg = Some(fresh),
                Err(status) => {
                    job.finish(status);
                    continue;
                }
            }
        }
        let Some(rng) = drbg.as_mut() else {
            continue;
        };

        let mut job = job;
        let status = EngineStatus::from_result(job.op.run(rng));
        log::trace!("engine: worker {} finished {}: {}", id, job.op.name(), status);
        job.finish(status);
    }
}
