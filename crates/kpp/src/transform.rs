//! KPP transform: one context bound to an algorithm, an engine and a power domain

use core::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use tekpp_api::error::Result as ApiResult;
use tekpp_api::{Kpp, KppRequest, Submission};
use tekpp_engine::{Engine, PowerDomain, PowerRef};

use crate::context::{KppContext, Variant};
use crate::error::status_to_error;
use crate::registry::KppAlg;
use crate::request::{with_context, InFlight};
use crate::{dh, ecdh};

/// A key-agreement transform instance
pub struct KppTfm {
    alg: &'static KppAlg,
    engine: Arc<Engine>,
    power: Arc<dyn PowerDomain>,
    ctx: Arc<Mutex<KppContext>>,
    busy: Arc<AtomicBool>,
}

impl KppTfm {
    /// Instantiate `alg`, allocating its context on `engine`
    pub fn new(
        alg: &'static KppAlg,
        engine: Arc<Engine>,
        power: Arc<dyn PowerDomain>,
    ) -> ApiResult<Self> {
        let ctx = KppContext::init(alg.variant, &engine)?;
        log::debug!("kpp: allocated {} transform", alg.driver_name);
        Ok(Self {
            alg,
            engine,
            power,
            ctx: Arc::new(Mutex::new(ctx)),
            busy: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Descriptor this transform was created from
    pub fn alg(&self) -> &'static KppAlg {
        self.alg
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn power(&self) -> &Arc<dyn PowerDomain> {
        &self.power
    }

    pub(crate) fn context(&self) -> &Arc<Mutex<KppContext>> {
        &self.ctx
    }

    pub(crate) fn busy(&self) -> &Arc<AtomicBool> {
        &self.busy
    }
}

impl Kpp for KppTfm {
    fn alg_name(&self) -> &'static str {
        self.alg.name
    }

    fn set_secret(&self, secret: &[u8]) -> ApiResult<()> {
        const CTX: &str = "kpp set_secret";
        let _inflight = InFlight::claim(&self.busy, CTX)?;
        let _power = PowerRef::acquire(&self.power).map_err(|status| status_to_error(status, CTX))?;
        with_context(&self.ctx, CTX, |ctx| ctx.set_secret(secret))
    }

    fn max_size(&self) -> usize {
        with_context(&self.ctx, "kpp max_size", |ctx| Ok(ctx.max_size())).unwrap_or_else(|err| {
            log::warn!("{}: {}, reporting size 0", self.alg.driver_name, err);
            0
        })
    }

    fn generate_public_key(&self, req: KppRequest) -> Submission {
        match self.alg.variant {
            Variant::Dh => dh::generate_public_key(self, req),
            Variant::Ecdh(_) => ecdh::generate_public_key(self, req),
        }
    }

    fn compute_shared_secret(&self, req: KppRequest) -> Submission {
        match self.alg.variant {
            Variant::Dh => dh::compute_shared_secret(self, req),
            Variant::Ecdh(_) => ecdh::compute_shared_secret(self, req),
        }
    }
}

impl fmt::Debug for KppTfm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KppTfm")
            .field("alg", &self.alg.driver_name)
            .finish_non_exhaustive()
    }
}
