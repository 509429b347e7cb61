//! Algorithm registry
//!
//! [`KPP_ALGS`] lists the three algorithms this driver offers. They are
//! installed into an [`AlgRegistrar`] all-or-nothing: if one registration
//! fails, the ones before it are rolled back.

use std::collections::HashMap;
use std::sync::Arc;

use tekpp_api::error::{Error as ApiError, Result as ApiResult};
use tekpp_engine::{Engine, Operation, PowerDomain};
use tekpp_params::CurveId;

use crate::context::Variant;
use crate::transform::KppTfm;

/// Priority the driver registers its algorithms with
pub const KPP_PRIORITY: u32 = 300;

/// Static description of one algorithm
#[derive(Debug, PartialEq, Eq)]
pub struct KppAlg {
    /// Generic algorithm name
    pub name: &'static str,
    /// Name unique to this driver
    pub driver_name: &'static str,
    /// Selection priority among implementations of `name`
    pub priority: u32,
    /// Context variant and, for ECDH, its curve
    pub variant: Variant,
    /// Per-request scratch size
    pub reqsize: usize,
}

/// The algorithms this driver offers
pub static KPP_ALGS: [KppAlg; 3] = [
    KppAlg {
        name: "dh",
        driver_name: "dh-te",
        priority: KPP_PRIORITY,
        variant: Variant::Dh,
        reqsize: core::mem::size_of::<Operation>(),
    },
    KppAlg {
        name: "ecdh-nist-p192",
        driver_name: "ecdh-nist-p192-te",
        priority: KPP_PRIORITY,
        variant: Variant::Ecdh(CurveId::Secp192r1),
        reqsize: core::mem::size_of::<Operation>(),
    },
    KppAlg {
        name: "ecdh-nist-p256",
        driver_name: "ecdh-nist-p256-te",
        priority: KPP_PRIORITY,
        variant: Variant::Ecdh(CurveId::Secp256r1),
        reqsize: core::mem::size_of::<Operation>(),
    },
];

/// Something algorithms can be registered with
pub trait AlgRegistrar {
    /// Register one algorithm
    fn register(&mut self, alg: &'static KppAlg) -> ApiResult<()>;

    /// Remove a previously registered algorithm
    fn unregister(&mut self, alg: &'static KppAlg);
}

/// Register every entry of [`KPP_ALGS`], rolling back on failure
pub fn register_algs<R: AlgRegistrar + ?Sized>(registrar: &mut R) -> ApiResult<()> {
    for (i, alg) in KPP_ALGS.iter().enumerate() {
        if let Err(err) = registrar.register(alg) {
            log::warn!("kpp: failed to register {}: {}", alg.driver_name, err);
            for done in KPP_ALGS[..i].iter().rev() {
                registrar.unregister(done);
            }
            return Err(err);
        }
        log::debug!("kpp: registered {}", alg.driver_name);
    }
    Ok(())
}

/// Remove every entry of [`KPP_ALGS`]
pub fn unregister_algs<R: AlgRegistrar + ?Sized>(registrar: &mut R) {
    for alg in KPP_ALGS.iter().rev() {
        registrar.unregister(alg);
    }
}

/// In-process algorithm table
#[derive(Debug, Default)]
pub struct Registry {
    algs: HashMap<&'static str, &'static KppAlg>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the driver's algorithms installed
    pub fn with_driver_algs() -> ApiResult<Self> {
        let mut registry = Self::new();
        register_algs(&mut registry)?;
        Ok(registry)
    }

    /// Number of registered algorithms
    pub fn len(&self) -> usize {
        self.algs.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.algs.is_empty()
    }

    /// Look up by driver name, or the highest-priority match on generic name
    pub fn find(&self, name: &str) -> Option<&'static KppAlg> {
        if let Some(alg) = self.algs.get(name) {
            return Some(*alg);
        }
        self.algs
            .values()
            .filter(|alg| alg.name == name)
            .max_by_key(|alg| alg.priority)
            .copied()
    }

    /// Instantiate the algorithm registered under `name`
    pub fn alloc_tfm(
        &self,
        name: &str,
        engine: Arc<Engine>,
        power: Arc<dyn PowerDomain>,
    ) -> ApiResult<KppTfm> {
        let alg = self.find(name).ok_or(ApiError::InvalidArgument {
            context: "kpp alloc_tfm",
            reason: "no such algorithm",
        })?;
        KppTfm::new(alg, engine, power)
    }
}

impl AlgRegistrar for Registry {
    fn register(&mut self, alg: &'static KppAlg) -> ApiResult<()> {
        if self.algs.contains_key(alg.driver_name) {
            return Err(ApiError::InvalidArgument {
                context: "kpp register",
                reason: "driver name already registered",
            });
        }
        self.algs.insert(alg.driver_name, alg);
        Ok(())
    }

    fn unregister(&mut self, alg: &'static KppAlg) {
        self.algs.remove(alg.driver_name);
    }
}
