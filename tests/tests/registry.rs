//! Algorithm registration and transform allocation

use std::sync::Arc;

use tekpp_api::{Error as ApiError, Kpp, Result as ApiResult};
use tekpp_engine::{AlwaysOn, Engine};
use tekpp_kpp::registry::KPP_PRIORITY;
use tekpp_kpp::{register_algs, unregister_algs, AlgRegistrar, KppAlg, Registry, Variant, KPP_ALGS};
use tekpp_params::CurveId;
use tekpp_tests::fixtures::{registry, shared_engine};

#[test]
fn every_algorithm_allocates() {
    let reg = registry();
    for alg in KPP_ALGS.iter() {
        for name in [alg.name, alg.driver_name] {
            let t = reg
                .alloc_tfm(name, shared_engine(), Arc::new(AlwaysOn))
                .unwrap();
            assert_eq!(t.alg_name(), alg.name);
            assert_eq!(t.alg(), alg);
        }
    }
}

#[test]
fn descriptors() {
    assert!(KPP_ALGS.iter().all(|a| a.priority == KPP_PRIORITY));
    assert!(KPP_ALGS.iter().all(|a| a.driver_name.starts_with(a.name)));
    assert_eq!(KPP_ALGS[1].variant, Variant::Ecdh(CurveId::Secp192r1));
}

#[test]
fn unknown_names_are_invalid() {
    let reg = registry();
    let err = reg
        .alloc_tfm("ecdh-nist-p521", shared_engine(), Arc::new(AlwaysOn))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument { .. }));
    assert!(Registry::new().find("dh").is_none());
}

#[test]
fn alloc_failure_reports_allocation_error() {
    use tekpp_engine::{EngineConfig, FaultPlan};

    let config = EngineConfig::default().with_faults(FaultPlan::alloc_at(1));
    let engine = Arc::new(Engine::start(config).unwrap());
    let err = registry()
        .alloc_tfm("dh", Arc::clone(&engine), Arc::new(AlwaysOn))
        .unwrap_err();
    assert!(matches!(err, ApiError::AllocationError { .. }));
    assert_eq!(engine.meter().live(), 0);
}

/// Records registrations in order and refuses a chosen driver name
#[derive(Default)]
struct Journal {
    live: Vec<&'static str>,
    refuse: Option<&'static str>,
}

impl AlgRegistrar for Journal {
    fn register(&mut self, alg: &'static KppAlg) -> ApiResult<()> {
        if self.refuse == Some(alg.driver_name) {
            return Err(ApiError::InvalidArgument {
                context: "journal",
                reason: "refused",
            });
        }
        self.live.push(alg.driver_name);
        Ok(())
    }

    fn unregister(&mut self, alg: &'static KppAlg) {
        self.live.retain(|name| *name != alg.driver_name);
    }
}

#[test]
fn registration_is_all_or_nothing() {
    let mut ok = Journal::default();
    register_algs(&mut ok).unwrap();
    assert_eq!(ok.live, ["dh-te", "ecdh-nist-p192-te", "ecdh-nist-p256-te"]);
    unregister_algs(&mut ok);
    assert!(ok.live.is_empty());

    let mut refusing = Journal {
        refuse: Some("ecdh-nist-p256-te"),
        ..Journal::default()
    };
    assert!(register_algs(&mut refusing).is_err());
    assert!(refusing.live.is_empty());
}
