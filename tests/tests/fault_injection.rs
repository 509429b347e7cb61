//! Resource balance under injected failures
//!
//! Every flow below runs on a private engine and power domain; the harness
//! asserts after each run that handles and power references balance.

use tekpp_api::Error as ApiError;
use tekpp_engine::{CountingPower, EngineStatus, FaultPlan};
use tekpp_params::traditional::dh::TEST_SAFE_PRIME_256;
use tekpp_tests::fixtures::{dh_blob, ecdh_blob};
use tekpp_tests::harness::{Flow, Rig};
use tekpp_tests::init_logging;
use tekpp_tests::vectors::{AgreementVector, DH_TEST_256, ECDH_P192, ECDH_P256};

fn dh_flow(key: &[u8]) -> Flow {
    Flow {
        alg: "dh",
        secret: dh_blob(&TEST_SAFE_PRIME_256, key),
        peer: AgreementVector::bytes(DH_TEST_256.public_b),
        public_capacity: 32,
        shared_capacity: 32,
    }
}

fn ecdh_flow(v: &AgreementVector, key: &[u8], coords: usize) -> Flow {
    Flow {
        alg: v.alg,
        secret: ecdh_blob(0, key),
        peer: AgreementVector::bytes(v.public_b),
        public_capacity: coords,
        shared_capacity: coords / 2,
    }
}

fn flows() -> Vec<Flow> {
    vec![
        dh_flow(&[]),
        dh_flow(&AgreementVector::bytes(DH_TEST_256.private_a)),
        ecdh_flow(&ECDH_P192, &[], 48),
        ecdh_flow(&ECDH_P256, &[], 64),
        ecdh_flow(&ECDH_P256, &AgreementVector::bytes(ECDH_P256.private_a), 64),
    ]
}

#[test]
fn every_allocation_failure_is_balanced() {
    init_logging();
    for flow in flows() {
        let count = flow.alloc_count();
        assert!(count > 0);
        let outcomes = flow.sweep((1..=count).map(|n| {
            (format!("alloc {}/{}", n, count), Rig::new(FaultPlan::alloc_at(n)))
        }));
        for (n, outcome) in outcomes.iter().enumerate() {
            assert!(
                outcome
                    .errors
                    .iter()
                    .any(|e| matches!(e, ApiError::AllocationError { .. })),
                "{} alloc {}: {:?}",
                flow.alg,
                n + 1,
                outcome.errors
            );
        }
    }
}

#[test]
fn primitive_failures_are_balanced() {
    for flow in flows() {
        let statuses = [
            EngineStatus::Generic,
            EngineStatus::BadInputData,
            EngineStatus::NoMem,
            EngineStatus::GenRandom,
            EngineStatus::BadParams,
        ];
        let outcomes = flow.sweep(statuses.iter().map(|status| {
            (format!("primitive {}", status), Rig::new(FaultPlan::primitive(*status)))
        }));
        for outcome in outcomes {
            assert!(outcome.public.is_none());
            assert!(outcome.shared.is_none());
        }
    }
}

#[test]
fn rng_seed_failure_is_balanced() {
    for flow in flows() {
        let outcomes = flow.sweep([("rng".to_string(), Rig::new(FaultPlan::rng_seed()))]);
        assert!(outcomes[0]
            .errors
            .iter()
            .any(|e| matches!(e, ApiError::RngError { .. })));
    }
}

#[test]
fn refused_submissions_are_balanced() {
    for flow in flows() {
        let outcomes = flow.sweep((1..=2).map(|n| {
            (format!("reserve {}", n), Rig::new(FaultPlan::reserve_at(n)))
        }));
        for outcome in outcomes {
            assert!(outcome
                .errors
                .iter()
                .any(|e| matches!(e, ApiError::Busy { .. })));
        }
    }
}

#[test]
fn power_failures_are_balanced() {
    for flow in flows() {
        let outcomes = flow.sweep((1..=3).map(|n| {
            (
                format!("power {}", n),
                Rig::with_power(FaultPlan::none(), CountingPower::failing_at(n)),
            )
        }));
        for outcome in outcomes {
            assert!(outcome.errors.iter().any(|e| matches!(
                e,
                ApiError::PrimitiveEngineError { code, .. }
                    if *code == EngineStatus::PowerFailure.code() as i32
            )));
        }
    }
}

#[test]
fn decode_failures_are_balanced() {
    for mut flow in flows() {
        flow.secret.truncate(flow.secret.len() - 1);
        flow.sweep([("truncated blob".to_string(), Rig::new(FaultPlan::none()))]);

        flow.secret.clear();
        flow.sweep([("empty blob".to_string(), Rig::new(FaultPlan::none()))]);
    }

    for mut flow in flows() {
        flow.peer.pop();
        let outcomes = flow.sweep([("short peer".to_string(), Rig::new(FaultPlan::none()))]);
        assert!(outcomes[0]
            .errors
            .iter()
            .any(|e| matches!(e, ApiError::InvalidKeyFormat { .. })));
    }
}

#[test]
fn export_length_mismatches_are_balanced() {
    for mut flow in flows() {
        flow.public_capacity -= 1;
        flow.shared_capacity = 8;
        let outcomes = flow.sweep([("short dst".to_string(), Rig::new(FaultPlan::none()))]);
        let errors = &outcomes[0].errors;
        assert!(
            errors.iter().any(|e| matches!(e, ApiError::BadKeyLength { .. })),
            "{}: {:?}",
            flow.alg,
            errors
        );
    }
}

#[test]
fn clean_runs_are_balanced() {
    let power = CountingPower::new();
    let rig = Rig::with_power(FaultPlan::none(), power);
    for flow in flows() {
        let outcome = flow.run(&rig);
        assert!(outcome.is_clean(), "{}: {:?}", flow.alg, outcome.errors);
        rig.assert_balanced(flow.alg);
    }
    // set_secret, generate and compute each take one reference
    assert_eq!(rig.power.gets(), 3 * flows().len());
}
