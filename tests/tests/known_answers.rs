//! Known-answer tests driven through the `Kpp` interface

use tekpp_api::Kpp;
use tekpp_params::traditional::dh::TEST_SAFE_PRIME_256;
use tekpp_tests::fixtures::{compute, dh_blob, ecdh_blob, generate, tfm};
use tekpp_tests::vectors::{AgreementVector, DH_TEST_256, ECDH_P192, ECDH_P256};

fn secret_for(v: &AgreementVector, key: &[u8]) -> Vec<u8> {
    if v.alg == "dh" {
        dh_blob(&TEST_SAFE_PRIME_256, key)
    } else {
        ecdh_blob(0, key)
    }
}

fn check(v: &AgreementVector) {
    let sides = [
        (v.private_a, v.public_a, v.public_b),
        (v.private_b, v.public_b, v.public_a),
    ];
    for (private, public, peer) in sides {
        let t = tfm(v.alg);
        t.set_secret(&secret_for(v, &AgreementVector::bytes(private)))
            .unwrap();

        let ours = generate(&t, t.max_size()).unwrap();
        assert_eq!(hex::encode(&ours), public, "{} public value", v.alg);

        let shared = compute(&t, &AgreementVector::bytes(peer), t.max_size()).unwrap();
        assert_eq!(hex::encode(&shared), v.shared, "{} shared secret", v.alg);
    }
}

#[test]
fn ecdh_p192_vector() {
    check(&ECDH_P192);
}

#[test]
fn ecdh_p256_vector() {
    check(&ECDH_P256);
}

#[test]
fn dh_256_vector() {
    check(&DH_TEST_256);
}

#[test]
fn explicit_curve_id_matches_bound_curve() {
    use tekpp_params::traditional::ecdh::ECC_CURVE_NIST_P256;

    let t = tfm("ecdh-nist-p256");
    let key = AgreementVector::bytes(ECDH_P256.private_a);
    t.set_secret(&ecdh_blob(ECC_CURVE_NIST_P256, &key)).unwrap();
    let ours = generate(&t, 64).unwrap();
    assert_eq!(hex::encode(ours), ECDH_P256.public_a);
}
