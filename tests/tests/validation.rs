//! Input validation: curve selection, secret blobs and peer values

use tekpp_api::{Error as ApiError, Kpp, KppRequest};
use tekpp_kpp::DhSecret;
use tekpp_params::traditional::dh::{MODP_2048, TEST_SAFE_PRIME_256};
use tekpp_params::traditional::ecdh::{ECC_CURVE_NIST_P192, ECC_CURVE_NIST_P256};
use tekpp_tests::fixtures::{compute, dh_blob, ecdh_blob, generate, is_key_format, keypair, tfm};
use tekpp_tests::vectors::{AgreementVector, DH_TEST_256, ECDH_P256};

#[test]
fn unknown_curve_ids_are_unsupported() {
    for (alg, curve_id) in [
        ("ecdh-nist-p256", 3u16),
        ("ecdh-nist-p256", 0xFFFF),
        ("ecdh-nist-p256", ECC_CURVE_NIST_P192),
        ("ecdh-nist-p192", ECC_CURVE_NIST_P256),
    ] {
        let t = tfm(alg);
        assert_eq!(
            t.set_secret(&ecdh_blob(curve_id, &[])),
            Err(ApiError::UnsupportedCurve { curve_id }),
            "{} with curve {}",
            alg,
            curve_id
        );
        // Nothing was installed
        let rejected = t.generate_public_key(KppRequest::new(64)).unwrap_err();
        assert!(matches!(rejected.error, ApiError::MissingSecret { .. }));
    }
}

#[test]
fn unsupported_curve_keeps_previous_key() {
    let t = tfm("ecdh-nist-p256");
    let key = AgreementVector::bytes(ECDH_P256.private_a);
    t.set_secret(&ecdh_blob(0, &key)).unwrap();

    assert!(matches!(
        t.set_secret(&ecdh_blob(7, &[0x11; 32])),
        Err(ApiError::UnsupportedCurve { curve_id: 7 })
    ));
    let public = generate(&t, 64).unwrap();
    assert_eq!(hex::encode(public), ECDH_P256.public_a);
}

#[test]
fn malformed_blobs_are_key_format_errors() {
    let dh = tfm("dh");
    let good = dh_blob(&TEST_SAFE_PRIME_256, &[]);
    let cases: Vec<Vec<u8>> = vec![
        Vec::new(),
        good[..good.len() - 1].to_vec(),
        ecdh_blob(0, &[]),
        // Even modulus
        dh_blob(
            &tekpp_params::DhGroup {
                name: "even",
                prime: &[0x10, 0x00],
                generator: &[0x02],
            },
            &[],
        ),
    ];
    for blob in cases {
        let err = dh.set_secret(&blob).unwrap_err();
        assert!(is_key_format(&err), "blob {:02x?}: {:?}", blob, err);
    }

    let ecdh = tfm("ecdh-nist-p192");
    assert!(is_key_format(&ecdh.set_secret(&good).unwrap_err()));
    // Longer than the field
    assert!(is_key_format(&ecdh.set_secret(&ecdh_blob(0, &[0x01; 25])).unwrap_err()));
    // Zero scalar given explicitly
    assert!(is_key_format(&ecdh.set_secret(&ecdh_blob(0, &[0; 24])).unwrap_err()));
    // The order itself
    let n = tekpp_params::traditional::ecdh::P192_N;
    assert!(is_key_format(&ecdh.set_secret(&ecdh_blob(0, &n)).unwrap_err()));
}

#[test]
fn dh_exponent_must_be_below_modulus() {
    let dh = tfm("dh");
    let err = dh
        .set_secret(&dh_blob(&TEST_SAFE_PRIME_256, TEST_SAFE_PRIME_256.prime))
        .unwrap_err();
    assert!(is_key_format(&err), "{:?}", err);
}

fn raw_dh_blob(p: &[u8], g: &[u8], key: &[u8]) -> Vec<u8> {
    DhSecret { key, p, g }.encode().unwrap().as_slice().to_vec()
}

#[test]
fn dh_generator_and_exponent_stay_inside_the_open_range() {
    let p = TEST_SAFE_PRIME_256.prime;
    let mut p_minus_one = p.to_vec();
    p_minus_one[31] -= 1;
    let mut p_minus_two = p.to_vec();
    p_minus_two[31] -= 2;

    let dh = tfm("dh");
    keypair(&dh, &dh_blob(&TEST_SAFE_PRIME_256, &[])).unwrap();
    let before = dh.max_size();

    for (label, g, key) in [
        ("g = 1", &[1u8][..], &[][..]),
        ("g = p - 1", &p_minus_one[..], &[][..]),
        ("g = p", p, &[][..]),
        ("x = 1", &[2u8][..], &[1u8][..]),
        ("x = p - 1", &[2u8][..], &p_minus_one[..]),
    ] {
        let err = dh.set_secret(&raw_dh_blob(p, g, key)).unwrap_err();
        assert!(is_key_format(&err), "{}: {:?}", label, err);
    }
    assert_eq!(dh.max_size(), before);

    // Both ends of [2, P - 2] are accepted and usable
    dh.set_secret(&raw_dh_blob(p, &p_minus_two, &[])).unwrap();
    assert_eq!(generate(&dh, 32).unwrap().len(), 32);
    dh.set_secret(&raw_dh_blob(p, &[2], &p_minus_two)).unwrap();
    assert_eq!(generate(&dh, 32).unwrap().len(), 32);
    dh.set_secret(&raw_dh_blob(p, &[2], &[2])).unwrap();
    assert_eq!(generate(&dh, 32).unwrap().len(), 32);
}

#[test]
fn dh_peer_of_wrong_length_is_rejected_synchronously() {
    let dh = tfm("dh");
    keypair(&dh, &dh_blob(&TEST_SAFE_PRIME_256, &[])).unwrap();

    for len in [0usize, 31, 33, 64] {
        let rejected = dh
            .compute_shared_secret(KppRequest::with_src_bytes(&vec![0x42; len], 32))
            .unwrap_err();
        assert!(is_key_format(&rejected.error), "len {}: {:?}", len, rejected.error);
        assert_eq!(rejected.request.dst_len, 32);
        assert!(rejected.request.dst.to_vec(32).iter().all(|b| *b == 0));
    }
}

#[test]
fn dh_degenerate_peer_values_fail_without_output() {
    let dh = tfm("dh");
    let key = AgreementVector::bytes(DH_TEST_256.private_a);
    keypair(&dh, &dh_blob(&TEST_SAFE_PRIME_256, &key)).unwrap();

    let p = TEST_SAFE_PRIME_256.prime;
    let mut one = [0u8; 32];
    one[31] = 1;
    let mut p_minus_one = [0u8; 32];
    p_minus_one.copy_from_slice(p);
    p_minus_one[31] -= 1;

    for peer in [[0u8; 32], one, p_minus_one, [0xFF; 32]] {
        let done = dh
            .compute_shared_secret(KppRequest::with_src_bytes(&peer, 32))
            .unwrap()
            .wait()
            .unwrap();
        let err = done.result.as_ref().unwrap_err();
        assert!(is_key_format(err), "peer {}: {:?}", hex::encode(peer), err);
        assert!(done.request.dst.to_vec(32).iter().all(|b| *b == 0));
    }
}

#[test]
fn ecdh_off_curve_peer_is_rejected() {
    let t = tfm("ecdh-nist-p256");
    keypair(&t, &ecdh_blob(0, &[])).unwrap();

    let mut public = AgreementVector::bytes(ECDH_P256.public_b);
    public[63] ^= 0x01;
    for peer in [public, vec![0u8; 64], vec![0xFF; 64]] {
        let rejected = t
            .compute_shared_secret(KppRequest::with_src_bytes(&peer, 32))
            .unwrap_err();
        assert!(is_key_format(&rejected.error), "{:?}", rejected.error);
        assert_eq!(rejected.request.dst_len, 32);
        assert!(rejected.request.dst.to_vec(32).iter().all(|b| *b == 0));
    }
}

#[test]
fn short_destinations() {
    let dh = tfm("dh");
    dh.set_secret(&dh_blob(&TEST_SAFE_PRIME_256, &[])).unwrap();
    assert!(matches!(
        generate(&dh, 31),
        Err(ApiError::BadKeyLength { expected: 32, actual: 31, .. })
    ));

    let ecdh = tfm("ecdh-nist-p256");
    ecdh.set_secret(&ecdh_blob(0, &AgreementVector::bytes(ECDH_P256.private_a)))
        .unwrap();
    assert!(matches!(
        generate(&ecdh, 63),
        Err(ApiError::BadKeyLength { expected: 64, actual: 63, .. })
    ));
    let peer = AgreementVector::bytes(ECDH_P256.public_b);
    assert!(matches!(
        compute(&ecdh, &peer, 16),
        Err(ApiError::InvalidArgument { .. })
    ));
    assert_eq!(hex::encode(compute(&ecdh, &peer, 32).unwrap()), ECDH_P256.shared);
}

#[test]
fn requests_before_set_secret() {
    for (alg, size) in [("dh", 0), ("ecdh-nist-p192", 48), ("ecdh-nist-p256", 64)] {
        let t = tfm(alg);
        assert_eq!(t.max_size(), size, "{}", alg);
        let rejected = t.generate_public_key(KppRequest::new(64)).unwrap_err();
        assert!(matches!(rejected.error, ApiError::MissingSecret { .. }), "{}", alg);
        let rejected = t
            .compute_shared_secret(KppRequest::with_src_bytes(&[1; 48], 64))
            .unwrap_err();
        assert!(matches!(rejected.error, ApiError::MissingSecret { .. }), "{}", alg);
    }
}

#[test]
fn dh_compute_before_generate_needs_exponent() {
    // A generated exponent only exists once a public value was produced
    let dh = tfm("dh");
    dh.set_secret(&dh_blob(&TEST_SAFE_PRIME_256, &[])).unwrap();
    let rejected = dh
        .compute_shared_secret(KppRequest::with_src_bytes(&[0x42; 32], 32))
        .unwrap_err();
    assert!(matches!(rejected.error, ApiError::MissingSecret { .. }));
}

#[test]
fn resetting_the_modulus_resizes_outputs() {
    let dh = tfm("dh");
    dh.set_secret(&dh_blob(&TEST_SAFE_PRIME_256, &[])).unwrap();
    assert_eq!(dh.max_size(), 32);
    dh.set_secret(&dh_blob(&MODP_2048, &[])).unwrap();
    assert_eq!(dh.max_size(), 256);
    let public = generate(&dh, 256).unwrap();
    assert_eq!(public.len(), 256);
}
