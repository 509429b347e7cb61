//! Property tests: agreement, fixed-length public values, generated keys

use proptest::prelude::*;

use tekpp_api::Kpp;
use tekpp_kpp::{DhSecret, EcdhSecret};
use tekpp_params::traditional::dh::TEST_SAFE_PRIME_256;
use tekpp_params::traditional::ecdh::{P192_N, P256_N};
use tekpp_tests::fixtures::{agree, be_less, compute, dh_blob, ecdh_blob, generate, keypair, tfm};

/// Exponent in `[2, 2^248)`, well inside `[2, P - 2]` for the test prime
fn dh_exponent() -> impl Strategy<Value = [u8; 31]> {
    any::<[u8; 31]>().prop_filter("exponent below 2", |x| {
        x[..30].iter().any(|b| *b != 0) || x[30] >= 2
    })
}

fn p192_scalar() -> impl Strategy<Value = [u8; 24]> {
    any::<[u8; 24]>().prop_filter("not in [1, n)", |d| {
        d.iter().any(|b| *b != 0) && be_less(d, &P192_N)
    })
}

fn p256_scalar() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>().prop_filter("not in [1, n)", |d| {
        d.iter().any(|b| *b != 0) && be_less(d, &P256_N)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn dh_parties_agree(xa in dh_exponent(), xb in dh_exponent()) {
        let (ka, kb) = agree(
            "dh",
            &dh_blob(&TEST_SAFE_PRIME_256, &xa),
            &dh_blob(&TEST_SAFE_PRIME_256, &xb),
        ).unwrap();
        prop_assert_eq!(ka.len(), TEST_SAFE_PRIME_256.p_size());
        prop_assert_eq!(ka, kb);
    }

    #[test]
    fn p192_parties_agree(da in p192_scalar(), db in p192_scalar()) {
        let (ka, kb) = agree("ecdh-nist-p192", &ecdh_blob(0, &da), &ecdh_blob(0, &db)).unwrap();
        prop_assert!(ka.len() <= 24);
        prop_assert_eq!(ka, kb);
    }

    #[test]
    fn p256_parties_agree(da in p256_scalar(), db in p256_scalar()) {
        let (ka, kb) = agree("ecdh-nist-p256", &ecdh_blob(0, &da), &ecdh_blob(0, &db)).unwrap();
        prop_assert!(ka.len() <= 32);
        prop_assert_eq!(ka, kb);
    }

    #[test]
    fn dh_public_value_is_padded(x in 2u64..) {
        // Small exponents give values far shorter than the modulus
        let t = tfm("dh");
        let public = keypair(&t, &dh_blob(&TEST_SAFE_PRIME_256, &x.to_be_bytes())).unwrap();
        prop_assert_eq!(public.len(), 32);
    }

    #[test]
    fn ecdh_public_value_is_padded(d in p256_scalar()) {
        let t = tfm("ecdh-nist-p256");
        let public = keypair(&t, &ecdh_blob(0, &d)).unwrap();
        prop_assert_eq!(public.len(), 64);
    }

    #[test]
    fn dh_blob_decode_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..96)) {
        if let Ok(secret) = DhSecret::decode(&buf) {
            prop_assert!(secret.key.len() <= secret.p.len());
            prop_assert!(secret.g.len() <= secret.p.len());
            let encoded = secret.encode().unwrap();
            prop_assert_eq!(encoded.as_slice(), &buf[..]);
        }
    }

    #[test]
    fn ecdh_blob_decode_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..48)) {
        if let Ok(secret) = EcdhSecret::decode(&buf) {
            let encoded = secret.encode().unwrap();
            prop_assert_eq!(encoded.as_slice(), &buf[..]);
        }
    }
}

#[test]
fn dh_tiny_public_value_keeps_full_width() {
    // 2^2 = 4: one significant byte, thirty-one bytes of padding
    let t = tfm("dh");
    let public = keypair(&t, &dh_blob(&TEST_SAFE_PRIME_256, &[0x02])).unwrap();
    let mut expected = [0u8; 32];
    expected[31] = 4;
    assert_eq!(public, expected);
}

#[test]
fn generated_keys_behave_like_explicit_ones() {
    for alg in ["dh", "ecdh-nist-p192", "ecdh-nist-p256"] {
        let blob = |key: &[u8]| {
            if alg == "dh" {
                dh_blob(&TEST_SAFE_PRIME_256, key)
            } else {
                ecdh_blob(0, key)
            }
        };
        let generated = tfm(alg);
        let explicit = tfm(alg);
        let generated_public = keypair(&generated, &blob(&[])).unwrap();
        let explicit_public = keypair(&explicit, &blob(&[0x07; 20])).unwrap();

        assert!(generated_public.iter().any(|b| *b != 0), "{}", alg);
        assert_eq!(generated_public.len(), explicit_public.len(), "{}", alg);

        let k1 = compute(&generated, &explicit_public, generated.max_size()).unwrap();
        let k2 = compute(&explicit, &generated_public, explicit.max_size()).unwrap();
        assert_eq!(k1, k2, "{}", alg);
    }
}

#[test]
fn generated_key_stays_fixed_across_requests() {
    let t = tfm("ecdh-nist-p256");
    let first = keypair(&t, &ecdh_blob(0, &[])).unwrap();
    let second = generate(&t, 64).unwrap();
    assert_eq!(first, second);

    let dh = tfm("dh");
    let first = keypair(&dh, &dh_blob(&TEST_SAFE_PRIME_256, &[])).unwrap();
    let second = generate(&dh, 32).unwrap();
    assert_eq!(first, second);
}
