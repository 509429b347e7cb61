//! Engines, transforms and blobs for integration tests

use std::sync::{Arc, OnceLock};

use tekpp_api::{Error as ApiError, Kpp, KppRequest, Result as ApiResult};
use tekpp_engine::{AlwaysOn, Engine, EngineConfig, PowerDomain};
use tekpp_kpp::{DhSecret, EcdhSecret, KppTfm, Registry};
use tekpp_params::DhGroup;

/// Engine shared by tests that do not inspect its meter
pub fn shared_engine() -> Arc<Engine> {
    static ENGINE: OnceLock<Arc<Engine>> = OnceLock::new();
    ENGINE
        .get_or_init(|| {
            let config = EngineConfig::default().with_workers(2);
            Arc::new(Engine::start(config).expect("engine starts"))
        })
        .clone()
}

/// Registry holding the driver's algorithms
pub fn registry() -> Registry {
    Registry::with_driver_algs().expect("driver algorithms register")
}

/// Transform for `name` on the shared engine, always powered
pub fn tfm(name: &str) -> KppTfm {
    registry()
        .alloc_tfm(name, shared_engine(), Arc::new(AlwaysOn))
        .expect("transform allocates")
}

/// Transform for `name` on a caller-chosen engine and power domain
pub fn tfm_on(name: &str, engine: &Arc<Engine>, power: Arc<dyn PowerDomain>) -> ApiResult<KppTfm> {
    registry().alloc_tfm(name, Arc::clone(engine), power)
}

/// Encoded DH secret for `group`; an empty `key` asks for a generated exponent
pub fn dh_blob(group: &DhGroup, key: &[u8]) -> Vec<u8> {
    DhSecret {
        key,
        p: group.prime,
        g: group.generator,
    }
    .encode()
    .expect("dh blob encodes")
    .as_slice()
    .to_vec()
}

/// Encoded ECDH secret; curve id 0 selects the transform's own curve
pub fn ecdh_blob(curve_id: u16, key: &[u8]) -> Vec<u8> {
    EcdhSecret { curve_id, key }
        .encode()
        .expect("ecdh blob encodes")
        .as_slice()
        .to_vec()
}

/// Generate the public value into a `capacity`-byte buffer and wait for it
pub fn generate<K: Kpp + ?Sized>(tfm: &K, capacity: usize) -> ApiResult<Vec<u8>> {
    let pending = tfm.generate_public_key(KppRequest::new(capacity))?;
    pending.wait()?.into_output()
}

/// Combine `peer` into a `capacity`-byte buffer and wait for the result
pub fn compute<K: Kpp + ?Sized>(tfm: &K, peer: &[u8], capacity: usize) -> ApiResult<Vec<u8>> {
    let pending = tfm.compute_shared_secret(KppRequest::with_src_bytes(peer, capacity))?;
    pending.wait()?.into_output()
}

/// Install `secret` and generate the matching public value
pub fn keypair<K: Kpp + ?Sized>(tfm: &K, secret: &[u8]) -> ApiResult<Vec<u8>> {
    tfm.set_secret(secret)?;
    generate(tfm, tfm.max_size())
}

/// Two independent parties agree; returns both sides' shared secrets
pub fn agree(name: &str, secret_a: &[u8], secret_b: &[u8]) -> ApiResult<(Vec<u8>, Vec<u8>)> {
    let a = tfm(name);
    let b = tfm(name);
    let public_a = keypair(&a, secret_a)?;
    let public_b = keypair(&b, secret_b)?;
    let shared_a = compute(&a, &public_b, a.max_size())?;
    let shared_b = compute(&b, &public_a, b.max_size())?;
    Ok((shared_a, shared_b))
}

/// Big-endian `a < b` for equal-length byte strings
pub fn be_less(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a < b
}

/// Whether `e` is a synchronous or completion-time key-format error
pub fn is_key_format(e: &ApiError) -> bool {
    matches!(e, ApiError::InvalidKeyFormat { .. })
}
