//! Curve arithmetic backends
//!
//! Scalar multiplication and point validation are delegated to the RustCrypto
//! `p192` and `p256` crates. Everything crossing this module's boundary is a
//! big-endian byte string so the rest of the engine stays curve-agnostic.

use elliptic_curve::ecdh::diffie_hellman;
use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{AffinePoint, CurveArithmetic, FieldBytes, FieldBytesSize, NonZeroScalar, PublicKey};
use rand::{CryptoRng, RngCore};
use tekpp_common::SecretVec;
use tekpp_params::traditional::ecdh::UNCOMPRESSED_POINT_TAG;
use tekpp_params::CurveId;
use zeroize::Zeroize;

use crate::status::{EngineStatus, Result};

fn scalar_from_be<C>(bytes: &[u8]) -> Result<NonZeroScalar<C>>
where
    C: CurveArithmetic,
{
    let mut repr = FieldBytes::<C>::default();
    let size = repr.len();
    if bytes.len() > size {
        return Err(EngineStatus::BadInputData);
    }
    repr[size - bytes.len()..].copy_from_slice(bytes);
    let scalar = Option::<NonZeroScalar<C>>::from(NonZeroScalar::<C>::from_repr(repr.clone()));
    repr.as_mut_slice().zeroize();
    scalar.ok_or(EngineStatus::BadInputData)
}

fn scalar_to_be<C>(scalar: &NonZeroScalar<C>) -> SecretVec
where
    C: CurveArithmetic,
{
    let mut repr: FieldBytes<C> = scalar.into();
    let out = SecretVec::from_slice(repr.as_slice());
    repr.as_mut_slice().zeroize();
    out
}

fn public_from_tagged<C>(tagged: &[u8]) -> Result<PublicKey<C>>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    if tagged.first() != Some(&UNCOMPRESSED_POINT_TAG) {
        return Err(EngineStatus::BadInputData);
    }
    PublicKey::<C>::from_sec1_bytes(tagged).map_err(|_| EngineStatus::BadInputData)
}

fn mul_base<C>(scalar_be: &[u8]) -> Result<Vec<u8>>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let scalar = scalar_from_be::<C>(scalar_be)?;
    let public = PublicKey::<C>::from_secret_scalar(&scalar);
    Ok(public.to_encoded_point(false).as_bytes().to_vec())
}

fn shared_x<C>(scalar_be: &[u8], peer_tagged: &[u8]) -> Result<SecretVec>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let scalar = scalar_from_be::<C>(scalar_be)?;
    let peer = public_from_tagged::<C>(peer_tagged)?;
    let shared = diffie_hellman(scalar, peer.as_affine());
    Ok(SecretVec::from_slice(shared.raw_secret_bytes().as_slice()))
}

fn random_scalar<C, R>(rng: &mut R) -> SecretVec
where
    C: CurveArithmetic,
    R: RngCore + CryptoRng,
{
    scalar_to_be(&NonZeroScalar::<C>::random(rng))
}

/// Check that `tagged` is an uncompressed encoding of a non-identity point on `curve`
pub(crate) fn validate_point(curve: CurveId, tagged: &[u8]) -> Result<()> {
    if tagged.len() != curve.tagged_public_key_size() {
        return Err(EngineStatus::BadInputData);
    }
    match curve {
        CurveId::Secp192r1 => public_from_tagged::<p192::NistP192>(tagged).map(|_| ()),
        CurveId::Secp256r1 => public_from_tagged::<p256::NistP256>(tagged).map(|_| ()),
    }
}

/// `d * G`, returned as a tagged uncompressed point
pub(crate) fn base_mul(curve: CurveId, scalar_be: &[u8]) -> Result<Vec<u8>> {
    match curve {
        CurveId::Secp192r1 => mul_base::<p192::NistP192>(scalar_be),
        CurveId::Secp256r1 => mul_base::<p256::NistP256>(scalar_be),
    }
}

/// X coordinate of `d * peer`, full field width
pub(crate) fn ecdh_x(curve: CurveId, scalar_be: &[u8], peer_tagged: &[u8]) -> Result<SecretVec> {
    validate_point(curve, peer_tagged)?;
    match curve {
        CurveId::Secp192r1 => shared_x::<p192::NistP192>(scalar_be, peer_tagged),
        CurveId::Secp256r1 => shared_x::<p256::NistP256>(scalar_be, peer_tagged),
    }
}

/// Uniform scalar in `[1, n - 1]`, full field width
pub(crate) fn gen_scalar<R>(curve: CurveId, rng: &mut R) -> SecretVec
where
    R: RngCore + CryptoRng,
{
    match curve {
        CurveId::Secp192r1 => random_scalar::<p192::NistP192, R>(rng),
        CurveId::Secp256r1 => random_scalar::<p256::NistP256, R>(rng),
    }
}
