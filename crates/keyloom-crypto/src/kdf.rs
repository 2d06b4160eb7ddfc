//! HKDF extract/expand and one-shot digest/HMAC (RFC 5869, FIPS 180-4).

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use keyloom_types::{CryptoError, HashAlg};
use sha2::{Digest, Sha256, Sha384};

/// One-shot digest: `Hash(data)`.
pub fn hash(alg: HashAlg, data: &[u8]) -> Vec<u8> {
    match alg {
        HashAlg::Sha256 => Sha256::digest(data).to_vec(),
        HashAlg::Sha384 => Sha384::digest(data).to_vec(),
    }
}

/// One-shot HMAC: `HMAC-Hash(key, data)`.
pub fn hmac_hash(alg: HashAlg, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    match alg {
        HashAlg::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(key).map_err(|_| CryptoError::HmacInvalidKey)?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        HashAlg::Sha384 => {
            let mut mac =
                Hmac::<Sha384>::new_from_slice(key).map_err(|_| CryptoError::HmacInvalidKey)?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// HKDF-Extract(salt, IKM) -> PRK.
///
/// An empty salt is treated as `Hash.length` zero bytes per RFC 5869.
pub fn hkdf_extract(alg: HashAlg, salt: &[u8], ikm: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let prk = match alg {
        HashAlg::Sha256 => Hkdf::<Sha256>::extract(Some(salt), ikm).0.to_vec(),
        HashAlg::Sha384 => Hkdf::<Sha384>::extract(Some(salt), ikm).0.to_vec(),
    };
    Ok(prk)
}

/// HKDF-Expand(PRK, info, out.len()) writing the OKM into `out`.
///
/// Fails if `prk` is shorter than the digest output or if `out` asks for
/// more than 255 hash blocks.
pub fn hkdf_expand(alg: HashAlg, prk: &[u8], info: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
    match alg {
        HashAlg::Sha256 => Hkdf::<Sha256>::from_prk(prk)
            .map_err(|_| CryptoError::HkdfPrkTooShort)?
            .expand(info, out)
            .map_err(|_| CryptoError::KdfDkLenOverflow),
        HashAlg::Sha384 => Hkdf::<Sha384>::from_prk(prk)
            .map_err(|_| CryptoError::HkdfPrkTooShort)?
            .expand(info, out)
            .map_err(|_| CryptoError::KdfDkLenOverflow),
    }
}
