//! Traffic key derivation.
//!
//! Derives concrete AEAD key + IV from a traffic secret (RFC 8446 §7.3).
//! Key and IV lengths come from the negotiated cipher suite, which lives
//! outside this crate.

use keyloom_types::{HashAlg, ScheduleError};
use zeroize::Zeroize;

use crate::claim::ClaimHook;
use crate::hkdf::expand_label_okm;
use crate::secret::Secret;

/// Concrete AEAD key + IV derived from a traffic secret.
pub struct TrafficKeys {
    /// AEAD encryption key.
    pub key: Vec<u8>,
    /// AEAD nonce/IV.
    pub iv: Vec<u8>,
}

impl Drop for TrafficKeys {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

impl TrafficKeys {
    /// Derive traffic keys from a traffic secret.
    ///
    /// ```text
    /// key = HKDF-Expand-Label(secret, "key", "", key_len)
    /// iv  = HKDF-Expand-Label(secret, "iv", "", iv_len)
    /// ```
    pub fn derive(
        digest: HashAlg,
        traffic_secret: &Secret,
        key_len: usize,
        iv_len: usize,
    ) -> Result<Self, ScheduleError> {
        let hook = ClaimHook::disabled();
        let key = expand_label_okm(digest, traffic_secret.as_bytes(), b"key", b"", key_len, &hook)?;
        let iv = expand_label_okm(digest, traffic_secret.as_bytes(), b"iv", b"", iv_len, &hook)?;
        Ok(TrafficKeys {
            key: key.to_vec(),
            iv: iv.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn secret_from(bytes: &[u8]) -> Secret {
        let mut s = Secret::new();
        s.init(bytes.len()).unwrap();
        s.as_mut_bytes().copy_from_slice(bytes);
        s
    }

    #[test]
    fn test_traffic_key_derivation_server_hs() {
        // RFC 8448 Section 3: server handshake traffic keys (AES-128-GCM)
        let server_hs =
            secret_from(&hex("b67b7d690cc16c4e75e54213cb2d37b4e9c912bcded9105d42befd59d391ad38"));

        let tk = TrafficKeys::derive(HashAlg::Sha256, &server_hs, 16, 12).unwrap();
        assert_eq!(to_hex(&tk.key), "3fce516009c21727d0f2e4e86ee403bc");
        assert_eq!(to_hex(&tk.iv), "5d313eb2671276ee13000b30");
    }

    #[test]
    fn test_traffic_key_derivation_client_hs() {
        // RFC 8448 Section 3: client handshake traffic keys
        let client_hs =
            secret_from(&hex("b3eddb126e067f35a780b3abf45e2d8f3b1a950738f52e9600746a0e27a55a21"));

        let tk = TrafficKeys::derive(HashAlg::Sha256, &client_hs, 16, 12).unwrap();
        assert_eq!(to_hex(&tk.key), "dbfaa693d1762c5b666af5d950258d01");
        assert_eq!(to_hex(&tk.iv), "5bd3c71b836e0b76bb73265f");
    }

    #[test]
    fn test_traffic_key_lengths_sha384() {
        let secret = secret_from(&[0xAA; 48]);
        let tk = TrafficKeys::derive(HashAlg::Sha384, &secret, 32, 12).unwrap();
        assert_eq!(tk.key.len(), 32);
        assert_eq!(tk.iv.len(), 12);
    }

    #[test]
    fn test_traffic_key_deterministic() {
        let secret = secret_from(&[0xBB; 32]);
        let tk1 = TrafficKeys::derive(HashAlg::Sha256, &secret, 16, 12).unwrap();
        let tk2 = TrafficKeys::derive(HashAlg::Sha256, &secret, 16, 12).unwrap();
        assert_eq!(tk1.key, tk2.key);
        assert_eq!(tk1.iv, tk2.iv);
        // Key and IV use different labels
        assert_ne!(tk1.key[..12], tk1.iv[..]);
    }
}
