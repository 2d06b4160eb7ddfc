//! Keying-material export (RFC 8446 §7.5).
//!
//! Derives external application-level keying material from the exporter
//! master secret.

use keyloom_crypto::hash;
use keyloom_types::{HashAlg, ScheduleError};

use crate::claim::ClaimHook;
use crate::hkdf::expand_label_okm;
use crate::secret::Secret;

/// Reserved labels that MUST NOT be used with key export (RFC 5705 §4).
const RESERVED_LABELS: &[&str] = &[
    "client finished",
    "server finished",
    "master secret",
    "extended master secret",
    "key expansion",
];

/// Validate that a label is not reserved.
pub fn validate_exporter_label(label: &[u8]) -> Result<(), ScheduleError> {
    if let Ok(label_str) = std::str::from_utf8(label) {
        for reserved in RESERVED_LABELS {
            if label_str == *reserved {
                return Err(ScheduleError::ReservedExportLabel(label_str.to_string()));
            }
        }
    }
    Ok(())
}

/// Export `length` bytes of keying material.
///
/// ```text
/// tmp = Derive-Secret(exporter_master, label, "")
/// out = HKDF-Expand-Label(tmp, "exporter", Hash(context), length)
/// ```
///
/// `context = None` and `context = Some(b"")` are equivalent (both hash
/// empty data).
pub fn export_keying_material(
    digest: HashAlg,
    exporter_master: &Secret,
    label: &[u8],
    context: Option<&[u8]>,
    length: usize,
    hook: &ClaimHook,
) -> Result<Vec<u8>, ScheduleError> {
    validate_exporter_label(label)?;

    let empty_hash = hash(digest, b"");
    let tmp = expand_label_okm(
        digest,
        exporter_master.as_bytes(),
        label,
        &empty_hash,
        digest.output_len(),
        hook,
    )?;

    let ctx_hash = hash(digest, context.unwrap_or(b""));
    let okm = expand_label_okm(digest, &tmp, b"exporter", &ctx_hash, length, hook)?;
    Ok(okm.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_from(bytes: &[u8]) -> Secret {
        let mut s = Secret::new();
        s.init(bytes.len()).unwrap();
        s.as_mut_bytes().copy_from_slice(bytes);
        s
    }

    #[test]
    fn test_validate_exporter_label_ok() {
        assert!(validate_exporter_label(b"my custom label").is_ok());
        assert!(validate_exporter_label(b"EXPORTER-my-protocol").is_ok());
    }

    #[test]
    fn test_validate_exporter_label_reserved() {
        for reserved in RESERVED_LABELS {
            assert!(matches!(
                validate_exporter_label(reserved.as_bytes()),
                Err(ScheduleError::ReservedExportLabel(_))
            ));
        }
    }

    #[test]
    fn test_export_deterministic() {
        let ems = secret_from(&[0xAA; 32]);
        let hook = ClaimHook::disabled();

        let out1 = export_keying_material(
            HashAlg::Sha256,
            &ems,
            b"test-exporter",
            Some(b"context data"),
            32,
            &hook,
        )
        .unwrap();
        let out2 = export_keying_material(
            HashAlg::Sha256,
            &ems,
            b"test-exporter",
            Some(b"context data"),
            32,
            &hook,
        )
        .unwrap();
        assert_eq!(out1, out2);
        assert_eq!(out1.len(), 32);
    }

    #[test]
    fn test_export_no_context_equals_empty_context() {
        let ems = secret_from(&[0xBB; 32]);
        let hook = ClaimHook::disabled();

        let out_none =
            export_keying_material(HashAlg::Sha256, &ems, b"test-exporter", None, 32, &hook)
                .unwrap();
        let out_empty =
            export_keying_material(HashAlg::Sha256, &ems, b"test-exporter", Some(b""), 32, &hook)
                .unwrap();
        assert_eq!(out_none, out_empty);
    }

    #[test]
    fn test_export_context_changes_output() {
        let ems = secret_from(&[0xBB; 32]);
        let hook = ClaimHook::disabled();

        let out_a =
            export_keying_material(HashAlg::Sha256, &ems, b"test-exporter", Some(b"a"), 32, &hook)
                .unwrap();
        let out_b =
            export_keying_material(HashAlg::Sha256, &ems, b"test-exporter", Some(b"b"), 32, &hook)
                .unwrap();
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn test_export_lengths() {
        let ems = secret_from(&[0xCC; 32]);
        let hook = ClaimHook::disabled();

        for len in [16, 32, 64] {
            let out =
                export_keying_material(HashAlg::Sha256, &ems, b"test-exporter", None, len, &hook)
                    .unwrap();
            assert_eq!(out.len(), len);
        }
    }

    #[test]
    fn test_export_reserved_label_rejected() {
        let ems = secret_from(&[0xDD; 32]);
        assert!(export_keying_material(
            HashAlg::Sha256,
            &ems,
            b"master secret",
            None,
            32,
            &ClaimHook::disabled(),
        )
        .is_err());
    }

    #[test]
    fn test_export_sha384() {
        let ems = secret_from(&[0xEE; 48]);
        let out = export_keying_material(
            HashAlg::Sha384,
            &ems,
            b"test-384",
            Some(b"ctx"),
            48,
            &ClaimHook::disabled(),
        )
        .unwrap();
        assert_eq!(out.len(), 48);
    }
}
