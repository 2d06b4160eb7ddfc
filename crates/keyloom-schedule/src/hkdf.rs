//! HKDF-Expand-Label codec (RFC 8446 Section 7.1).
//!
//! Builds the `HkdfLabel` wire structure and runs the expansion through the
//! `keyloom-crypto` collaborator:
//!
//! ```text
//! struct {
//!     uint16 length;
//!     opaque label<7..255>;   // "tls13 " + label
//!     opaque context<0..255>;
//! } HkdfLabel;
//! ```

use keyloom_crypto::hkdf_expand;
use keyloom_types::{HashAlg, ScheduleError};
use zeroize::Zeroizing;

use crate::claim::{phase_for_label, ClaimHook};
use crate::secret::Secret;

const LABEL_PREFIX: &[u8] = b"tls13 ";

/// Encode the HkdfLabel structure. Length prefixes are single-byte; either
/// prefixed field exceeding 255 bytes is a codec failure.
fn encode_hkdf_label(
    out_len: usize,
    label: &[u8],
    context: &[u8],
) -> Result<Vec<u8>, ScheduleError> {
    let full_label_len = LABEL_PREFIX.len() + label.len();
    if full_label_len > u8::MAX as usize
        || context.len() > u8::MAX as usize
        || out_len > u16::MAX as usize
    {
        return Err(ScheduleError::LabelOverflow);
    }

    let mut info = Vec::with_capacity(2 + 1 + full_label_len + 1 + context.len());
    info.extend_from_slice(&(out_len as u16).to_be_bytes());
    info.push(full_label_len as u8);
    info.extend_from_slice(LABEL_PREFIX);
    info.extend_from_slice(label);
    info.push(context.len() as u8);
    info.extend_from_slice(context);
    Ok(info)
}

/// Expand `len` bytes from `secret` under `label`/`context`, reporting a
/// non-empty context to the claim hook before the expansion.
pub(crate) fn expand_label_okm(
    digest: HashAlg,
    secret: &[u8],
    label: &[u8],
    context: &[u8],
    len: usize,
    hook: &ClaimHook,
) -> Result<Zeroizing<Vec<u8>>, ScheduleError> {
    if !context.is_empty() {
        hook.report(phase_for_label(label), context);
    }

    let info = encode_hkdf_label(len, label, context)?;
    let mut okm = Zeroizing::new(vec![0u8; len]);
    hkdf_expand(digest, secret, &info, &mut okm)?;
    Ok(okm)
}

/// HKDF-Expand-Label(secret, label, context, out.len()) written into `out`.
///
/// With a non-empty `context`, the label is classified against the RFC 8446
/// §7.1 catalogue and `(phase, context)` is reported to `hook` before the
/// expansion; the report never alters the derived output. On failure `out`
/// is left byte-for-byte unmodified.
pub fn hkdf_expand_label(
    out: &mut Secret,
    digest: HashAlg,
    secret: &Secret,
    label: &[u8],
    context: &[u8],
    hook: &ClaimHook,
) -> Result<(), ScheduleError> {
    let okm = expand_label_okm(digest, secret.as_bytes(), label, context, out.len(), hook)?;
    out.as_mut_bytes().copy_from_slice(&okm);
    Ok(())
}

/// Derive-Secret(secret, label, transcript) at a phase boundary.
///
/// Behaviorally identical to [`hkdf_expand_label`]; kept as a distinct
/// entry point for the RFC 8446 §7.1 phase-boundary derivations.
pub fn derive_secret(
    out: &mut Secret,
    digest: HashAlg,
    secret: &Secret,
    label: &[u8],
    context: &[u8],
    hook: &ClaimHook,
) -> Result<(), ScheduleError> {
    hkdf_expand_label(out, digest, secret, label, context, hook)
}
