#![no_main]
use keyloom_schedule::hkdf::hkdf_expand_label;
use keyloom_schedule::{ClaimHook, HashAlg, Secret};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte splits the input into label/context; the codec must never
    // panic, only reject oversized fields.
    let split = data.first().copied().unwrap_or(0) as usize;
    let rest = data.get(1..).unwrap_or(&[]);
    let split = split.min(rest.len());
    let (label, context) = rest.split_at(split);

    let mut secret = Secret::new();
    secret.init(32).unwrap();
    let mut out = Secret::new();
    out.init(32).unwrap();

    let _ = hkdf_expand_label(
        &mut out,
        HashAlg::Sha256,
        &secret,
        label,
        context,
        &ClaimHook::disabled(),
    );
});
