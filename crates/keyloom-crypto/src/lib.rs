#![forbid(unsafe_code)]
//! Hash and HKDF primitives for the keyloom key schedule.
//!
//! Thin dispatch layer over the RustCrypto `sha2`/`hmac`/`hkdf` crates,
//! selected at runtime by [`HashAlg`]. The key-schedule engine consumes
//! these as opaque collaborators and never touches a concrete hash type.

mod kdf;

pub use kdf::{hash, hkdf_expand, hkdf_extract, hmac_hash};

pub use keyloom_types::HashAlg;
