#![forbid(unsafe_code)]
//! TLS 1.3 key schedule (RFC 8446 Section 7.1).
//!
//! Implements the full secret derivation chain for one connection:
//! Early Secret → Handshake Secret → Master Secret → traffic-secret updates.
//!
//! A [`SecretBundle`] owns every named secret of the schedule and enforces
//! the forward-only stage order; stages can never be skipped, repeated, or
//! reordered. Every secret buffer is wiped before release, and consumed
//! intermediate secrets are wiped at each stage boundary.
//!
//! The transcript hash, the digest, and the HKDF primitives are external
//! collaborators: callers feed in the running transcript hash, and a
//! [`ClaimHook`] observes every labeled expansion that carries a transcript
//! context.

pub mod claim;
pub mod export;
pub mod hkdf;
pub mod schedule;
pub mod secret;
pub mod traffic;

pub use claim::{ClaimHook, TranscriptPhase};
pub use schedule::{SecretBundle, SecretName};
pub use secret::Secret;
pub use traffic::TrafficKeys;

pub use keyloom_types::{CryptoError, HashAlg, ScheduleError};
