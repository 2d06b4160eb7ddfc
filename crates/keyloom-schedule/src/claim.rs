//! Transcript-claim hook.
//!
//! Instrumentation and verification tooling can observe every labeled
//! expansion that carries a transcript context: the label is classified
//! against the RFC 8446 §7.1 catalogue and reported together with the raw
//! context bytes, before the expansion runs. The report is a side channel
//! only and never alters the derived output.

use std::fmt;
use std::sync::Arc;

/// Transcript range covered by the context of a labeled derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptPhase {
    /// ClientHello..ServerHello.
    ClientHelloToServerHello,
    /// ClientHello..server Finished.
    ThroughServerFinished,
    /// ClientHello..client Finished.
    ThroughClientFinished,
    /// Label not in the RFC 8446 §7.1 catalogue.
    Unknown,
}

/// Map an expansion label to the transcript range its context covers.
///
/// This is the protocol-label catalogue: every label RFC 8446 §7.1 derives
/// with a transcript context appears here exactly once.
pub fn phase_for_label(label: &[u8]) -> TranscriptPhase {
    match label {
        b"ext binder" | b"res binder" | b"c e traffic" | b"e exp master" => {
            TranscriptPhase::ClientHelloToServerHello
        }
        b"c hs traffic" | b"s hs traffic" => TranscriptPhase::ClientHelloToServerHello,
        b"c ap traffic" | b"s ap traffic" | b"exp master" => TranscriptPhase::ThroughServerFinished,
        b"res master" => TranscriptPhase::ThroughClientFinished,
        _ => TranscriptPhase::Unknown,
    }
}

/// Callback receiving the phase classification and the raw context bytes.
pub type ClaimFn = Arc<dyn Fn(TranscriptPhase, &[u8]) + Send + Sync>;

/// Hook invoked once per labeled expansion with a non-empty context.
///
/// The callback runs synchronously, in-line, before the cryptographic
/// result is produced; it receives borrowed bytes and cannot mutate the
/// schedule's secrets.
#[derive(Clone, Default)]
pub struct ClaimHook {
    callback: Option<ClaimFn>,
}

impl ClaimHook {
    /// A hook reporting to `callback`.
    pub fn new(callback: ClaimFn) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// A hook that reports nothing.
    pub fn disabled() -> Self {
        Self { callback: None }
    }

    pub(crate) fn report(&self, phase: TranscriptPhase, transcript: &[u8]) {
        if let Some(cb) = &self.callback {
            cb(phase, transcript);
        }
    }
}

impl fmt::Debug for ClaimHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimHook")
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_phase_table_early_labels() {
        for label in [
            b"ext binder".as_slice(),
            b"res binder",
            b"c e traffic",
            b"e exp master",
            b"c hs traffic",
            b"s hs traffic",
        ] {
            assert_eq!(
                phase_for_label(label),
                TranscriptPhase::ClientHelloToServerHello
            );
        }
    }

    #[test]
    fn test_phase_table_application_labels() {
        for label in [b"c ap traffic".as_slice(), b"s ap traffic", b"exp master"] {
            assert_eq!(phase_for_label(label), TranscriptPhase::ThroughServerFinished);
        }
        assert_eq!(
            phase_for_label(b"res master"),
            TranscriptPhase::ThroughClientFinished
        );
    }

    #[test]
    fn test_phase_table_unknown() {
        assert_eq!(phase_for_label(b"derived"), TranscriptPhase::Unknown);
        assert_eq!(phase_for_label(b"traffic upd"), TranscriptPhase::Unknown);
        assert_eq!(phase_for_label(b""), TranscriptPhase::Unknown);
        // Prefixes of catalogue labels do not match
        assert_eq!(phase_for_label(b"c hs"), TranscriptPhase::Unknown);
    }

    #[test]
    fn test_disabled_hook_is_silent() {
        // Must not panic
        ClaimHook::disabled().report(TranscriptPhase::Unknown, b"ctx");
    }

    #[test]
    fn test_hook_receives_phase_and_bytes() {
        let seen: Arc<Mutex<Vec<(TranscriptPhase, Vec<u8>)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let hook = ClaimHook::new(Arc::new(move |phase, transcript: &[u8]| {
            seen_clone.lock().unwrap().push((phase, transcript.to_vec()));
        }));

        hook.report(TranscriptPhase::ThroughServerFinished, &[1, 2, 3]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, TranscriptPhase::ThroughServerFinished);
        assert_eq!(seen[0].1, vec![1, 2, 3]);
    }
}
