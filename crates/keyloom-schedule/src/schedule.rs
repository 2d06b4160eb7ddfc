//! The TLS 1.3 derivation state machine (RFC 8446 Section 7.1).
//!
//! A [`SecretBundle`] owns every named secret of one connection's key
//! schedule and walks the fixed stage order
//! `Init → EarlyDone → HandshakeDone → ScheduleDone`, with post-handshake
//! traffic-secret updates available once the schedule is complete. Stage
//! flags are monotonic: a stage can neither be skipped nor repeated.
//!
//! Consumed intermediate secrets (`extracted_early`, `derived_early`,
//! `extracted_handshake`, `derived_handshake`, `extracted_master`) are
//! wiped the moment their dependent derivations complete.

use keyloom_crypto::{hash, hkdf_extract, hmac_hash};
use keyloom_types::{HashAlg, ScheduleError};
use zeroize::Zeroizing;

use crate::claim::ClaimHook;
use crate::hkdf::{derive_secret, expand_label_okm};
use crate::secret::Secret;

/// Logical names of the secrets held by a [`SecretBundle`].
///
/// Destruction and audit code iterates [`SecretName::ALL`] instead of
/// spelling out sixteen field accesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretName {
    Zeros,
    EmptyHash,
    ExtractedEarly,
    BinderKey,
    ClientEarlyTraffic,
    EarlyExporterMaster,
    DerivedEarly,
    ExtractedHandshake,
    ClientHandshakeTraffic,
    ServerHandshakeTraffic,
    DerivedHandshake,
    ExtractedMaster,
    ClientApplicationTraffic,
    ServerApplicationTraffic,
    ExporterMaster,
    ResumptionMaster,
}

impl SecretName {
    /// Every secret in a bundle, in derivation order.
    pub const ALL: [SecretName; 16] = [
        SecretName::Zeros,
        SecretName::EmptyHash,
        SecretName::ExtractedEarly,
        SecretName::BinderKey,
        SecretName::ClientEarlyTraffic,
        SecretName::EarlyExporterMaster,
        SecretName::DerivedEarly,
        SecretName::ExtractedHandshake,
        SecretName::ClientHandshakeTraffic,
        SecretName::ServerHandshakeTraffic,
        SecretName::DerivedHandshake,
        SecretName::ExtractedMaster,
        SecretName::ClientApplicationTraffic,
        SecretName::ServerApplicationTraffic,
        SecretName::ExporterMaster,
        SecretName::ResumptionMaster,
    ];
}

/// All named secrets for one connection's key schedule, plus the
/// stage-completion flags.
///
/// Created once per connection; every contained secret is zeroized on drop.
/// Not internally synchronized: one bundle models one connection's state
/// and callers serialize access.
pub struct SecretBundle {
    digest: HashAlg,
    resumption: bool,
    insecure: bool,

    init_done: bool,
    early_done: bool,
    handshake_done: bool,
    schedule_done: bool,

    zeros: Secret,
    empty_hash: Secret,
    extracted_early: Secret,
    binder_key: Secret,
    client_early_traffic: Secret,
    early_exporter_master: Secret,
    derived_early: Secret,
    extracted_handshake: Secret,
    client_handshake_traffic: Secret,
    server_handshake_traffic: Secret,
    derived_handshake: Secret,
    extracted_master: Secret,
    client_application_traffic: Secret,
    server_application_traffic: Secret,
    exporter_master: Secret,
    resumption_master: Secret,
}

impl Drop for SecretBundle {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl SecretBundle {
    /// Allocate the full set of secrets for one key schedule, sized to the
    /// digest output length, and compute `empty_hash = Hash("")`.
    ///
    /// `resumption` selects the binder-key label (`"res binder"` vs
    /// `"ext binder"`). On any failure the partially-built bundle is
    /// dropped (and thereby zeroized); no partial bundle escapes.
    pub fn new(digest: HashAlg, resumption: bool) -> Result<Self, ScheduleError> {
        Self::build(digest, resumption, false)
    }

    /// Like [`SecretBundle::new`], with stage-boundary zeroization of
    /// consumed intermediates disabled so diagnostic tooling can read them.
    #[cfg(feature = "insecure-secrets")]
    pub fn new_insecure(digest: HashAlg, resumption: bool) -> Result<Self, ScheduleError> {
        Self::build(digest, resumption, true)
    }

    fn build(digest: HashAlg, resumption: bool, insecure: bool) -> Result<Self, ScheduleError> {
        let hash_len = digest.output_len();

        let mut bundle = SecretBundle {
            digest,
            resumption,
            insecure,
            init_done: false,
            early_done: false,
            handshake_done: false,
            schedule_done: false,
            zeros: Secret::new(),
            empty_hash: Secret::new(),
            extracted_early: Secret::new(),
            binder_key: Secret::new(),
            client_early_traffic: Secret::new(),
            early_exporter_master: Secret::new(),
            derived_early: Secret::new(),
            extracted_handshake: Secret::new(),
            client_handshake_traffic: Secret::new(),
            server_handshake_traffic: Secret::new(),
            derived_handshake: Secret::new(),
            extracted_master: Secret::new(),
            client_application_traffic: Secret::new(),
            server_application_traffic: Secret::new(),
            exporter_master: Secret::new(),
            resumption_master: Secret::new(),
        };

        for name in SecretName::ALL {
            bundle.secret_mut(name).init(hash_len)?;
        }

        let empty = hash(digest, b"");
        if empty.len() != hash_len {
            return Err(ScheduleError::LengthMismatch {
                expected: hash_len,
                got: empty.len(),
            });
        }
        bundle.empty_hash.as_mut_bytes().copy_from_slice(&empty);

        bundle.init_done = true;
        Ok(bundle)
    }

    /// Zeroize and release every contained secret.
    ///
    /// Runs automatically on drop; safe to call more than once.
    pub fn cleanup(&mut self) {
        for name in SecretName::ALL {
            self.secret_mut(name).cleanup();
        }
    }

    /// Borrow a secret by logical name.
    pub fn secret(&self, name: SecretName) -> &Secret {
        match name {
            SecretName::Zeros => &self.zeros,
            SecretName::EmptyHash => &self.empty_hash,
            SecretName::ExtractedEarly => &self.extracted_early,
            SecretName::BinderKey => &self.binder_key,
            SecretName::ClientEarlyTraffic => &self.client_early_traffic,
            SecretName::EarlyExporterMaster => &self.early_exporter_master,
            SecretName::DerivedEarly => &self.derived_early,
            SecretName::ExtractedHandshake => &self.extracted_handshake,
            SecretName::ClientHandshakeTraffic => &self.client_handshake_traffic,
            SecretName::ServerHandshakeTraffic => &self.server_handshake_traffic,
            SecretName::DerivedHandshake => &self.derived_handshake,
            SecretName::ExtractedMaster => &self.extracted_master,
            SecretName::ClientApplicationTraffic => &self.client_application_traffic,
            SecretName::ServerApplicationTraffic => &self.server_application_traffic,
            SecretName::ExporterMaster => &self.exporter_master,
            SecretName::ResumptionMaster => &self.resumption_master,
        }
    }

    fn secret_mut(&mut self, name: SecretName) -> &mut Secret {
        match name {
            SecretName::Zeros => &mut self.zeros,
            SecretName::EmptyHash => &mut self.empty_hash,
            SecretName::ExtractedEarly => &mut self.extracted_early,
            SecretName::BinderKey => &mut self.binder_key,
            SecretName::ClientEarlyTraffic => &mut self.client_early_traffic,
            SecretName::EarlyExporterMaster => &mut self.early_exporter_master,
            SecretName::DerivedEarly => &mut self.derived_early,
            SecretName::ExtractedHandshake => &mut self.extracted_handshake,
            SecretName::ClientHandshakeTraffic => &mut self.client_handshake_traffic,
            SecretName::ServerHandshakeTraffic => &mut self.server_handshake_traffic,
            SecretName::DerivedHandshake => &mut self.derived_handshake,
            SecretName::ExtractedMaster => &mut self.extracted_master,
            SecretName::ClientApplicationTraffic => &mut self.client_application_traffic,
            SecretName::ServerApplicationTraffic => &mut self.server_application_traffic,
            SecretName::ExporterMaster => &mut self.exporter_master,
            SecretName::ResumptionMaster => &mut self.resumption_master,
        }
    }

    pub fn digest(&self) -> HashAlg {
        self.digest
    }

    pub fn resumption(&self) -> bool {
        self.resumption
    }

    pub fn init_done(&self) -> bool {
        self.init_done
    }

    pub fn early_done(&self) -> bool {
        self.early_done
    }

    pub fn handshake_done(&self) -> bool {
        self.handshake_done
    }

    pub fn schedule_done(&self) -> bool {
        self.schedule_done
    }

    /// Copy an HKDF-Extract output into `name`, enforcing the invariant
    /// that every extracted secret has the digest output length.
    fn store_extracted(&mut self, name: SecretName, prk: &[u8]) -> Result<(), ScheduleError> {
        let expected = self.digest.output_len();
        if prk.len() != expected {
            return Err(ScheduleError::LengthMismatch {
                expected,
                got: prk.len(),
            });
        }
        self.secret_mut(name).as_mut_bytes().copy_from_slice(prk);
        Ok(())
    }

    /// Derive the early-secret family from `psk` (RFC 8446 §7.1).
    ///
    /// `extracted_early = HKDF-Extract(salt = zeros, ikm = psk)`, then
    /// `binder_key` ("res binder"/"ext binder" per the bundle's resumption
    /// mode, context = `Hash("")`), `client_early_traffic` ("c e traffic")
    /// and `early_exporter_master` ("e exp master") over the transcript
    /// `context`, and `derived_early` ("derived", context = `Hash("")`).
    ///
    /// Transitions `Init → EarlyDone`; `extracted_early` is wiped once the
    /// derivations complete.
    pub fn derive_early_secrets(
        &mut self,
        hook: &ClaimHook,
        psk: &[u8],
        context: &[u8],
    ) -> Result<(), ScheduleError> {
        if !self.init_done || self.early_done {
            return Err(ScheduleError::StageViolation("derive_early_secrets"));
        }

        let prk = Zeroizing::new(hkdf_extract(self.digest, self.zeros.as_bytes(), psk)?);
        self.store_extracted(SecretName::ExtractedEarly, &prk)?;

        let binder_label: &[u8] = if self.resumption {
            b"res binder"
        } else {
            b"ext binder"
        };
        derive_secret(
            &mut self.binder_key,
            self.digest,
            &self.extracted_early,
            binder_label,
            self.empty_hash.as_bytes(),
            hook,
        )?;
        derive_secret(
            &mut self.client_early_traffic,
            self.digest,
            &self.extracted_early,
            b"c e traffic",
            context,
            hook,
        )?;
        derive_secret(
            &mut self.early_exporter_master,
            self.digest,
            &self.extracted_early,
            b"e exp master",
            context,
            hook,
        )?;
        derive_secret(
            &mut self.derived_early,
            self.digest,
            &self.extracted_early,
            b"derived",
            self.empty_hash.as_bytes(),
            hook,
        )?;

        // RFC 8446 recommends discarding consumed inputs
        if !self.insecure {
            self.extracted_early.wipe();
        }
        self.early_done = true;
        Ok(())
    }

    /// Derive the handshake-secret family from the ECDHE shared secret.
    ///
    /// `extracted_handshake = HKDF-Extract(salt = derived_early,
    /// ikm = ecdhe)`; `derived_early` is consumed by the extraction and
    /// wiped immediately. Then `client_handshake_traffic` /
    /// `server_handshake_traffic` ("c hs traffic"/"s hs traffic") over the
    /// transcript `context` and `derived_handshake` ("derived",
    /// context = `Hash("")`).
    ///
    /// Transitions `EarlyDone → HandshakeDone`.
    pub fn derive_handshake_secrets(
        &mut self,
        hook: &ClaimHook,
        ecdhe: &[u8],
        context: &[u8],
    ) -> Result<(), ScheduleError> {
        if !self.init_done || !self.early_done || self.handshake_done {
            return Err(ScheduleError::StageViolation("derive_handshake_secrets"));
        }

        let prk = Zeroizing::new(hkdf_extract(
            self.digest,
            self.derived_early.as_bytes(),
            ecdhe,
        )?);
        self.store_extracted(SecretName::ExtractedHandshake, &prk)?;

        if !self.insecure {
            self.derived_early.wipe();
        }

        derive_secret(
            &mut self.client_handshake_traffic,
            self.digest,
            &self.extracted_handshake,
            b"c hs traffic",
            context,
            hook,
        )?;
        derive_secret(
            &mut self.server_handshake_traffic,
            self.digest,
            &self.extracted_handshake,
            b"s hs traffic",
            context,
            hook,
        )?;
        derive_secret(
            &mut self.derived_handshake,
            self.digest,
            &self.extracted_handshake,
            b"derived",
            self.empty_hash.as_bytes(),
            hook,
        )?;

        if !self.insecure {
            self.extracted_handshake.wipe();
        }
        self.handshake_done = true;
        Ok(())
    }

    /// Derive the application-secret family.
    ///
    /// `extracted_master = HKDF-Extract(salt = derived_handshake,
    /// ikm = zeros)`; `derived_handshake` is wiped after the extraction.
    /// Then `client_application_traffic` / `server_application_traffic`
    /// ("c ap traffic"/"s ap traffic"), `exporter_master` ("exp master")
    /// and `resumption_master` ("res master"), all over the transcript
    /// `context`.
    ///
    /// Transitions `HandshakeDone → ScheduleDone`.
    pub fn derive_application_secrets(
        &mut self,
        hook: &ClaimHook,
        context: &[u8],
    ) -> Result<(), ScheduleError> {
        if !self.init_done || !self.early_done || !self.handshake_done || self.schedule_done {
            return Err(ScheduleError::StageViolation("derive_application_secrets"));
        }

        let prk = Zeroizing::new(hkdf_extract(
            self.digest,
            self.derived_handshake.as_bytes(),
            self.zeros.as_bytes(),
        )?);
        self.store_extracted(SecretName::ExtractedMaster, &prk)?;

        if !self.insecure {
            self.derived_handshake.wipe();
        }

        derive_secret(
            &mut self.client_application_traffic,
            self.digest,
            &self.extracted_master,
            b"c ap traffic",
            context,
            hook,
        )?;
        derive_secret(
            &mut self.server_application_traffic,
            self.digest,
            &self.extracted_master,
            b"s ap traffic",
            context,
            hook,
        )?;
        derive_secret(
            &mut self.exporter_master,
            self.digest,
            &self.extracted_master,
            b"exp master",
            context,
            hook,
        )?;
        derive_secret(
            &mut self.resumption_master,
            self.digest,
            &self.extracted_master,
            b"res master",
            context,
            hook,
        )?;

        if !self.insecure {
            self.extracted_master.wipe();
        }
        self.schedule_done = true;
        Ok(())
    }

    /// Roll the client application traffic secret forward (RFC 8446 §7.2).
    ///
    /// `secret' = HKDF-Expand-Label(secret, "traffic upd", "", Hash.length)`
    /// in place. Repeatable indefinitely once the schedule is complete; the
    /// prior value must be considered compromised the instant the new one
    /// exists.
    pub fn update_client_traffic_secret(&mut self, hook: &ClaimHook) -> Result<(), ScheduleError> {
        self.update_traffic_secret(SecretName::ClientApplicationTraffic, hook)
    }

    /// Roll the server application traffic secret forward (RFC 8446 §7.2).
    pub fn update_server_traffic_secret(&mut self, hook: &ClaimHook) -> Result<(), ScheduleError> {
        self.update_traffic_secret(SecretName::ServerApplicationTraffic, hook)
    }

    fn update_traffic_secret(
        &mut self,
        name: SecretName,
        hook: &ClaimHook,
    ) -> Result<(), ScheduleError> {
        if !self.init_done || !self.early_done || !self.handshake_done || !self.schedule_done {
            return Err(ScheduleError::StageViolation("update_traffic_secret"));
        }

        let current = self.secret(name);
        let next = expand_label_okm(
            self.digest,
            current.as_bytes(),
            b"traffic upd",
            b"",
            current.len(),
            hook,
        )?;
        self.secret_mut(name).as_mut_bytes().copy_from_slice(&next);
        Ok(())
    }

    /// `finished_key = HKDF-Expand-Label(base, "finished", "", Hash.length)`
    /// for a handshake traffic secret (RFC 8446 §4.4.4).
    pub fn finished_key(&self, base: &Secret) -> Result<Secret, ScheduleError> {
        let okm = expand_label_okm(
            self.digest,
            base.as_bytes(),
            b"finished",
            b"",
            self.digest.output_len(),
            &ClaimHook::disabled(),
        )?;
        Ok(Secret::from_okm(&okm))
    }

    /// Finished `verify_data = HMAC(finished_key, transcript)`.
    pub fn finished_verify_data(
        &self,
        finished_key: &Secret,
        transcript: &[u8],
    ) -> Result<Vec<u8>, ScheduleError> {
        Ok(hmac_hash(self.digest, finished_key.as_bytes(), transcript)?)
    }

    /// Derive a resumption PSK from the resumption master secret and a
    /// ticket nonce: `HKDF-Expand-Label(resumption_master, "resumption",
    /// nonce, Hash.length)`.
    ///
    /// Requires the schedule to be complete.
    pub fn resumption_psk(&self, hook: &ClaimHook, nonce: &[u8]) -> Result<Secret, ScheduleError> {
        if !self.schedule_done {
            return Err(ScheduleError::StageViolation("resumption_psk"));
        }
        let okm = expand_label_okm(
            self.digest,
            self.resumption_master.as_bytes(),
            b"resumption",
            nonce,
            self.digest.output_len(),
            hook,
        )?;
        Ok(Secret::from_okm(&okm))
    }
}
