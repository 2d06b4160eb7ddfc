//! Fixed-length secret byte buffers, wiped before release.

use std::fmt;

use keyloom_types::ScheduleError;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A secret value: either uninitialized (empty) or exactly `len` bytes,
/// allocated once and never resized.
///
/// The buffer is overwritten with zeros on [`cleanup`](Secret::cleanup) and
/// on drop, on every exit path.
#[derive(Default)]
pub struct Secret {
    data: Vec<u8>,
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl Secret {
    /// Create an empty, uninitialized secret.
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Allocate a zero-filled buffer of `len` bytes.
    ///
    /// Fails if the secret is already initialized; the existing buffer is
    /// left untouched.
    pub fn init(&mut self, len: usize) -> Result<(), ScheduleError> {
        if !self.data.is_empty() {
            return Err(ScheduleError::AlreadyInitialized);
        }
        self.data = vec![0u8; len];
        Ok(())
    }

    /// Overwrite the buffer with zeros and release it, resetting the length
    /// to zero. No-op on an already-empty secret.
    pub fn cleanup(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
    }

    /// Overwrite the buffer contents with zeros, keeping the allocation.
    pub(crate) fn wipe(&mut self) {
        self.data.zeroize();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Take ownership of derived key material.
    pub(crate) fn from_okm(okm: &[u8]) -> Self {
        Self { data: okm.to_vec() }
    }

    /// Constant-time equality against `other`.
    pub fn ct_eq(&self, other: &[u8]) -> bool {
        self.data.ct_eq(other).into()
    }

    /// True when every byte of the buffer is zero.
    pub fn is_zeroized(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([{} bytes])", self.data.len())
    }
}
