//! Passphrase-based key derivation using PBKDF2-HMAC
//!
//! Turns a passphrase and a salt into a 256-bit key for the cipher in
//! [`crate::secretcrypt`]. The legacy parameters (HMAC-SHA1, 4096 iterations)
//! are the default, since they are what existing ciphertext was sealed with.
//! Any other choice of hash or iteration count produces a different key and
//! therefore cannot open blobs sealed under the legacy parameters.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use tracing::trace;
use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, PasscryptError, Result};

/// Length of derived key in bytes
pub const KEY_LEN: usize = 32;

/// Iteration count of the legacy parameters
pub const LEGACY_ITERATIONS: u32 = 4096;

/// Iteration count of [`KdfParams::recommended`]
pub const RECOMMENDED_ITERATIONS: u32 = 600_000;

/// Upper bound accepted by [`KdfParams::new`]
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Hash function underlying the HMAC pseudo-random function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KdfHash {
    /// HMAC-SHA1. Only kept for compatibility with existing ciphertext.
    Sha1,
    Sha256,
    Sha512,
}

impl fmt::Display for KdfHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KdfHash::Sha1 => "pbkdf2-hmac-sha1",
            KdfHash::Sha256 => "pbkdf2-hmac-sha256",
            KdfHash::Sha512 => "pbkdf2-hmac-sha512",
        };
        f.write_str(name)
    }
}

/// Key derivation parameters.
///
/// Always valid once constructed: the iteration count is within
/// `1..=MAX_ITERATIONS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KdfParams {
    hash: KdfHash,
    iterations: u32,
}

impl KdfParams {
    /// Validate and build a parameter set.
    pub fn new(hash: KdfHash, iterations: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(PasscryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::InvalidParameters,
                "PBKDF2 iteration count must be at least 1",
            ));
        }
        if iterations > MAX_ITERATIONS {
            return Err(PasscryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::InvalidParameters,
                format!(
                    "PBKDF2 iteration count {} exceeds maximum of {}",
                    iterations, MAX_ITERATIONS
                ),
            ));
        }
        Ok(Self { hash, iterations })
    }

    /// HMAC-SHA1 with 4096 iterations, compatible with existing ciphertext.
    pub const fn legacy() -> Self {
        Self {
            hash: KdfHash::Sha1,
            iterations: LEGACY_ITERATIONS,
        }
    }

    /// HMAC-SHA256 with 600,000 iterations.
    ///
    /// Blobs sealed under these parameters can only be opened with them.
    pub const fn recommended() -> Self {
        Self {
            hash: KdfHash::Sha256,
            iterations: RECOMMENDED_ITERATIONS,
        }
    }

    pub const fn hash(&self) -> KdfHash {
        self.hash
    }

    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive a 32-byte key from a passphrase and salt.
    ///
    /// Deterministic and infallible: any passphrase and salt are accepted,
    /// including empty ones.
    pub fn derive(&self, passphrase: &str, salt: &[u8]) -> DerivedKey {
        trace!(
            kdf = %self.hash,
            iterations = self.iterations,
            salt_len = salt.len(),
            "deriving key"
        );

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        let password = passphrase.as_bytes();
        match self.hash {
            KdfHash::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, self.iterations, &mut *key),
            KdfHash::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, self.iterations, &mut *key),
            KdfHash::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, self.iterations, &mut *key),
        }
        DerivedKey(key)
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::legacy()
    }
}

/// A derived symmetric key, wiped from memory when dropped.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive a key using the legacy parameters (HMAC-SHA1, 4096 iterations).
pub fn derive_key(passphrase: &str, salt: &[u8]) -> DerivedKey {
    KdfParams::legacy().derive(passphrase, salt)
}
