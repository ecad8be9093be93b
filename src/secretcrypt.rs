//! Encryption/decryption using PBKDF2 + AES-256-GCM
//!
//! This module implements passphrase-based encryption using:
//! - PBKDF2-HMAC for key derivation from passphrase and salt (see [`crate::kdf`])
//! - AES-256-GCM for authenticated encryption
//!
//! The binary format is:
//! - nonce: 12 bytes
//! - ciphertext: same length as the plaintext
//! - tag: 16 bytes
//!
//! The salt is not part of the blob. Callers must store it alongside, since
//! decryption needs the same passphrase and salt that were used to encrypt.

use aes_gcm::aead::{Aead, AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::error::{ErrorCategory, ErrorKind, PasscryptError, Result};
use crate::kdf::KdfParams;
use crate::random;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Bytes a blob carries in addition to the plaintext
pub const OVERHEAD: usize = NONCE_LEN + TAG_LEN;

const AUTHENTICATION_FAILED: &str = "corrupt input, tampered-with data, or bad passphrase";

fn authentication_failed() -> PasscryptError {
    PasscryptError::with_kind(
        ErrorCategory::User,
        ErrorKind::AuthenticationFailed,
        AUTHENTICATION_FAILED,
    )
}

/// Passphrase-keyed AEAD with explicit key derivation parameters.
///
/// Holds no key material; every call derives its own key, so a `Cipher`
/// can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cipher {
    params: KdfParams,
}

impl Cipher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    fn aead(&self, passphrase: &str, salt: &[u8]) -> Result<Aes256Gcm> {
        let key = self.params.derive(passphrase, salt);
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| {
            PasscryptError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::CipherConstruction,
                "failed to construct AES-256-GCM from derived key",
            )
        })
    }

    /// Encrypt plaintext with a passphrase and salt using a random nonce
    ///
    /// Returns the binary format: nonce(12) + ciphertext(variable) + tag(16)
    pub fn encrypt(&self, plaintext: &[u8], passphrase: &str, salt: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_with_rng(&mut OsRng, plaintext, passphrase, salt)
    }

    /// Like [`Cipher::encrypt`], drawing the nonce from `rng`
    ///
    /// A failing source yields [`ErrorKind::Entropy`] and no blob.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
        passphrase: &str,
        salt: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = self.aead(passphrase, salt)?;

        let mut nonce = [0u8; NONCE_LEN];
        random::fill_random_from(rng, &mut nonce)
            .map_err(|e| e.with_context("failed to generate nonce"))?;

        self.seal(&cipher, plaintext, &nonce)
    }

    /// Encrypt plaintext with a passphrase and salt using a provided nonce
    ///
    /// This function is ONLY for generating test vectors. Reusing a nonce
    /// under the same passphrase and salt reveals the XOR of the plaintexts,
    /// so it is only compiled for tests or with the `test-vectors` feature.
    #[cfg(any(test, feature = "test-vectors"))]
    #[doc(hidden)]
    pub fn encrypt_deterministic(
        &self,
        plaintext: &[u8],
        passphrase: &str,
        salt: &[u8],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<Vec<u8>> {
        let cipher = self.aead(passphrase, salt)?;
        self.seal(&cipher, plaintext, nonce)
    }

    fn seal(
        &self,
        cipher: &Aes256Gcm,
        plaintext: &[u8],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(plaintext.len() + OVERHEAD);
        output.extend_from_slice(nonce);
        output.extend_from_slice(plaintext);

        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut output[NONCE_LEN..])
            .map_err(|e| {
                PasscryptError::with_kind(
                    ErrorCategory::User,
                    ErrorKind::PayloadTooLarge,
                    format!("encryption failed: {}", e),
                )
            })?;
        output.extend_from_slice(&tag);

        debug!(
            kdf = %self.params.hash(),
            plaintext_len = plaintext.len(),
            blob_len = output.len(),
            "sealed payload"
        );
        Ok(output)
    }

    /// Decrypt a blob produced by [`Cipher::encrypt`]
    ///
    /// Wrong passphrase, wrong salt, tampering and truncation all fail with
    /// the same [`ErrorKind::AuthenticationFailed`] error.
    pub fn decrypt(&self, blob: &[u8], passphrase: &str, salt: &[u8]) -> Result<Vec<u8>> {
        if blob.len() < NONCE_LEN {
            debug!(blob_len = blob.len(), "blob shorter than nonce");
            return Err(authentication_failed());
        }
        let (nonce, sealed) = blob.split_at(NONCE_LEN);

        let cipher = self.aead(passphrase, salt)?;
        let plaintext = cipher.decrypt(Nonce::from_slice(nonce), sealed).map_err(|_| {
            debug!(blob_len = blob.len(), "authentication failed");
            authentication_failed()
        })?;

        debug!(
            kdf = %self.params.hash(),
            plaintext_len = plaintext.len(),
            "opened payload"
        );
        Ok(plaintext)
    }
}

/// Encrypt with the legacy key derivation parameters.
pub fn encrypt(plaintext: &[u8], passphrase: &str, salt: &[u8]) -> Result<Vec<u8>> {
    Cipher::default().encrypt(plaintext, passphrase, salt)
}

/// Decrypt with the legacy key derivation parameters.
pub fn decrypt(blob: &[u8], passphrase: &str, salt: &[u8]) -> Result<Vec<u8>> {
    Cipher::default().decrypt(blob, passphrase, salt)
}
