//! Secure randomness for salts and nonces
//!
//! Every function takes the random source as a capability; the `OsRng`
//! variants are what the rest of the crate uses by default.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::error::{ErrorCategory, ErrorKind, PasscryptError, Result};

/// Suggested salt length in bytes for new data items
pub const DEFAULT_SALT_LEN: usize = 16;

/// Fill `buf` from `rng`.
///
/// Failure of the source is returned, never retried.
pub fn fill_random_from<R: RngCore + CryptoRng>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(buf).map_err(|e| {
        PasscryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Entropy,
            format!("secure random source failed: {}", e),
            e,
        )
    })
}

/// Fill `buf` from the operating system's secure random source.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    fill_random_from(&mut OsRng, buf)
}

/// Produce `size` random bytes from `rng` for use as a fresh salt.
pub fn random_salt_from<R: RngCore + CryptoRng>(rng: &mut R, size: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; size];
    fill_random_from(rng, &mut salt).map_err(|e| e.with_context("failed to generate salt"))?;
    Ok(salt)
}

/// Produce `size` random bytes from the operating system for use as a fresh salt.
pub fn random_salt(size: usize) -> Result<Vec<u8>> {
    random_salt_from(&mut OsRng, size)
}
