//! Passcrypt - passphrase-based authenticated encryption of byte payloads
//!
//! A key is derived from a passphrase and a per-item salt with PBKDF2, and
//! the payload is sealed with AES-256-GCM under a fresh random nonce:
//!
//! ```
//! let salt = passcrypt::random_salt(passcrypt::DEFAULT_SALT_LEN)?;
//! let blob = passcrypt::encrypt(b"attack at dawn", "correct horse", &salt)?;
//! let plaintext = passcrypt::decrypt(&blob, "correct horse", &salt)?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # Ok::<(), passcrypt::PasscryptError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod kdf;
pub mod random;
pub mod secretcrypt;

pub use error::{ErrorCategory, ErrorKind, PasscryptError, Result};
pub use kdf::{DerivedKey, KEY_LEN, KdfHash, KdfParams, derive_key};
pub use random::{DEFAULT_SALT_LEN, random_salt, random_salt_from};
pub use secretcrypt::{Cipher, NONCE_LEN, TAG_LEN, decrypt, encrypt};
