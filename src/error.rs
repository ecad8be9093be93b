use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// This covers environment faults (an unavailable random source) as well
    /// as faults in the cipher configuration itself.
    Internal,

    /// The caller provided input that cannot be processed: a wrong
    /// passphrase or salt, damaged data, or invalid parameters.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The operating system's secure random source failed or is unavailable.
    Entropy,
    /// The AEAD could not be constructed from the derived key.
    CipherConstruction,
    /// Authentication failed due to an incorrect passphrase or salt,
    /// tampering, corruption or truncation. Never narrowed further.
    AuthenticationFailed,
    /// The plaintext is longer than AES-GCM can seal under a single nonce.
    PayloadTooLarge,
    /// Key derivation parameters were rejected (e.g. zero iterations).
    InvalidParameters,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct PasscryptError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl PasscryptError {
    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Whether this error is the generic authentication failure returned by decryption.
    pub fn is_authentication_failure(&self) -> bool {
        self.kind == Some(ErrorKind::AuthenticationFailed)
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PasscryptError>;
