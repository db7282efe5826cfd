//! Error type shared by the key, marshal, and cipher layers.

use thiserror::Error;

use crate::key::KEY_LEN;

/// Every failure the credentials core can report.
///
/// Variants carry enough context to say which field or byte was wrong, and
/// never any key, plaintext or ciphertext material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The master key did not decode to [`KEY_LEN`] bytes.
    #[error("invalid master key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The master key is not a hexadecimal string.
    #[error("master key is not valid hex")]
    InvalidKeyEncoding,

    /// The secure random source could not supply entropy.
    #[error("secure random source unavailable: {0}")]
    RandomnessUnavailable(String),

    /// The encrypted artifact is not `<ciphertext>--<nonce>--<tag>` with valid base64.
    #[error("malformed encrypted artifact: {0}")]
    MalformedArtifact(String),

    /// AES-GCM verification failed: wrong key, wrong nonce, or tampered data.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The marshal header did not start with version `04 08`.
    #[error("unsupported marshal format version {0:02x}{1:02x}")]
    UnsupportedFormatVersion(u8, u8),

    /// The marshalled object is not a string.
    #[error("unsupported marshal object type {0:#04x}")]
    UnsupportedObjectType(u8),

    /// The length marker is reserved for zero or negative integers.
    #[error("unsupported marshal length encoding {0:#04x}")]
    UnsupportedLengthEncoding(u8),

    /// The payload ends before the declared length.
    #[error("truncated marshal payload: requires {required} bytes, has {available}")]
    TruncatedPayload { required: usize, available: usize },

    /// The marshalled string body is not valid UTF-8.
    #[error("marshal string is not valid UTF-8 at byte {valid_up_to}")]
    InvalidStringEncoding { valid_up_to: usize },

    /// The string is longer than a 4-byte marshal length can express.
    #[error("payload of {0} bytes exceeds the marshal string limit")]
    PayloadTooLarge(usize),
}
