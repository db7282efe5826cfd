//! Injectable source of cryptographically secure random bytes.
//!
//! Key generation and every `seal` call draw from a [`RandomSource`]. The
//! default [`OsRandom`] reads the operating system CSPRNG; tests substitute a
//! mock to get deterministic nonces or to simulate an exhausted source.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use crate::Error;

/// A provider of secure random bytes.
///
/// Implementations must fail with [`Error::RandomnessUnavailable`] rather than
/// fall back to a weaker source.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), Error>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), Error> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| Error::RandomnessUnavailable(e.to_string()))
    }
}
