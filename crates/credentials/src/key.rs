//! Master key generation and normalisation.
//!
//! A master key is 16 random bytes, stored and exchanged as 32 lowercase hex
//! characters (the content of `config/master.key` or `RAILS_MASTER_KEY`).

use std::fmt;

use zeroize::Zeroize;

use crate::random::{OsRandom, RandomSource};
use crate::Error;

/// Byte length of an AES-128 key (16 bytes = 128 bits).
pub const KEY_LEN: usize = 16;

/// A hex-encoded master key.
///
/// Construction never validates; [`MasterKey::to_bytes`] does, so that reading
/// key material stays a pure string operation.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey(String);

impl MasterKey {
    /// Strip trailing carriage returns and line feeds from externally supplied
    /// key material. No other whitespace is touched.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim_end_matches(['\r', '\n']).to_owned())
    }

    /// The hex string, as written to `master.key`.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Decode the key into raw AES key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyEncoding`] if the string is not hex, or
    /// [`Error::InvalidKeyLength`] if it does not decode to [`KEY_LEN`] bytes.
    pub fn to_bytes(&self) -> Result<[u8; KEY_LEN], Error> {
        let mut decoded = hex::decode(&self.0).map_err(|_| Error::InvalidKeyEncoding)?;
        let result = <[u8; KEY_LEN]>::try_from(decoded.as_slice())
            .map_err(|_| Error::InvalidKeyLength(decoded.len()));
        decoded.zeroize();
        result
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("MasterKey([REDACTED])")
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Free-function form of [`MasterKey::normalize`].
pub fn normalize_master_key(raw: &str) -> MasterKey {
    MasterKey::normalize(raw)
}

/// Generate a new random master key from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`Error::RandomnessUnavailable`] if the OS cannot supply entropy.
pub fn generate_master_key() -> Result<MasterKey, Error> {
    generate_master_key_with(&OsRandom)
}

/// Generate a new master key from the given random source.
pub fn generate_master_key_with(rng: &dyn RandomSource) -> Result<MasterKey, Error> {
    let mut key = [0u8; KEY_LEN];
    rng.fill(&mut key)?;
    let hex = hex::encode(key);
    key.zeroize();
    Ok(MasterKey(hex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::MockRandomSource;

    #[test]
    fn generated_key_is_32_lowercase_hex_chars() {
        let key = generate_master_key().unwrap();
        assert_eq!(key.as_hex().len(), 2 * KEY_LEN);
        assert!(key
            .as_hex()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(key.to_bytes().unwrap().len(), KEY_LEN);
    }

    #[test]
    fn successive_keys_differ() {
        let a = generate_master_key().unwrap();
        let b = generate_master_key().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn generation_uses_injected_source() {
        let mut rng = MockRandomSource::new();
        rng.expect_fill().times(1).returning(|buf| {
            buf.fill(0xab);
            Ok(())
        });
        let key = generate_master_key_with(&rng).unwrap();
        assert_eq!(key.as_hex(), "abababababababababababababababab");
    }

    #[test]
    fn generation_fails_when_source_is_unavailable() {
        let mut rng = MockRandomSource::new();
        rng.expect_fill()
            .returning(|_| Err(Error::RandomnessUnavailable("no entropy".into())));
        assert!(matches!(
            generate_master_key_with(&rng),
            Err(Error::RandomnessUnavailable(_))
        ));
    }

    #[test]
    fn normalize_strips_trailing_line_endings_only() {
        let key = MasterKey::normalize("a2683380db86af7597f33561b5f11755\r\n\n");
        assert_eq!(key.as_hex(), "a2683380db86af7597f33561b5f11755");

        let spaced = normalize_master_key(" a2683380db86af7597f33561b5f11755 \n");
        assert_eq!(spaced.as_hex(), " a2683380db86af7597f33561b5f11755 ");
    }

    #[test]
    fn normalize_never_fails_on_garbage() {
        let key = MasterKey::normalize("not a key\n");
        assert_eq!(key.as_hex(), "not a key");
        assert_eq!(key.to_bytes(), Err(Error::InvalidKeyEncoding));
    }

    #[test]
    fn to_bytes_rejects_wrong_length() {
        let short = MasterKey::normalize("a2683380db86af75");
        assert_eq!(short.to_bytes(), Err(Error::InvalidKeyLength(8)));

        let long = MasterKey::normalize(&"ab".repeat(32));
        assert_eq!(long.to_bytes(), Err(Error::InvalidKeyLength(32)));
    }

    #[test]
    fn debug_is_redacted() {
        let key = MasterKey::normalize("a2683380db86af7597f33561b5f11755");
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("a268"));
    }
}
