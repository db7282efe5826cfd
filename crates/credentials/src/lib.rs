//! Read and write Rails encrypted credentials (`credentials.yml.enc`).
//!
//! The plaintext YAML is marshalled as a Ruby `String` ([`marshal`]) and then
//! sealed with AES-128-GCM under the master key ([`cipher`]). The YAML itself
//! is never parsed.
//!
//! This crate performs no I/O and no logging. Reading key files, invoking an
//! editor and replacing files atomically belong to the callers.

pub mod cipher;
pub mod error;
pub mod key;
pub mod marshal;
pub mod random;
pub mod template;

pub use cipher::{open, seal, seal_with, EncryptedMessage};
pub use error::Error;
pub use key::{generate_master_key, normalize_master_key, MasterKey};
pub use marshal::{decode_single_string, encode_single_string};
pub use random::{OsRandom, RandomSource};

/// Decrypt an encrypted credentials artifact into its YAML text.
///
/// # Errors
///
/// Any [`Error`] from [`open`] or [`decode_single_string`].
pub fn decrypt_credentials(key: &MasterKey, artifact: &str) -> Result<String, Error> {
    let payload = open(key, artifact)?;
    decode_single_string(&payload)
}

/// Marshal and encrypt YAML text into an encrypted credentials artifact.
///
/// # Errors
///
/// Any [`Error`] from [`encode_single_string`] or [`seal`].
pub fn encrypt_credentials(key: &MasterKey, plaintext: &str) -> Result<String, Error> {
    encrypt_credentials_with(&OsRandom, key, plaintext)
}

/// [`encrypt_credentials`] with an explicit random source for the nonce.
pub fn encrypt_credentials_with(
    rng: &dyn RandomSource,
    key: &MasterKey,
    plaintext: &str,
) -> Result<String, Error> {
    let payload = encode_single_string(plaintext)?;
    seal_with(rng, key, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_round_trip() {
        let key = generate_master_key().unwrap();
        let yaml = template::new_credentials_content().unwrap();
        let artifact = encrypt_credentials(&key, &yaml).unwrap();
        assert_eq!(decrypt_credentials(&key, &artifact).unwrap(), yaml);
    }

    #[test]
    fn decrypting_non_utf8_string_is_an_error() {
        let key = generate_master_key().unwrap();
        let artifact = seal(&key, &[0x04, 0x08, 0x22, 0x08, b'a', 0xff, b'b']).unwrap();
        assert!(matches!(
            decrypt_credentials(&key, &artifact),
            Err(Error::InvalidStringEncoding { valid_up_to: 1 })
        ));
    }

    #[test]
    fn decrypting_non_marshal_payload_reports_codec_error() {
        let key = generate_master_key().unwrap();
        let artifact = seal(&key, b"plain bytes").unwrap();
        assert!(matches!(
            decrypt_credentials(&key, &artifact),
            Err(Error::UnsupportedFormatVersion(b'p', b'l'))
        ));
    }
}
