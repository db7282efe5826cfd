//! AES-128-GCM sealing and opening of marshalled credentials.
//!
//! Compatible with `ActiveSupport::MessageEncryptor` using the `aes-128-gcm`
//! cipher, as `ActiveSupport::EncryptedConfiguration` configures it.
//!
//! # Wire format
//!
//! ```text
//! <base64(ciphertext)>--<base64(nonce)>--<base64(tag)>
//! ```
//!
//! Standard alphabet, padded. The order of the three fields is fixed by the
//! framework and must not change. The tag is stored on its own, whereas the
//! AEAD primitive appends it to the ciphertext, so both directions split or
//! rejoin it explicitly.
//!
//! **Every `seal` draws a fresh nonce from the random source.** GCM nonce
//! reuse under one key breaks both confidentiality and authentication.

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes128Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroize;

use crate::key::{MasterKey, KEY_LEN};
use crate::random::{OsRandom, RandomSource};
use crate::Error;

/// Byte length of a GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of a GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Separator between the three base64 fields.
pub const SEPARATOR: &str = "--";

/// A parsed encrypted artifact.
///
/// The string representation is `<ciphertext>--<nonce>--<tag>`, each field
/// base64-encoded independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedMessage {
    /// Raw ciphertext bytes, without the tag.
    pub ciphertext: Vec<u8>,
    /// Raw nonce bytes.
    pub nonce: Vec<u8>,
    /// Raw authentication tag bytes.
    pub tag: Vec<u8>,
}

impl fmt::Display for EncryptedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            STANDARD.encode(&self.ciphertext),
            STANDARD.encode(&self.nonce),
            STANDARD.encode(&self.tag),
        )
    }
}

impl FromStr for EncryptedMessage {
    type Err = Error;

    /// Parse `<ciphertext>--<nonce>--<tag>`.
    ///
    /// Field lengths are not checked here; [`decrypt_message`] rejects a
    /// nonce or tag of the wrong size.
    fn from_str(s: &str) -> Result<Self, Error> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let [ciphertext, nonce, tag] = parts.as_slice() else {
            return Err(Error::MalformedArtifact(format!(
                "expected 3 fields separated by `{SEPARATOR}`, found {}",
                parts.len()
            )));
        };

        Ok(Self {
            ciphertext: decode_field(ciphertext, "ciphertext")?,
            nonce: decode_field(nonce, "nonce")?,
            tag: decode_field(tag, "tag")?,
        })
    }
}

fn decode_field(field: &str, name: &str) -> Result<Vec<u8>, Error> {
    STANDARD
        .decode(field)
        .map_err(|e| Error::MalformedArtifact(format!("invalid base64 in {name}: {e}")))
}

/// Encrypt `plaintext` under `key` and return the wire-format artifact.
///
/// # Errors
///
/// - [`Error::InvalidKeyLength`] / [`Error::InvalidKeyEncoding`] for a bad key.
/// - [`Error::RandomnessUnavailable`] if no nonce can be drawn.
pub fn seal(key: &MasterKey, plaintext: &[u8]) -> Result<String, Error> {
    seal_with(&OsRandom, key, plaintext)
}

/// [`seal`] with an explicit random source for the nonce.
pub fn seal_with(
    rng: &dyn RandomSource,
    key: &MasterKey,
    plaintext: &[u8],
) -> Result<String, Error> {
    encrypt_message(rng, key, plaintext).map(|message| message.to_string())
}

/// Encrypt `plaintext`, returning the structured message.
pub fn encrypt_message(
    rng: &dyn RandomSource,
    key: &MasterKey,
    plaintext: &[u8],
) -> Result<EncryptedMessage, Error> {
    let cipher = build_cipher(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut nonce)?;

    let mut ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        // Only reachable for plaintexts beyond the GCM length limit.
        .map_err(|_| Error::PayloadTooLarge(plaintext.len()))?;
    let tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);

    Ok(EncryptedMessage {
        ciphertext,
        nonce: nonce.to_vec(),
        tag,
    })
}

/// Decrypt a wire-format artifact under `key`.
///
/// # Errors
///
/// - [`Error::MalformedArtifact`] if the artifact does not have three valid
///   base64 fields, the nonce is not [`NONCE_LEN`] bytes, or the tag is not
///   [`TAG_LEN`] bytes.
/// - [`Error::InvalidKeyLength`] / [`Error::InvalidKeyEncoding`] for a bad key.
/// - [`Error::AuthenticationFailed`] if the key, nonce, ciphertext or tag do
///   not verify.
pub fn open(key: &MasterKey, artifact: &str) -> Result<Vec<u8>, Error> {
    let message: EncryptedMessage = artifact.parse()?;
    decrypt_message(key, &message)
}

/// Decrypt a parsed [`EncryptedMessage`].
pub fn decrypt_message(key: &MasterKey, message: &EncryptedMessage) -> Result<Vec<u8>, Error> {
    let cipher = build_cipher(key)?;

    if message.nonce.len() != NONCE_LEN {
        return Err(Error::MalformedArtifact(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            message.nonce.len()
        )));
    }
    // The AEAD only sees ciphertext || tag, so the split point is pinned here.
    if message.tag.len() != TAG_LEN {
        return Err(Error::MalformedArtifact(format!(
            "tag must be {TAG_LEN} bytes, got {}",
            message.tag.len()
        )));
    }

    let mut sealed = Vec::with_capacity(message.ciphertext.len() + message.tag.len());
    sealed.extend_from_slice(&message.ciphertext);
    sealed.extend_from_slice(&message.tag);

    cipher
        .decrypt(Nonce::from_slice(&message.nonce), sealed.as_slice())
        .map_err(|_| Error::AuthenticationFailed)
}

fn build_cipher(key: &MasterKey) -> Result<Aes128Gcm, Error> {
    let mut bytes = key.to_bytes()?;
    let cipher =
        Aes128Gcm::new_from_slice(&bytes).map_err(|_| Error::InvalidKeyLength(KEY_LEN));
    bytes.zeroize();
    cipher
}
