//! `edit`: decrypt, hand to the editing surface, re-encrypt if changed.

use std::fs;
use std::io::ErrorKind;

use anyhow::{Context as _, Result};
use credentials::{
    decrypt_credentials, encrypt_credentials, generate_master_key, template, MasterKey,
};
use tracing::{debug, info};

use super::decrypt_failed_message;
use crate::context::Context;
use crate::editor::EditSurface;
use crate::fs::{atomic_write, CREDENTIALS_FILE_MODE, KEY_FILE_MODE};

/// Run the edit flow against `surface`.
///
/// Creates the master key file when no key is available, and starts from
/// the default template when the credentials file does not exist yet.
pub fn run(ctx: &Context, surface: &dyn EditSurface) -> Result<()> {
    let key = match ctx.master_key.clone() {
        Some(key) => key,
        None => create_master_key(ctx)?,
    };

    let original = load_plaintext(ctx, &key)?;

    eprintln!("Editing {}...", ctx.credentials_file.display());
    let edited = surface.edit(&original)?;
    if edited == original {
        info!("credentials unchanged; nothing to save");
        return Ok(());
    }

    let encrypted = encrypt_credentials(&key, &edited).context("unable to encrypt")?;
    atomic_write(
        &ctx.credentials_file,
        encrypted.as_bytes(),
        CREDENTIALS_FILE_MODE,
    )
    .context("unable to save encrypted file")?;
    debug!(content_len = edited.len(), "credentials encrypted and saved");
    eprintln!("File encrypted and saved.");
    Ok(())
}

fn create_master_key(ctx: &Context) -> Result<MasterKey> {
    let key = generate_master_key().context("unable to generate a master key")?;
    let path = ctx.master_key_file.display();
    eprintln!(
        "Adding {path} to store the encryption key: {}\n\n\
         Save this in a password manager your team can access.\n\n\
         If you lose the key, no one, including you, can access anything encrypted with it.\n\n      \
         create  {path}\n",
        key.as_hex()
    );
    atomic_write(&ctx.master_key_file, key.as_hex().as_bytes(), KEY_FILE_MODE)
        .context("write master key file failed")?;
    info!(path = %path, "master key file created");
    Ok(key)
}

fn load_plaintext(ctx: &Context, key: &MasterKey) -> Result<String> {
    match fs::read_to_string(&ctx.credentials_file) {
        Ok(encrypted) => decrypt_credentials(key, encrypted.trim()).map_err(|e| {
            eprintln!("{}", decrypt_failed_message(&ctx.credentials_file));
            anyhow::Error::new(e).context("decrypt failed")
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("credentials file absent; starting from template");
            template::new_credentials_content()
                .context("render credentials.yml template failed")
        }
        Err(e) => Err(e).with_context(|| {
            format!("unable to read {}", ctx.credentials_file.display())
        }),
    }
}
