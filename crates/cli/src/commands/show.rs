//! `show`: print the decrypted credentials.

use std::fs;
use std::io::{ErrorKind, Write};

use anyhow::{bail, Context as _, Result};
use credentials::decrypt_credentials;
use tracing::debug;

use super::decrypt_failed_message;
use crate::cli::PROGRAM;
use crate::context::Context;

/// Decrypt the credentials file and write the YAML to `out`.
///
/// User-facing hints go to stderr; the returned error carries the cause.
pub fn run(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let encrypted = match fs::read_to_string(&ctx.credentials_file) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            eprintln!(
                "File '{}' does not exist. Use `{PROGRAM} edit` to change that.",
                ctx.credentials_file.display()
            );
            bail!("{} does not exist", ctx.credentials_file.display());
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("unable to read {}", ctx.credentials_file.display())
            })
        }
    };

    let Some(key) = ctx.master_key.as_ref() else {
        eprintln!(
            "Missing '{}' to decrypt credentials. See `{PROGRAM} --help`.",
            ctx.master_key_file.display()
        );
        bail!("no master key available");
    };

    let plaintext = decrypt_credentials(key, encrypted.trim()).map_err(|e| {
        eprintln!("{}", decrypt_failed_message(&ctx.credentials_file));
        anyhow::Error::new(e).context("decrypt failed")
    })?;
    debug!(content_len = plaintext.len(), "credentials decrypted");

    out.write_all(plaintext.as_bytes())
        .context("unable to write credentials to stdout")?;
    out.flush().context("unable to write credentials to stdout")?;
    Ok(())
}
