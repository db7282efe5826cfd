//! Resolution of file locations and the master key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use credentials::MasterKey;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Where the credentials live and which key opens them.
#[derive(Debug)]
pub struct Context {
    /// Master key file, resolved against the base directory.
    pub master_key_file: PathBuf,
    /// Encrypted credentials file, resolved against the base directory.
    pub credentials_file: PathBuf,
    /// Key from the command line, `RAILS_MASTER_KEY`, or the key file.
    pub master_key: Option<MasterKey>,
}

impl Context {
    /// Resolve paths and load the master key from the parsed arguments.
    ///
    /// # Errors
    ///
    /// Fails if the base directory does not exist or the key file exists but
    /// cannot be read.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        if !args.base_dir.is_dir() {
            bail!(
                "unable to open base directory {}",
                args.base_dir.display()
            );
        }

        let environment = args.environment.as_deref().filter(|e| !e.is_empty());
        let (default_key, default_credentials) = default_paths(environment);

        let master_key_file = args
            .base_dir
            .join(args.master_key_file.as_deref().unwrap_or(default_key.as_path()));
        let credentials_file = args
            .base_dir
            .join(args.credentials_file.as_deref().unwrap_or(default_credentials.as_path()));

        let master_key = load_master_key(args.master_key.as_deref(), &master_key_file)?;
        debug!(
            master_key_file = %master_key_file.display(),
            credentials_file = %credentials_file.display(),
            master_key_present = master_key.is_some(),
            "resolved credentials context"
        );

        Ok(Self {
            master_key_file,
            credentials_file,
            master_key,
        })
    }
}

/// Default `(key file, credentials file)` relative to the project root.
pub fn default_paths(environment: Option<&str>) -> (PathBuf, PathBuf) {
    match environment {
        None => (
            Path::new("config").join("master.key"),
            Path::new("config").join("credentials.yml.enc"),
        ),
        Some(env) => {
            let dir = Path::new("config").join("credentials");
            (dir.join(format!("{env}.key")), dir.join(format!("{env}.yml.enc")))
        }
    }
}

/// Pick the master key: an explicit value wins, then the key file.
///
/// A missing key file yields `None`; any other read error is fatal.
pub fn load_master_key(explicit: Option<&str>, key_file: &Path) -> Result<Option<MasterKey>> {
    if let Some(raw) = explicit.filter(|k| !k.is_empty()) {
        return Ok(Some(MasterKey::normalize(raw)));
    }

    match fs::read_to_string(key_file) {
        Ok(raw) => {
            let key = MasterKey::normalize(&raw);
            Ok((!key.as_hex().is_empty()).then_some(key))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| {
            format!("unable to read master key file {}", key_file.display())
        }),
    }
}
