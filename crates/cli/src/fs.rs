//! Atomic file replacement.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Permissions for `master.key`.
pub const KEY_FILE_MODE: u32 = 0o600;

/// Permissions for `credentials.yml.enc`.
pub const CREDENTIALS_FILE_MODE: u32 = 0o644;

/// Replace `path` with `content` so readers see either the old or the new
/// file, never a partial write.
///
/// Parent directories are created as needed. `mode` is applied on Unix.
pub fn atomic_write(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("unable to create directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("unable to create temporary file in {}", dir.display()))?;
    tmp.write_all(content)
        .context("unable to write temporary file")?;
    tmp.as_file()
        .sync_all()
        .context("unable to flush temporary file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))
            .context("unable to set file permissions")?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("unable to overwrite {}", path.display()))?;
    Ok(())
}
