//! Plaintext editing surface.

use std::fs;
use std::io::Write;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Something that lets the user change the decrypted credentials.
pub trait EditSurface {
    /// Present `content` for editing and return the result.
    fn edit(&self, content: &str) -> Result<String>;
}

/// Opens the content in an external editor via a private temporary file.
///
/// The temporary file is created with mode 0600 and removed when editing
/// ends, whether or not the editor succeeded.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    /// `command` is split on whitespace; the file path is appended.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Pick the editor: `--editor`/`$VISUAL`, then `$EDITOR`, then `vi`.
    pub fn resolve(visual: Option<String>, editor: Option<String>) -> Self {
        let command = visual
            .filter(|c| !c.trim().is_empty())
            .or_else(|| editor.filter(|c| !c.trim().is_empty()))
            .unwrap_or_else(|| "vi".to_owned());
        Self::new(command)
    }

    /// The editor command line.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl EditSurface for ExternalEditor {
    fn edit(&self, content: &str) -> Result<String> {
        let mut args = self.command.split_whitespace();
        let program = args.next().context("editor command is empty")?;

        let mut file = tempfile::Builder::new()
            .suffix("-credentials.yml")
            .tempfile()
            .context("unable to create temporary file for editing")?;
        file.write_all(content.as_bytes())
            .context("unable to write temporary file for editing")?;
        file.flush()
            .context("unable to write temporary file for editing")?;

        debug!(editor = program, path = %file.path().display(), "starting editor");
        let status = Command::new(program)
            .args(args)
            .arg(file.path())
            .status()
            .with_context(|| format!("unable to start editor `{program}`"))?;
        if !status.success() {
            bail!("editor `{program}` failed with {status}");
        }

        // Editors may replace the file instead of writing in place.
        fs::read_to_string(file.path()).context("unable to read temporary file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_visual_then_editor_then_vi() {
        let e = ExternalEditor::resolve(Some("code --wait".into()), Some("nano".into()));
        assert_eq!(e.command(), "code --wait");
        let e = ExternalEditor::resolve(Some("  ".into()), Some("nano".into()));
        assert_eq!(e.command(), "nano");
        let e = ExternalEditor::resolve(None, None);
        assert_eq!(e.command(), "vi");
    }

    #[test]
    fn empty_command_is_an_error() {
        assert!(ExternalEditor::new("").edit("x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn noop_editor_returns_content_unchanged() {
        let edited = ExternalEditor::new("true").edit("a: 1\n").unwrap();
        assert_eq!(edited, "a: 1\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_editor_is_an_error() {
        assert!(ExternalEditor::new("false").edit("a: 1\n").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn editor_changes_are_read_back() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-editor.sh");
        fs::write(&script, "#!/bin/sh\nprintf 'b: 2\\n' >> \"$1\"\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let edited = ExternalEditor::new(format!("sh {}", script.display()))
            .edit("a: 1\n")
            .unwrap();
        assert_eq!(edited, "a: 1\nb: 2\n");
    }
}
