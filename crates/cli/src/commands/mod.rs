//! Subcommand implementations.

pub mod edit;
pub mod show;

/// Printed when the key does not open the credentials file.
pub(crate) fn decrypt_failed_message(path: &std::path::Path) -> String {
    format!(
        "Couldn't decrypt {}. Perhaps you passed the wrong key?",
        path.display()
    )
}
