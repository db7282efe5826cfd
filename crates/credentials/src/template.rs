//! Content of a freshly generated `credentials.yml`.

use crate::random::{OsRandom, RandomSource};
use crate::Error;

/// Random bytes behind `secret_key_base` (128 hex characters).
pub const SECRET_KEY_BASE_LEN: usize = 64;

const TEMPLATE_HEAD: &str = "# smtp:
#   user_name: my-smtp-user
#   password: my-smtp-password
#
# aws:
#   access_key_id: 123
#   secret_access_key: 345

# Used as the base secret for all MessageVerifiers in Rails, including the one protecting cookies.
secret_key_base: ";

/// Render the default credentials file with a new random `secret_key_base`.
///
/// # Errors
///
/// Returns [`Error::RandomnessUnavailable`] if the OS cannot supply entropy.
pub fn new_credentials_content() -> Result<String, Error> {
    new_credentials_content_with(&OsRandom)
}

/// [`new_credentials_content`] with an explicit random source.
pub fn new_credentials_content_with(rng: &dyn RandomSource) -> Result<String, Error> {
    let mut secret = [0u8; SECRET_KEY_BASE_LEN];
    rng.fill(&mut secret)?;
    Ok(format!("{TEMPLATE_HEAD}{}\n", hex::encode(secret)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::MockRandomSource;

    #[test]
    fn template_ends_with_secret_key_base() {
        let content = new_credentials_content().unwrap();
        let last = content.lines().last().unwrap();
        let value = last.strip_prefix("secret_key_base: ").unwrap();
        assert_eq!(value.len(), 2 * SECRET_KEY_BASE_LEN);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(content.starts_with("# smtp:\n"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn template_is_deterministic_for_a_fixed_source() {
        let mut rng = MockRandomSource::new();
        rng.expect_fill().returning(|buf| {
            buf.fill(0);
            Ok(())
        });
        let content = new_credentials_content_with(&rng).unwrap();
        assert!(content.ends_with(&format!("secret_key_base: {}\n", "0".repeat(128))));
    }
}
