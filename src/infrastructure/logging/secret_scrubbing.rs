use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static BEARER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-_\.=+/:]+").expect("valid bearer pattern"));

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?(bearer_token|token|secret)["']?\s*[:=]\s*["']?[^"'\s,}]+["']?"#)
        .expect("valid token pattern")
});

static PASSWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?password["']?\s*[:=]\s*["']?[^"'\s,}]+["']?"#).expect("valid password pattern")
});

/// Redacts passwords and bearer tokens from diagnostic strings before they
/// reach the log.
#[derive(Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    pub const fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = BEARER_PATTERN.replace_all(message, "Bearer [TOKEN_REDACTED]");
        let scrubbed = TOKEN_PATTERN.replace_all(&scrubbed, "$1=[REDACTED]");
        PASSWORD_PATTERN
            .replace_all(&scrubbed, "password=[REDACTED]")
            .into_owned()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_bearer_token() {
        let scrubbed = SecretScrubber::new().scrub_message("Authorization: Bearer 1:ATbx8aGc3ZIeyA==");

        assert!(!scrubbed.contains("ATbx8aGc3ZIeyA"));
        assert!(scrubbed.contains("Bearer [TOKEN_REDACTED]"));
    }

    #[test]
    fn test_scrub_bearer_token_field() {
        let scrubbed = SecretScrubber::new().scrub_message(r#"{"bearer_token": "1:abcdef"}"#);

        assert!(!scrubbed.contains("1:abcdef"));
        assert!(scrubbed.contains("bearer_token=[REDACTED]"));
    }

    #[test]
    fn test_scrub_password_field() {
        let scrubbed =
            SecretScrubber::new().scrub_message(r#"{"username": "admin", "password": "super_secret"}"#);

        assert!(!scrubbed.contains("super_secret"));
        assert!(scrubbed.contains("admin"));
        assert!(scrubbed.contains("[REDACTED]"));
    }

    #[test]
    fn test_no_scrubbing_needed() {
        let message = "error sending request for url (https://10.0.0.7:8000/v1/session/login)";
        assert_eq!(SecretScrubber::new().scrub_message(message), message);
    }
}
