pub const MIN_PASSWORD_LEN: usize = 6;

/// Emails are compared and stored trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn password_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Only checks for an `@`; local hosts such as `chef@localhost` are valid.
pub fn looks_like_email(email: &str) -> bool {
    email.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Rosa@Taqueria.COM "), "rosa@taqueria.com");
    }

    #[test]
    fn password_length_counts_chars() {
        assert!(!password_long_enough("12345"));
        assert!(password_long_enough("123456"));
        assert!(password_long_enough("ñañañá"));
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("a@b"));
        assert!(looks_like_email("chef@localhost"));
        assert!(!looks_like_email("nope"));
        assert!(!looks_like_email(""));
    }
}
