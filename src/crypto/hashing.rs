// Verification codes are stored as digests, never in clear.

use sha2::{Digest, Sha256};

// Domain separation constant so code digests cannot collide with other SHA-256 uses.
const CODE_DOMAIN: &[u8] = b"TAQVERIFY";

/// Hashes a verification code bound to the (normalized) email it was issued for.
///
/// Binding the email means a digest copied onto another row never validates.
pub fn hash_verification_code(email: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(CODE_DOMAIN);
    hasher.update(email.trim().to_lowercase().as_bytes());
    hasher.update(b":");
    hasher.update(code.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a submitted code against the stored digest.
pub fn verification_code_matches(email: &str, code: &str, stored_hash: &str) -> bool {
    let candidate = hash_verification_code(email, code);
    // Fixed-length hex digests; compare without early exit.
    candidate.len() == stored_hash.len()
        && candidate
            .bytes()
            .zip(stored_hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_hex_sha256() {
        let h = hash_verification_code("a@b.com", "123456");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_normalizes_email_case_and_whitespace() {
        assert_eq!(
            hash_verification_code("  Taco@Example.COM ", "123456"),
            hash_verification_code("taco@example.com", "123456")
        );
    }

    #[test]
    fn digest_is_bound_to_email() {
        assert_ne!(
            hash_verification_code("one@example.com", "123456"),
            hash_verification_code("two@example.com", "123456")
        );
    }

    #[test]
    fn matches_only_the_issued_code() {
        let stored = hash_verification_code("a@b.com", "654321");
        assert!(verification_code_matches("a@b.com", "654321", &stored));
        assert!(verification_code_matches("A@B.com", " 654321 ", &stored));
        assert!(!verification_code_matches("a@b.com", "654322", &stored));
        assert!(!verification_code_matches("a@b.com", "654321", "deadbeef"));
    }
}
