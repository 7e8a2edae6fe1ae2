//! Secret generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a generated secret.
pub const SECRET_BYTES: usize = 32;

/// Generate a hex-encoded secret from the OS CSPRNG (64 characters).
pub fn generate() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Shortened form safe to echo to the console.
pub fn preview(secret: &str) -> String {
    let head: String = secret.chars().take(8).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_charset() {
        let secret = generate();
        assert_eq!(secret.len(), SECRET_BYTES * 2);
        assert!(secret
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_generate_is_distinct() {
        assert_ne!(generate(), generate());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("0123456789abcdef"), "01234567...");
        assert_eq!(preview("abc"), "abc...");
    }
}
