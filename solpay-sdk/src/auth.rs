//! Authentication headers and API key helpers.
//!
//! Merchant API keys are random 32-byte secrets. Only their SHA-256 digest is
//! persisted; the plaintext is shown to the merchant once, at creation.

use rand::Rng;

/// Header carrying a merchant API key (dashboard API).
pub const API_KEY_HEADER: &str = "Solpay-Api-Key";

/// Header for admin API authentication (plaintext secret).
pub const ADMIN_AUTH_HEADER: &str = "Solpay-Admin-Authorization";

const API_KEY_PREFIX: &str = "sp_";
const HINT_LEN: usize = 8;

/// Generate a fresh plaintext API key.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    format!(
        "{API_KEY_PREFIX}{}",
        fast32::base64::RFC4648_NOPAD.encode(&bytes)
    )
}

/// Digest under which a key is stored and looked up.
pub fn hash_api_key(key: &str) -> String {
    let digest = ring::digest::digest(&ring::digest::SHA256, key.as_bytes());
    fast32::base64::RFC4648_NOPAD.encode(digest.as_ref())
}

/// `first8...last8`, the form shown in key listings.
pub fn key_hint(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= HINT_LEN * 2 {
        return key.to_string();
    }
    let head: String = chars[..HINT_LEN].iter().collect();
    let tail: String = chars[chars.len() - HINT_LEN..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_unique_and_prefixed() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a, b);
        assert!(a.starts_with(API_KEY_PREFIX));
        assert!(a.len() > 40);
    }

    #[test]
    fn hash_is_stable_and_key_specific() {
        let key = "sp_example";
        assert_eq!(hash_api_key(key), hash_api_key(key));
        assert_ne!(hash_api_key(key), hash_api_key("sp_other"));
        assert!(!hash_api_key(key).contains(key));
    }

    #[test]
    fn hint_masks_the_middle() {
        assert_eq!(key_hint("abcdefgh12345678XYZWVUTS"), "abcdefgh...XYZWVUTS");
        assert_eq!(key_hint("short"), "short");
    }
}
