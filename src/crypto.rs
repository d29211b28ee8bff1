//! Hashing and obfuscation helpers for customer data.
//!
//! The personnummer is stored as a salted PBKDF2-SHA256 hash. The email
//! obfuscation is a reversible single-byte XOR wrapped in base64. It is a
//! placeholder for at-rest obfuscation, NOT encryption, and must not be
//! relied on as a security control.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const DEFAULT_SALT_LEN: usize = 16;
const DEFAULT_HASH_LEN: usize = 32;
const DEFAULT_ITERATIONS: u32 = 100_000;

const OBFUSCATION_KEY: u8 = 0x42;

/// Generates a random 16-byte salt, base64-encoded.
pub fn generate_salt() -> String {
    let mut salt = [0u8; DEFAULT_SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    BASE64.encode(salt)
}

/// Hashes a value with the given base64 salt using PBKDF2-SHA256
/// (100k iterations, 32-byte output), returning the hash base64-encoded.
///
/// Returns `None` if the salt is not valid base64.
pub fn hash_with_salt(value: &str, base64_salt: &str) -> Option<String> {
    let salt = BASE64.decode(base64_salt).ok()?;
    let mut hash = [0u8; DEFAULT_HASH_LEN];
    pbkdf2_hmac::<Sha256>(value.as_bytes(), &salt, DEFAULT_ITERATIONS, &mut hash);
    Some(BASE64.encode(hash))
}

/// Verifies a plaintext value against a stored salt + hash pair.
/// Comparison does not short-circuit on the first mismatching byte.
pub fn verify(value: &str, base64_salt: &str, expected_base64_hash: &str) -> bool {
    let (Some(computed), Ok(expected)) = (
        hash_with_salt(value, base64_salt),
        BASE64.decode(expected_base64_hash),
    ) else {
        return false;
    };
    let Ok(computed) = BASE64.decode(computed) else {
        return false;
    };
    if computed.len() != expected.len() {
        return false;
    }
    computed
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Obfuscates text with a fixed single-byte XOR and base64-encodes it.
/// Deterministic, so equal inputs map to equal outputs (unique indexes on
/// the stored form keep working).
pub fn obfuscate(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let bytes: Vec<u8> = text.bytes().map(|b| b ^ OBFUSCATION_KEY).collect();
    BASE64.encode(bytes)
}

/// Reverses [`obfuscate`]. Input that is not valid base64 (or not valid
/// UTF-8 after the XOR) is returned unchanged, so legacy plaintext rows
/// still display.
pub fn deobfuscate(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match BASE64.decode(text) {
        Ok(bytes) => {
            let decoded: Vec<u8> = bytes.into_iter().map(|b| b ^ OBFUSCATION_KEY).collect();
            String::from_utf8(decoded).unwrap_or_else(|_| text.to_string())
        }
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip_verifies() {
        let salt = generate_salt();
        let hash = hash_with_salt("199001011234", &salt).unwrap();
        assert!(verify("199001011234", &salt, &hash));
        assert!(!verify("199001011235", &salt, &hash));
    }

    #[test]
    fn different_salts_give_different_hashes() {
        let a = hash_with_salt("secret", &generate_salt()).unwrap();
        let b = hash_with_salt("secret", &generate_salt()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn obfuscation_round_trips() {
        let plain = "anna.andersson@gmail.com";
        let stored = obfuscate(plain);
        assert_ne!(stored, plain);
        assert_eq!(deobfuscate(&stored), plain);
    }

    #[test]
    fn obfuscation_is_deterministic() {
        assert_eq!(obfuscate("same@input.se"), obfuscate("same@input.se"));
    }

    #[test]
    fn deobfuscate_passes_through_non_base64() {
        assert_eq!(deobfuscate("not base64!!"), "not base64!!");
        assert_eq!(deobfuscate(""), "");
    }
}
