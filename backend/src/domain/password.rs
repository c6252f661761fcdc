//! Password hashing and verification.
//!
//! Hashes are stored as `"{salt}:{digest}"` where `salt` is 16 random bytes
//! hex-encoded and `digest` is hex-encoded
//! PBKDF2-HMAC-SHA256(password, salt-as-ascii, 100 000 iterations). The salt
//! participates in the derivation as its ASCII hex text, matching the rows
//! already present in the user sheet.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const ITERATIONS: u32 = 100_000;
const SALT_BYTES: usize = 16;
const DIGEST_BYTES: usize = 32;

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let digest = derive(password, &salt_hex);
    format!("{salt_hex}:{}", hex::encode(digest))
}

/// Verify `password` against a stored `"{salt}:{digest}"` string.
///
/// Any malformed stored value verifies as `false`; this function never fails.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once(':') else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    if expected.len() != DIGEST_BYTES {
        return false;
    }
    derive(password, salt_hex)[..] == expected[..]
}

fn derive(password: &str, salt_hex: &str) -> [u8; DIGEST_BYTES] {
    let mut digest = [0u8; DIGEST_BYTES];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt_hex.as_bytes(),
        ITERATIONS,
        &mut digest,
    );
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn password_round_trips() {
        let stored = hash_password("secret1");
        assert!(verify_password("secret1", &stored));
        assert!(!verify_password("secret2", &stored));
    }

    #[test]
    fn stored_format_is_salt_colon_digest() {
        let stored = hash_password("secret1");
        let (salt, digest) = stored.split_once(':').expect("colon separator");
        assert_eq!(salt.len(), SALT_BYTES * 2);
        assert_eq!(digest.len(), DIGEST_BYTES * 2);
        assert!(salt.bytes().all(|b| b.is_ascii_hexdigit()));
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("secret1"), hash_password("secret1"));
    }

    #[rstest]
    #[case("")]
    #[case("no-separator")]
    #[case("salt:")]
    #[case("salt:not-hex")]
    #[case("salt:abcd")] // digest too short
    fn malformed_stored_hash_verifies_false(#[case] stored: &str) {
        assert!(!verify_password("secret1", stored));
    }
}
