// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifact fingerprints — SHA-256 over produced bytes.

use bildwerk_core::error::{BildwerkError, Result};
use sha2::{Digest, Sha256};

/// Length of the digest prefix used in content-addressed filenames.
pub const SHORT_DIGEST_LEN: usize = 12;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Check that `data` hashes to `expected_hex`.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<()> {
    let actual = hash_bytes(data);
    if actual == expected_hex {
        Ok(())
    } else {
        Err(BildwerkError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

/// The leading [`SHORT_DIGEST_LEN`] characters of a hex digest.
pub fn short_digest(hex_digest: &str) -> &str {
    hex_digest.get(..SHORT_DIGEST_LEN).unwrap_or(hex_digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn hash_known_value() {
        // SHA-256("hello") — verified against coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(hash_bytes(b"hello"), expected);
    }

    #[test]
    fn verify_accepts_matching_and_rejects_altered_bytes() {
        let digest = hash_bytes(b"cat.csv contents");
        assert!(verify_hash(b"cat.csv contents", &digest).is_ok());

        match verify_hash(b"cat.csv c0ntents", &digest) {
            Err(BildwerkError::IntegrityMismatch { expected, actual }) => {
                assert_eq!(expected, digest);
                assert_ne!(actual, digest);
            }
            other => panic!("expected IntegrityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn short_digest_is_a_prefix() {
        let full = hash_bytes(b"hello");
        let short = short_digest(&full);
        assert_eq!(short.len(), SHORT_DIGEST_LEN);
        assert_eq!(short, "2cf24dba5fb0");
        assert_eq!(short_digest("abc"), "abc");
    }
}
