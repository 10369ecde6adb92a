//! Content fingerprints for editor text.
//!
//! A fingerprint is the raw SHA-256 digest of the UTF-8 bytes of a text. It
//! identifies content for caching, versioning and change detection; it is
//! never used as a secret.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length in bytes of a [`ContentFingerprint`].
pub const FINGERPRINT_LEN: usize = 32;

/// A fixed-size digest derived deterministically from a text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentFingerprint([u8; FINGERPRINT_LEN]);

impl ContentFingerprint {
    /// Wraps raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Returns the lowercase hex rendering, for embedding in keys.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the URL-safe base64 rendering without padding.
    #[must_use]
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Parses a hex rendering produced by [`ContentFingerprint::to_hex`].
    pub fn from_hex(value: &str) -> Option<Self> {
        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(value, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl AsRef<[u8]> for ContentFingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentFingerprint").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computes content fingerprints.
///
/// The digest itself is synchronous; [`FingerprintService::fingerprint`] is
/// async so callers that await a digest keep working unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintService;

impl FingerprintService {
    /// Creates a new fingerprint service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Fingerprints `text`.
    pub async fn fingerprint(&self, text: &str) -> ContentFingerprint {
        fingerprint_sync(text)
    }
}

/// Fingerprints `text` without suspending.
#[must_use]
pub fn fingerprint_sync(text: &str) -> ContentFingerprint {
    let digest = Sha256::digest(text.as_bytes());
    ContentFingerprint(digest.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_fingerprint_is_deterministic() {
        let service = FingerprintService::new();
        for text in ["", "a", "print('hello')", "età è già qui", "🐍 turtle"] {
            let first = service.fingerprint(text).await;
            let second = service.fingerprint(text).await;
            assert_eq!(first, second);
            assert_eq!(first.as_bytes().len(), FINGERPRINT_LEN);
        }
    }

    #[tokio::test]
    async fn test_empty_differs_from_single_char() {
        let service = FingerprintService::new();
        assert_ne!(service.fingerprint("").await, service.fingerprint("a").await);
    }

    #[test]
    fn test_near_duplicates_differ() {
        let base = fingerprint_sync("for i in range(10):\n    print(i)\n");
        for variant in [
            "for i in range(11):\n    print(i)\n",
            "for j in range(10):\n    print(i)\n",
            "for i in range(10):\n    print(i) \n",
            "for i in range(10):\n   print(i)\n",
        ] {
            assert_ne!(base, fingerprint_sync(variant));
        }
    }

    #[test]
    fn test_known_empty_digest() {
        assert_eq!(
            fingerprint_sync("").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_known_abc_digest() {
        assert_eq!(
            fingerprint_sync("abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hex_parse() {
        let fp = fingerprint_sync("x = 1");
        assert_eq!(ContentFingerprint::from_hex(&fp.to_hex()), Some(fp));
        assert_eq!(ContentFingerprint::from_hex("not-hex"), None);
        assert_eq!(ContentFingerprint::from_hex("abcd"), None);
    }

    #[test]
    fn test_base64_is_url_safe() {
        let encoded = fingerprint_sync("x = 1").to_base64();
        assert_eq!(encoded.len(), 43);
        assert!(!encoded.contains('+') && !encoded.contains('/') && !encoded.contains('='));
    }

    #[test]
    fn test_blocking_entry_point_matches_async() {
        let service = FingerprintService::new();
        let awaited = tokio_test::block_on(service.fingerprint("same"));
        assert_eq!(awaited, fingerprint_sync("same"));
    }
}
