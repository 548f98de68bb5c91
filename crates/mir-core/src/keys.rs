use ed25519_dalek::{SigningKey as DalekSigningKey, VerifyingKey as DalekVerifyingKey};
use hmac::{Hmac, Mac};
use mir_canonical::{KeyFingerprint, SubjectHash};
use sha2::{Digest, Sha256};

use crate::errors::KeyError;

/// An Ed25519 public key used to verify claims.
///
/// Safe to share and distribute; serializes as 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: DalekVerifyingKey,
}

impl PublicKey {
    /// Creates a verifying key from the raw 32 public-key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        DalekVerifyingKey::from_bytes(bytes)
            .map(|inner| Self { inner })
            .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))
    }

    /// Parses a public key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|e| KeyError::Encoding(e.to_string()))?;
        let raw: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::Encoding(format!("expected 32 key bytes, got {}", bytes.len())))?;
        Self::from_bytes(&raw)
    }

    /// Returns the raw 32 public-key bytes. These are exactly the bytes the
    /// fingerprint is computed over.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// Renders the key as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Computes this key's fingerprint.
    pub fn fingerprint(&self) -> KeyFingerprint {
        key_fingerprint(self)
    }

    pub(crate) fn as_dalek(&self) -> &DalekVerifyingKey {
        &self.inner
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(
            f,
            "PublicKey({:02x}{:02x}{:02x}{:02x}...)",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    }
}

/// An Ed25519 signing key pair plus its derived fingerprint.
///
/// Does not implement `Serialize`; the private half must never appear in a
/// canonicalized or transmitted claim.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: DalekSigningKey,
    fingerprint: KeyFingerprint,
}

impl KeyPair {
    /// Generates a fresh random key pair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_signing_key(DalekSigningKey::generate(&mut rng))
    }

    /// Restores a key pair from the raw 32 private-key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self::from_signing_key(DalekSigningKey::from_bytes(bytes))
    }

    /// Parses a key pair from a 64-character hex private key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|e| KeyError::Encoding(e.to_string()))?;
        let raw: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::Encoding(format!("expected 32 key bytes, got {}", bytes.len())))?;
        Ok(Self::from_bytes(&raw))
    }

    fn from_signing_key(signing_key: DalekSigningKey) -> Self {
        let public = PublicKey {
            inner: signing_key.verifying_key(),
        };
        let fingerprint = key_fingerprint(&public);
        Self {
            signing_key,
            fingerprint,
        }
    }

    /// Returns the public half of the key pair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.signing_key.verifying_key(),
        }
    }

    /// Returns the fingerprint of the public half.
    pub fn fingerprint(&self) -> &KeyFingerprint {
        &self.fingerprint
    }

    /// Returns the raw 32 private-key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub(crate) fn as_dalek(&self) -> &DalekSigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// Computes the key fingerprint: SHA-256 over exactly the raw 32-byte
/// public key (no ASN.1/DER wrapping), rendered as lowercase hex.
///
/// The builder and the verifier must use this identically or
/// interoperability breaks.
pub fn key_fingerprint(public_key: &PublicKey) -> KeyFingerprint {
    let digest = Sha256::digest(public_key.to_bytes());
    KeyFingerprint::new(hex::encode(digest))
}

/// Computes a subject hash (basic mode): SHA-256 over
/// `"{domain}:{external_user_id}"`, lowercase hex.
///
/// The external user id must be a platform-specific identifier, never an
/// email address or phone number. For stronger privacy use
/// [`subject_hash_hmac`].
pub fn subject_hash(domain: &str, external_user_id: &str) -> SubjectHash {
    let digest = Sha256::digest(format!("{domain}:{external_user_id}").as_bytes());
    SubjectHash::new(hex::encode(digest))
}

/// Computes a subject hash (HMAC mode): HMAC-SHA256 keyed with a stable,
/// never-published domain secret. Resistant to brute force even when the
/// external id format is known.
pub fn subject_hash_hmac(domain: &str, external_user_id: &str, domain_secret: &[u8]) -> SubjectHash {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(domain_secret).expect("HMAC accepts any key length");
    mac.update(format!("{domain}:{external_user_id}").as_bytes());
    SubjectHash::new(hex::encode(mac.finalize().into_bytes()))
}
