use thiserror::Error;

/// Errors raised while building a claim.
///
/// Construction fails before any signing occurs; a partially-signed claim
/// is never produced.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The claim type matches neither the core nor the extension grammar.
    #[error("invalid claim type \"{0}\": must be mir.{{category}}.{{action}} or {{domain}}:{{category}}.{{action}}")]
    InvalidClaimType(String),
    /// The subject is not a 64-character lowercase hex string.
    #[error("subject must be a 64-character lowercase hex string (SHA-256 or HMAC-SHA256 hash)")]
    InvalidSubject,
    /// The key fingerprint is not a 64-character lowercase hex string.
    #[error("keyFingerprint must be a 64-character lowercase hex string")]
    InvalidKeyFingerprint,
    /// Canonicalization of the assembled fields failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] mir_canonical::CanonicalizationError),
    /// Serialization of the assembled fields failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Errors decoding key material at the adapter boundary.
///
/// These are ambient failures, deliberately distinct from `VerifyResult`:
/// a malformed key is a caller error, not a claim verdict.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key bytes were not valid hex or had the wrong length.
    #[error("invalid key encoding: {0}")]
    Encoding(String),
    /// Key bytes do not represent a valid Ed25519 curve point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
