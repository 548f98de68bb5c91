use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::Signer;
use mir_canonical::{canonical_bytes, KeyFingerprint, SubjectHash};
use serde_json::Value;

use crate::claim::{Claim, PROTOCOL_VERSION};
use crate::claim_type::is_valid_claim_type;
use crate::errors::ClaimError;
use crate::keys::KeyPair;

/// Field inputs for creating and signing a claim.
#[derive(Debug, Clone)]
pub struct ClaimParams<'a> {
    /// Claim type (core or extension).
    pub claim_type: &'a str,
    /// Issuing domain.
    pub domain: &'a str,
    /// Subject hash, 64 lowercase hex characters.
    pub subject: &'a str,
    /// ISO 8601 timestamp.
    pub timestamp: &'a str,
    /// Optional domain-specific metadata.
    pub metadata: Option<Value>,
    /// Fingerprint of the public key corresponding to the signing key.
    pub key_fingerprint: &'a str,
}

/// Creates and signs a claim.
///
/// Validates the claim type, subject, and fingerprint formats before any
/// signing occurs, then assembles the field set (protocol version fixed to
/// 1, metadata included only when provided), canonicalizes it, signs the
/// canonical bytes with Ed25519, and attaches the base64url-encoded
/// signature. No network or disk I/O occurs.
pub fn create_claim(params: ClaimParams<'_>, keypair: &KeyPair) -> Result<Claim, ClaimError> {
    if !is_valid_claim_type(params.claim_type) {
        return Err(ClaimError::InvalidClaimType(params.claim_type.to_string()));
    }
    if SubjectHash::parse(params.subject).is_err() {
        return Err(ClaimError::InvalidSubject);
    }
    if KeyFingerprint::parse(params.key_fingerprint).is_err() {
        return Err(ClaimError::InvalidKeyFingerprint);
    }

    let mut claim = Claim {
        mir: PROTOCOL_VERSION,
        claim_type: params.claim_type.to_string(),
        domain: params.domain.to_string(),
        subject: params.subject.to_string(),
        timestamp: params.timestamp.to_string(),
        key_fingerprint: params.key_fingerprint.to_string(),
        metadata: params.metadata,
        sig: None,
    };

    let bytes = canonical_bytes(&claim.to_value()?)?;
    let signature = keypair.as_dalek().sign(&bytes);
    claim.sig = Some(URL_SAFE_NO_PAD.encode(signature.to_bytes()));

    Ok(claim)
}
