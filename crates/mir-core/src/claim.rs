use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClaimError;

/// The single protocol version this implementation understands, carried in
/// the `mir` field of every claim.
pub const PROTOCOL_VERSION: u64 = 1;

/// A signed attestation about a real-world interaction.
///
/// Claims are created once by [`crate::create_claim`], are immutable
/// thereafter, and may be verified any number of times by independent
/// verifiers holding the issuer's public key. Tampering is addressed by
/// signature invalidation, not by protocol-level mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Protocol version; must equal [`PROTOCOL_VERSION`].
    pub mir: u64,
    /// Claim type: core (`mir.{category}.{action}`) or extension
    /// (`{domain}:{category}.{action}`).
    #[serde(rename = "type")]
    pub claim_type: String,
    /// Issuing domain (DNS-style hostname).
    pub domain: String,
    /// One-way subject hash, 64 lowercase hex characters. Never the raw
    /// identifier.
    pub subject: String,
    /// ISO 8601 timestamp. Opaque to the core pipeline; no timezone
    /// normalization is performed.
    pub timestamp: String,
    /// SHA-256 fingerprint of the signing public key, 64 lowercase hex
    /// characters.
    #[serde(rename = "keyFingerprint")]
    pub key_fingerprint: String,
    /// Optional domain-specific payload. Omitted entirely when absent,
    /// never serialized as `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Base64url (no padding) encoding of the raw 64-byte Ed25519
    /// signature over the canonical bytes. Present only after signing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

impl Claim {
    /// Serializes the claim to a JSON value for canonicalization or
    /// verification.
    pub fn to_value(&self) -> Result<Value, ClaimError> {
        serde_json::to_value(self).map_err(|e| ClaimError::Serialization(e.to_string()))
    }

    /// Returns the canonical string for this claim (signature excluded).
    pub fn canonical_string(&self) -> Result<String, ClaimError> {
        Ok(mir_canonical::canonical_string(&self.to_value()?)?)
    }

    /// Returns the canonical bytes this claim's signature covers.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, ClaimError> {
        Ok(mir_canonical::canonical_bytes(&self.to_value()?)?)
    }
}
