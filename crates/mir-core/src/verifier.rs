use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{Signature, Verifier};
use mir_canonical::{canonical_bytes, Domain, KeyFingerprint, SubjectHash};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claim::{Claim, PROTOCOL_VERSION};
use crate::claim_type::is_valid_claim_type;
use crate::errors::ClaimError;
use crate::keys::{key_fingerprint, PublicKey};

/// Required claim members, checked for presence before anything else.
const REQUIRED_FIELDS: &[&str] = &[
    "mir",
    "type",
    "domain",
    "subject",
    "timestamp",
    "keyFingerprint",
    "sig",
];

/// Stable, machine-readable rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A required field is missing, null, or out of grammar.
    InvalidSchema,
    /// The signature does not verify against the canonical bytes.
    InvalidSignature,
    /// The supplied public key is not the one that signed the claim.
    KeyNotFound,
    /// The signing key had expired when the claim was issued.
    KeyExpired,
    /// The claim is older than the verifier's policy allows.
    ClaimExpired,
    /// The claim could not be canonicalized.
    CanonicalizationError,
    /// The claim was issued by a different domain than expected.
    DomainMismatch,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ErrorCode::InvalidSchema => "InvalidSchema",
            ErrorCode::InvalidSignature => "InvalidSignature",
            ErrorCode::KeyNotFound => "KeyNotFound",
            ErrorCode::KeyExpired => "KeyExpired",
            ErrorCode::ClaimExpired => "ClaimExpired",
            ErrorCode::CanonicalizationError => "CanonicalizationError",
            ErrorCode::DomainMismatch => "DomainMismatch",
        };
        f.write_str(code)
    }
}

/// Outcome of claim verification.
///
/// Returned by value and never mutated after construction. Malformed or
/// corrupt claims produce `Invalid`, never an `Err` or a panic, so callers
/// can process untrusted input without exception-driven control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifyResult {
    /// The claim passed every pipeline step.
    Valid,
    /// The claim was rejected; the first failing step determines the code.
    Invalid {
        /// Stable machine-readable code.
        code: ErrorCode,
        /// Human-readable rejection reason.
        reason: String,
    },
}

impl VerifyResult {
    /// Whether the claim was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyResult::Valid)
    }

    /// The rejection code, if the claim was rejected.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            VerifyResult::Valid => None,
            VerifyResult::Invalid { code, .. } => Some(*code),
        }
    }

    fn invalid(code: ErrorCode, reason: impl Into<String>) -> Self {
        VerifyResult::Invalid {
            code,
            reason: reason.into(),
        }
    }
}

/// Verifies an untrusted claim against a public key.
///
/// Ordered, short-circuiting pipeline; the first failing step determines
/// the rejection reason so that independent implementations agree on edge
/// cases:
///
/// 1. required fields present and non-null
/// 2. protocol version equals 1
/// 3. claim type passes the grammar
/// 4. domain matches the hostname grammar
/// 5. subject and keyFingerprint are 64 lowercase hex characters
/// 6. signature decodes from unpadded base64url to exactly 64 bytes
/// 7. the supplied key's fingerprint equals the claim's `keyFingerprint`
/// 8. the signature verifies against the canonical bytes
pub fn verify_claim(claim: &Value, public_key: &PublicKey) -> VerifyResult {
    let Some(object) = claim.as_object() else {
        return VerifyResult::invalid(ErrorCode::InvalidSchema, "claim must be a JSON object");
    };

    for field in REQUIRED_FIELDS {
        match object.get(*field) {
            None | Some(Value::Null) => {
                return VerifyResult::invalid(
                    ErrorCode::InvalidSchema,
                    format!("missing required field: {field}"),
                );
            }
            Some(_) => {}
        }
    }

    if object.get("mir").and_then(Value::as_u64) != Some(PROTOCOL_VERSION) {
        return VerifyResult::invalid(
            ErrorCode::InvalidSchema,
            format!("unsupported protocol version: {}", object["mir"]),
        );
    }

    let claim_type = match object.get("type").and_then(Value::as_str) {
        Some(s) => s,
        None => {
            return VerifyResult::invalid(ErrorCode::InvalidSchema, "claim type must be a string")
        }
    };
    if !is_valid_claim_type(claim_type) {
        return VerifyResult::invalid(
            ErrorCode::InvalidSchema,
            format!("invalid claim type: {claim_type}"),
        );
    }

    match object.get("domain").and_then(Value::as_str) {
        Some(domain) if Domain::parse(domain).is_ok() => {}
        Some(domain) => {
            return VerifyResult::invalid(
                ErrorCode::InvalidSchema,
                format!("invalid domain: {domain}"),
            );
        }
        None => {
            return VerifyResult::invalid(ErrorCode::InvalidSchema, "domain must be a string");
        }
    }

    if object
        .get("subject")
        .and_then(Value::as_str)
        .map_or(true, |s| SubjectHash::parse(s).is_err())
    {
        return VerifyResult::invalid(ErrorCode::InvalidSchema, "invalid subject hash");
    }

    let stated_fingerprint = match object.get("keyFingerprint").and_then(Value::as_str) {
        Some(s) if KeyFingerprint::parse(s).is_ok() => s,
        _ => {
            return VerifyResult::invalid(ErrorCode::InvalidSchema, "invalid key fingerprint");
        }
    };

    let sig_field = match object.get("sig").and_then(Value::as_str) {
        Some(s) => s,
        None => {
            return VerifyResult::invalid(ErrorCode::InvalidSchema, "signature must be a string")
        }
    };
    let decoded = match URL_SAFE_NO_PAD.decode(sig_field) {
        Ok(bytes) => bytes,
        Err(e) => {
            return VerifyResult::invalid(
                ErrorCode::InvalidSchema,
                format!("invalid base64url signature: {e}"),
            );
        }
    };
    let sig_bytes: [u8; 64] = match decoded.as_slice().try_into() {
        Ok(bytes) => bytes,
        Err(_) => {
            return VerifyResult::invalid(
                ErrorCode::InvalidSchema,
                format!("signature must be 64 bytes, got {}", decoded.len()),
            );
        }
    };

    // Schema checks done; cryptographic checks start here.
    if stated_fingerprint != key_fingerprint(public_key).as_ref() {
        return VerifyResult::invalid(
            ErrorCode::KeyNotFound,
            "key fingerprint does not match provided public key",
        );
    }

    let bytes = match canonical_bytes(claim) {
        Ok(bytes) => bytes,
        Err(e) => return VerifyResult::invalid(ErrorCode::CanonicalizationError, e.to_string()),
    };

    let signature = Signature::from_bytes(&sig_bytes);
    if public_key.as_dalek().verify(&bytes, &signature).is_err() {
        return VerifyResult::invalid(ErrorCode::InvalidSignature, "signature verification failed");
    }

    VerifyResult::Valid
}

/// Verifies a typed, signed [`Claim`] by serializing it to its wire form
/// and running the same pipeline as [`verify_claim`].
pub fn verify_signed_claim(claim: &Claim, public_key: &PublicKey) -> VerifyResult {
    match claim.to_value() {
        Ok(value) => verify_claim(&value, public_key),
        Err(ClaimError::Serialization(reason)) => {
            VerifyResult::invalid(ErrorCode::InvalidSchema, reason)
        }
        Err(e) => VerifyResult::invalid(ErrorCode::InvalidSchema, e.to_string()),
    }
}
