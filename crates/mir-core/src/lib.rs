//! Claim construction, signing, and offline verification for MIR claims.
//!
//! This crate provides:
//! - The `Claim` record and its wire encoding
//! - The claim-type grammar (core `mir.*` and extension namespaces)
//! - Ed25519 key pairs, key fingerprints, and subject hashing
//! - Claim creation with fail-fast field validation
//! - The ordered, short-circuiting verification pipeline
//! - An optional policy layer for expiry and domain pinning
//!
//! Core invariants:
//! - Signatures cover the canonical bytes of every field except `sig`
//! - `keyFingerprint` is SHA-256 over the raw 32-byte public key
//! - Verification is deterministic, offline, and never panics on
//!   untrusted input; it always returns a structured `VerifyResult`
//!
#![deny(missing_docs)]

/// The claim record and protocol constants.
pub mod claim;
/// Claim-type grammar and the core type registry.
pub mod claim_type;
/// Error types for claim construction and key handling.
pub mod errors;
/// Ed25519 key pairs, fingerprints, and subject hashing.
pub mod keys;
/// Policy checks layered after the core verification pipeline.
pub mod policy;
/// Claim assembly and signing.
pub mod signer;
/// The ordered verification pipeline and its result types.
pub mod verifier;

pub use claim::{Claim, PROTOCOL_VERSION};
pub use claim_type::{is_valid_claim_type, CORE_CLAIM_TYPES};
pub use errors::{ClaimError, KeyError};
pub use keys::{key_fingerprint, subject_hash, subject_hash_hmac, KeyPair, PublicKey};
pub use policy::{verify_with_policy, ClaimPolicy};
pub use signer::{create_claim, ClaimParams};
pub use verifier::{verify_claim, verify_signed_claim, ErrorCode, VerifyResult};
