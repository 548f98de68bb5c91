//! Canonical serialization primitives for MIR claims.
//!
//! Every byte that participates in signing or verification is produced by
//! this crate: the canonical form is compact RFC 8785 JSON with the
//! top-level `sig` member excluded and object keys sorted byte-wise at
//! every nesting level. Two independent implementations of the protocol
//! must reproduce these bytes exactly.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic signing bytes.
pub mod canonicalizer;
/// Validated string newtypes used in claim fields.
pub mod identifiers;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{
    canonical_bytes, canonical_string, CanonicalizationError, SIGNATURE_FIELD,
};
pub use identifiers::{Domain, KeyFingerprint, SubjectHash};
pub use validation::ValidationError;
