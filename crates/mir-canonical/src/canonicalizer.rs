use canonical_json::to_string;
use serde_json::{Map, Value};
use std::fmt;

/// Claim member that carries the signature. It is excluded from canonical
/// output so that the signature never signs itself.
pub const SIGNATURE_FIELD: &str = "sig";

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Produces the canonical JSON string for a claim payload.
///
/// The top-level `sig` member is removed, the remaining structure is
/// validated, and the payload is emitted as compact RFC 8785 JSON. Because
/// `serde_json::Value::Object` is a `BTreeMap`, insertion order of fields
/// can never leak into the output.
pub fn canonical_string(claim: &Value) -> Result<String, CanonicalizationError> {
    let payload = strip_signature(claim);
    validate(&payload, Path::root())?;
    to_string(&payload).map_err(|err| CanonicalizationError::Other(format!("{:?}", err)))
}

/// Produces the canonical UTF-8 bytes for signing and verification.
pub fn canonical_bytes(claim: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    canonical_string(claim).map(String::into_bytes)
}

/// Returns a copy of the claim with the reserved `sig` member removed.
///
/// The exclusion is explicit rather than relying on any copy-with-omission
/// semantics of the serializer.
fn strip_signature(claim: &Value) -> Value {
    match claim {
        Value::Object(map) => {
            let mut payload = Map::new();
            for (key, child) in map {
                if key != SIGNATURE_FIELD {
                    payload.insert(key.clone(), child.clone());
                }
            }
            Value::Object(payload)
        }
        other => other.clone(),
    }
}

/// Validates the JSON value against the restricted canonical value model.
fn validate(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                validate(child, path.push_field(key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                validate(item, path.push_index(idx))?;
            }
            Ok(())
        }
        Value::Number(num) => {
            // serde_json rejects NaN/Infinity at parse time, but values built
            // programmatically are checked again here.
            if num.is_f64() {
                let f = num.as_f64().unwrap_or(f64::NAN);
                if !f.is_finite() {
                    return Err(CanonicalizationError::NonFiniteNumber(format!("{}", path)));
                }
            }
            Ok(())
        }
        Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
    }
}
