use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::keys::PublicKey;
use crate::verifier::{verify_claim, ErrorCode, VerifyResult};

/// Verifier-side policy checks layered after the core pipeline.
///
/// Expiry and domain pinning consume registry metadata the core pipeline
/// has no access to, so they compose over `VerifyResult` rather than being
/// hard-wired into the pipeline. An empty policy accepts every claim the
/// core pipeline accepts.
#[derive(Debug, Clone, Default)]
pub struct ClaimPolicy {
    /// Reject claims issued by any other domain.
    pub expected_domain: Option<String>,
    /// Reject claims whose timestamp is older than this, relative to the
    /// verification instant.
    pub max_age: Option<Duration>,
    /// Reject claims issued after the signing key expired.
    pub key_expires_at: Option<DateTime<Utc>>,
}

impl ClaimPolicy {
    /// Applies the configured checks to a claim that already passed the
    /// core pipeline. Checks run in a fixed order: domain, key expiry,
    /// claim age.
    pub fn check(&self, claim: &Value, now: DateTime<Utc>) -> VerifyResult {
        if let Some(expected) = &self.expected_domain {
            let domain = claim.get("domain").and_then(Value::as_str).unwrap_or("");
            if domain != expected {
                return VerifyResult::Invalid {
                    code: ErrorCode::DomainMismatch,
                    reason: format!("claim issued by {domain}, expected {expected}"),
                };
            }
        }

        if self.max_age.is_none() && self.key_expires_at.is_none() {
            return VerifyResult::Valid;
        }

        let issued_at = match claim
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        {
            Some(ts) => ts.with_timezone(&Utc),
            None => {
                return VerifyResult::Invalid {
                    code: ErrorCode::InvalidSchema,
                    reason: "timestamp is not a parseable RFC 3339 instant".to_string(),
                };
            }
        };

        if let Some(key_expires_at) = self.key_expires_at {
            if issued_at > key_expires_at {
                return VerifyResult::Invalid {
                    code: ErrorCode::KeyExpired,
                    reason: format!(
                        "claim issued at {issued_at} after the signing key expired at {key_expires_at}"
                    ),
                };
            }
        }

        if let Some(max_age) = self.max_age {
            if issued_at + max_age < now {
                return VerifyResult::Invalid {
                    code: ErrorCode::ClaimExpired,
                    reason: format!("claim issued at {issued_at} exceeds the maximum age"),
                };
            }
        }

        VerifyResult::Valid
    }
}

/// Runs the core pipeline and, only when it accepts, the policy checks.
pub fn verify_with_policy(
    claim: &Value,
    public_key: &PublicKey,
    policy: &ClaimPolicy,
    now: DateTime<Utc>,
) -> VerifyResult {
    match verify_claim(claim, public_key) {
        VerifyResult::Valid => policy.check(claim, now),
        rejected => rejected,
    }
}
