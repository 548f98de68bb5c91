use regex::Regex;

/// Protocol-defined core claim types.
///
/// This list is documentation and default-registry data only. Validation is
/// gated by the grammar in [`is_valid_claim_type`], not by membership here,
/// so new core types can be added without invalidating deployed verifiers.
pub const CORE_CLAIM_TYPES: &[&str] = &[
    "mir.transaction.initiated",
    "mir.transaction.completed",
    "mir.transaction.fulfilled",
    "mir.transaction.cancelled",
    "mir.transaction.refunded",
    "mir.transaction.disputed",
    "mir.transaction.chargeback",
    "mir.account.created",
    "mir.account.updated",
    "mir.account.verified",
    "mir.account.suspended",
    "mir.account.closed",
    "mir.review.submitted",
    "mir.review.received",
    "mir.message.sent",
    "mir.message.received",
    "mir.response.provided",
    "mir.policy.warning",
    "mir.policy.violation",
    "mir.terms.violation",
];

/// Core type shape: `mir.{category}.{action}`.
const CORE_TYPE_PATTERN: &str = r"^mir\.[a-z][a-z0-9]*\.[a-z][a-z0-9_]*$";

/// Extension type shape: `{domain}:{category}.{action}`, with hostname
/// label rules on the domain part.
const EXTENSION_TYPE_PATTERN: &str =
    r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}:[a-z][a-z0-9]*\.[a-z][a-z0-9_]*$";

/// Classifies a string as a valid core or extension claim type.
///
/// Pure predicate with no side effects. The two grammars are disjoint:
/// core types carry no colon, extension types always do.
pub fn is_valid_claim_type(claim_type: &str) -> bool {
    if Regex::new(CORE_TYPE_PATTERN)
        .expect("invalid regex")
        .is_match(claim_type)
    {
        return true;
    }
    Regex::new(EXTENSION_TYPE_PATTERN)
        .expect("invalid regex")
        .is_match(claim_type)
}
