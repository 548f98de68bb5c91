use chrono::{Duration, TimeZone, Utc};
use mir_core::{
    create_claim, key_fingerprint, subject_hash, verify_claim, verify_signed_claim,
    verify_with_policy, ClaimError, ClaimParams, ClaimPolicy, ErrorCode, KeyPair, VerifyResult,
};
use serde_json::{json, Value};

fn make_keypair() -> KeyPair {
    KeyPair::generate()
}

fn make_params<'a>(keypair: &'a KeyPair, subject: &'a str) -> ClaimParams<'a> {
    ClaimParams {
        claim_type: "mir.transaction.completed",
        domain: "marketplace.example.com",
        subject,
        timestamp: "2026-02-16T15:30:00Z",
        metadata: None,
        key_fingerprint: keypair.fingerprint().as_ref(),
    }
}

fn make_signed_value(keypair: &KeyPair) -> Value {
    let subject = subject_hash("marketplace.example.com", "user_42");
    let claim = create_claim(make_params(keypair, subject.as_ref()), keypair).unwrap();
    claim.to_value().unwrap()
}

fn assert_code(result: &VerifyResult, expected: ErrorCode) {
    match result {
        VerifyResult::Invalid { code, .. } => assert_eq!(*code, expected, "{result:?}"),
        VerifyResult::Valid => panic!("expected {expected}, got Valid"),
    }
}

#[test]
fn sign_verify_round_trip_accepts_the_claim() {
    let keypair = make_keypair();
    let value = make_signed_value(&keypair);
    assert_eq!(
        verify_claim(&value, &keypair.public_key()),
        VerifyResult::Valid
    );
}

#[test]
fn round_trip_with_metadata_accepts_the_claim() {
    let keypair = make_keypair();
    let subject = subject_hash("marketplace.example.com", "user_42");
    let mut params = make_params(&keypair, subject.as_ref());
    params.metadata = Some(json!({"amount": 14999, "currency": "USD", "items": ["sku_1", "sku_2"]}));
    let claim = create_claim(params, &keypair).unwrap();
    assert_eq!(
        verify_signed_claim(&claim, &keypair.public_key()),
        VerifyResult::Valid
    );
}

#[test]
fn tampered_domain_yields_invalid_signature() {
    let keypair = make_keypair();
    let mut value = make_signed_value(&keypair);
    value["domain"] = json!("attacker.example.com");
    let result = verify_claim(&value, &keypair.public_key());
    assert_code(&result, ErrorCode::InvalidSignature);
}

#[test]
fn tampered_type_yields_invalid_signature() {
    // The concrete scenario: re-typing a signed claim must flip it invalid.
    let keypair = make_keypair();
    let subject = "a".repeat(64);
    let claim = create_claim(
        ClaimParams {
            claim_type: "mir.account.created",
            domain: "example.com",
            subject: &subject,
            timestamp: "2026-01-01T00:00:00Z",
            metadata: None,
            key_fingerprint: keypair.fingerprint().as_ref(),
        },
        &keypair,
    )
    .unwrap();

    let mut value = claim.to_value().unwrap();
    assert_eq!(verify_claim(&value, &keypair.public_key()), VerifyResult::Valid);

    value["type"] = json!("mir.account.updated");
    let result = verify_claim(&value, &keypair.public_key());
    assert_code(&result, ErrorCode::InvalidSignature);
}

#[test]
fn key_mismatch_yields_key_not_found_before_any_crypto() {
    let signer = make_keypair();
    let other = make_keypair();
    let mut value = make_signed_value(&signer);
    // A well-formed 64-byte signature of zeroes: the fingerprint comparison
    // must reject before any cryptographic verification is attempted.
    value["sig"] = json!("A".repeat(86));
    let result = verify_claim(&value, &other.public_key());
    assert_code(&result, ErrorCode::KeyNotFound);
}

#[test]
fn missing_fields_yield_invalid_schema() {
    let keypair = make_keypair();
    for field in ["mir", "type", "domain", "subject", "timestamp", "keyFingerprint", "sig"] {
        let mut value = make_signed_value(&keypair);
        value.as_object_mut().unwrap().remove(field);
        let result = verify_claim(&value, &keypair.public_key());
        assert_code(&result, ErrorCode::InvalidSchema);
        match &result {
            VerifyResult::Invalid { reason, .. } => assert!(reason.contains(field), "{reason}"),
            VerifyResult::Valid => unreachable!(),
        }
    }
}

#[test]
fn null_required_field_counts_as_missing() {
    let keypair = make_keypair();
    let mut value = make_signed_value(&keypair);
    value["metadata"] = Value::Null;
    // metadata is optional, null is not a valid way to omit it but it is
    // not a required field; the signature check catches the mutation.
    let result = verify_claim(&value, &keypair.public_key());
    assert_code(&result, ErrorCode::InvalidSignature);

    let mut value = make_signed_value(&keypair);
    value["timestamp"] = Value::Null;
    let result = verify_claim(&value, &keypair.public_key());
    assert_code(&result, ErrorCode::InvalidSchema);
}

#[test]
fn unsupported_protocol_version_is_rejected() {
    let keypair = make_keypair();
    let mut value = make_signed_value(&keypair);
    value["mir"] = json!(2);
    assert_code(
        &verify_claim(&value, &keypair.public_key()),
        ErrorCode::InvalidSchema,
    );

    let mut value = make_signed_value(&keypair);
    value["mir"] = json!("1");
    assert_code(
        &verify_claim(&value, &keypair.public_key()),
        ErrorCode::InvalidSchema,
    );
}

#[test]
fn schema_steps_fire_in_pipeline_order() {
    let keypair = make_keypair();

    // Bad type AND bad domain: the type check (step 3) fires first.
    let mut value = make_signed_value(&keypair);
    value["type"] = json!("UPPER.case");
    value["domain"] = json!("not a domain");
    match verify_claim(&value, &keypair.public_key()) {
        VerifyResult::Invalid { code, reason } => {
            assert_eq!(code, ErrorCode::InvalidSchema);
            assert!(reason.contains("claim type"), "{reason}");
        }
        VerifyResult::Valid => panic!("expected rejection"),
    }

    // Missing field beats everything, including a garbage signature.
    let mut value = make_signed_value(&keypair);
    value.as_object_mut().unwrap().remove("type");
    value["sig"] = json!("!!!not-base64url!!!");
    match verify_claim(&value, &keypair.public_key()) {
        VerifyResult::Invalid { code, reason } => {
            assert_eq!(code, ErrorCode::InvalidSchema);
            assert!(reason.contains("missing required field"), "{reason}");
        }
        VerifyResult::Valid => panic!("expected rejection"),
    }
}

#[test]
fn malformed_signatures_are_schema_errors() {
    let keypair = make_keypair();

    let mut value = make_signed_value(&keypair);
    value["sig"] = json!("not+base64url/with=padding");
    assert_code(
        &verify_claim(&value, &keypair.public_key()),
        ErrorCode::InvalidSchema,
    );

    let mut value = make_signed_value(&keypair);
    value["sig"] = json!("QUJD"); // 3 bytes, not 64
    match verify_claim(&value, &keypair.public_key()) {
        VerifyResult::Invalid { code, reason } => {
            assert_eq!(code, ErrorCode::InvalidSchema);
            assert!(reason.contains("64 bytes"), "{reason}");
        }
        VerifyResult::Valid => panic!("expected rejection"),
    }
}

#[test]
fn non_object_claims_are_schema_errors() {
    let keypair = make_keypair();
    for value in [json!(null), json!(42), json!("claim"), json!([1, 2, 3])] {
        assert_code(
            &verify_claim(&value, &keypair.public_key()),
            ErrorCode::InvalidSchema,
        );
    }
}

#[test]
fn builder_rejects_bad_inputs_before_signing() {
    let keypair = make_keypair();
    let subject = subject_hash("example.com", "user_1");

    let result = create_claim(
        ClaimParams {
            claim_type: "invalid.type",
            domain: "example.com",
            subject: subject.as_ref(),
            timestamp: "2026-01-01T00:00:00Z",
            metadata: None,
            key_fingerprint: keypair.fingerprint().as_ref(),
        },
        &keypair,
    );
    assert!(matches!(result, Err(ClaimError::InvalidClaimType(_))));

    let result = create_claim(
        ClaimParams {
            claim_type: "mir.account.created",
            domain: "example.com",
            subject: "not-a-hash",
            timestamp: "2026-01-01T00:00:00Z",
            metadata: None,
            key_fingerprint: keypair.fingerprint().as_ref(),
        },
        &keypair,
    );
    assert!(matches!(result, Err(ClaimError::InvalidSubject)));

    let result = create_claim(
        ClaimParams {
            claim_type: "mir.account.created",
            domain: "example.com",
            subject: subject.as_ref(),
            timestamp: "2026-01-01T00:00:00Z",
            metadata: None,
            key_fingerprint: "UPPERCASE",
        },
        &keypair,
    );
    assert!(matches!(result, Err(ClaimError::InvalidKeyFingerprint)));
}

#[test]
fn fingerprint_is_sha256_of_raw_public_key_bytes() {
    use sha2::{Digest, Sha256};
    let keypair = make_keypair();
    let public = keypair.public_key();
    let expected = hex::encode(Sha256::digest(public.to_bytes()));
    assert_eq!(key_fingerprint(&public).as_ref(), expected);
}

#[test]
fn signing_is_deterministic_for_a_fixed_key() {
    let keypair = make_keypair();
    let subject = subject_hash("example.com", "user_7");
    let params = ClaimParams {
        claim_type: "mir.review.submitted",
        domain: "example.com",
        subject: subject.as_ref(),
        timestamp: "2026-03-01T12:00:00Z",
        metadata: Some(json!({"stars": 5})),
        key_fingerprint: keypair.fingerprint().as_ref(),
    };
    let a = create_claim(params.clone(), &keypair).unwrap();
    let b = create_claim(params, &keypair).unwrap();
    assert_eq!(a.sig, b.sig);
}

#[test]
fn extension_type_claims_round_trip() {
    let keypair = make_keypair();
    let subject = subject_hash("shopify.com", "shop_99");
    let claim = create_claim(
        ClaimParams {
            claim_type: "shopify.com:loyalty.earned",
            domain: "shopify.com",
            subject: subject.as_ref(),
            timestamp: "2026-05-01T00:00:00Z",
            metadata: Some(json!({"points": 120})),
            key_fingerprint: keypair.fingerprint().as_ref(),
        },
        &keypair,
    )
    .unwrap();
    assert_eq!(
        verify_signed_claim(&claim, &keypair.public_key()),
        VerifyResult::Valid
    );
}

#[test]
fn policy_rejects_domain_mismatch() {
    let keypair = make_keypair();
    let value = make_signed_value(&keypair);
    let policy = ClaimPolicy {
        expected_domain: Some("other.example.com".to_string()),
        ..ClaimPolicy::default()
    };
    let now = Utc.with_ymd_and_hms(2026, 2, 17, 0, 0, 0).unwrap();
    assert_code(
        &verify_with_policy(&value, &keypair.public_key(), &policy, now),
        ErrorCode::DomainMismatch,
    );
}

#[test]
fn policy_rejects_expired_claims() {
    let keypair = make_keypair();
    let value = make_signed_value(&keypair); // issued 2026-02-16T15:30:00Z
    let policy = ClaimPolicy {
        max_age: Some(Duration::days(30)),
        ..ClaimPolicy::default()
    };
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    assert_code(
        &verify_with_policy(&value, &keypair.public_key(), &policy, now),
        ErrorCode::ClaimExpired,
    );

    let fresh_enough = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    assert_eq!(
        verify_with_policy(&value, &keypair.public_key(), &policy, fresh_enough),
        VerifyResult::Valid
    );
}

#[test]
fn policy_rejects_claims_issued_after_key_expiry() {
    let keypair = make_keypair();
    let value = make_signed_value(&keypair); // issued 2026-02-16T15:30:00Z
    let policy = ClaimPolicy {
        key_expires_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        ..ClaimPolicy::default()
    };
    let now = Utc.with_ymd_and_hms(2026, 2, 17, 0, 0, 0).unwrap();
    assert_code(
        &verify_with_policy(&value, &keypair.public_key(), &policy, now),
        ErrorCode::KeyExpired,
    );
}

#[test]
fn policy_never_runs_on_core_rejections() {
    let keypair = make_keypair();
    let mut value = make_signed_value(&keypair);
    value["domain"] = json!("tampered.example.com");
    let policy = ClaimPolicy {
        expected_domain: Some("tampered.example.com".to_string()),
        ..ClaimPolicy::default()
    };
    let now = Utc.with_ymd_and_hms(2026, 2, 17, 0, 0, 0).unwrap();
    // Core pipeline rejects the tampered signature even though the policy
    // would have matched the domain.
    assert_code(
        &verify_with_policy(&value, &keypair.public_key(), &policy, now),
        ErrorCode::InvalidSignature,
    );
}
