//! Integration test: altered credentials, replayed proofs and revoked issuers.

use civis_core::{AttestationKind, FieldElement};
use civis_credentials::date_to_timestamp;
use civis_gateway::GatewayError;
use civis_integration_tests::*;
use civis_proof::{ConstraintCategory, ConstraintMode, ProofError};

fn backdate(world: &World) -> civis_proof::AssemblyRequest {
    // A 16-year-old rewrites their birth year; the issuer never signed this.
    let mut request = world.request(date(2008, 3, 10), "US", alice());
    let forged = date_to_timestamp(date(1990, 3, 10)).unwrap();
    request.date_of_birth.subject_value = FieldElement::from_u64(forged);
    request
}

// =========================================================================
// Signature tampering
// =========================================================================

#[test]
fn test_tampered_birth_date_refused_by_strict_prover() {
    let world = World::new();
    let err = prove(ConstraintMode::Strict, &backdate(&world)).unwrap_err();
    match err {
        ProofError::ConstraintViolation { failed } => {
            assert_eq!(failed, vec![ConstraintCategory::Signature]);
        }
        other => panic!("expected constraint violation, got {other}"),
    }
}

#[test]
fn test_tampered_birth_date_permissive_proof_rejected() {
    let world = World::new();
    let bundle = prove(ConstraintMode::Permissive, &backdate(&world)).unwrap();
    assert!(!world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));
}

#[test]
fn test_altered_public_signal_rejected() {
    let world = World::new();
    let bundle = prove(
        ConstraintMode::Strict,
        &world.request(date(2000, 1, 1), "US", alice()),
    )
    .unwrap();
    let mut input = bundle.signal_array();
    input[1] = FieldElement::from_u64(16);
    assert!(!world.gateway.verify(&bundle.proof, &input, alice()));
}

// =========================================================================
// Wallet binding
// =========================================================================

#[test]
fn test_replayed_proof_rejected_for_other_wallet() {
    let world = World::new();
    let bundle = prove(
        ConstraintMode::Strict,
        &world.request(date(2000, 1, 1), "US", alice()),
    )
    .unwrap();

    assert!(!world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), mallory()));
    let err = world
        .gateway
        .require_verified(&bundle.proof, &bundle.signal_array(), mallory())
        .unwrap_err();
    assert!(matches!(err, GatewayError::VerificationRejected));

    let report = world.gateway.inspect(&bundle.signals, mallory());
    assert_eq!(report.failed(), vec!["wallet"]);
}

#[test]
fn test_borrowed_credentials_cannot_bind_new_wallet() {
    let world = World::new();
    let mut request = world.request(date(2000, 1, 1), "US", alice());
    request.wallet = mallory();

    let err = prove(ConstraintMode::Strict, &request).unwrap_err();
    assert!(matches!(
        err,
        ProofError::ConstraintViolation { ref failed } if failed == &vec![ConstraintCategory::Binding]
    ));
}

#[test]
fn test_mixed_subjects_fail_signature() {
    let world = World::new();
    let mut request = world.request(date(2000, 1, 1), "US", alice());
    request.citizenship = world.citizenship_credential("US", mallory());

    let err = prove(ConstraintMode::Strict, &request).unwrap_err();
    assert!(matches!(
        err,
        ProofError::ConstraintViolation { ref failed } if failed.contains(&ConstraintCategory::Signature)
    ));
}

// =========================================================================
// Issuer trust
// =========================================================================

#[test]
fn test_issuer_removal_revokes_existing_proofs() {
    let world = World::new();
    let bundle = prove(
        ConstraintMode::Strict,
        &world.request(date(2000, 1, 1), "US", alice()),
    )
    .unwrap();
    assert!(world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));

    let was_trusted = world
        .registry
        .remove(
            owner(),
            AttestationKind::Citizenship,
            world.citizenship_issuer.public_key().reduced(),
        )
        .unwrap();
    assert!(was_trusted);

    assert!(!world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));
    let report = world.gateway.inspect(&bundle.signals, alice());
    assert_eq!(report.failed(), vec!["issuer_b"]);
}

#[test]
fn test_registry_changes_need_owner() {
    let world = World::new();
    let key = world.dob_issuer.public_key().reduced();
    assert!(world
        .registry
        .remove(mallory(), AttestationKind::DateOfBirth, key)
        .is_err());
    assert!(world.registry.is_trusted(AttestationKind::DateOfBirth, &key));
}

#[test]
fn test_issuer_trusted_only_for_its_kind() {
    let world = World::new();
    // Citizenship issuer also signs a birth date; it is not trusted for that.
    let mut request = world.request(date(2000, 1, 1), "US", alice());
    request.date_of_birth = world
        .citizenship_issuer
        .issue_date_of_birth(date(2000, 1, 1), alice())
        .unwrap();

    let bundle = prove(ConstraintMode::Strict, &request).unwrap();
    assert!(!world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));
    assert_eq!(
        world.gateway.inspect(&bundle.signals, alice()).failed(),
        vec!["issuer_a"]
    );
}
