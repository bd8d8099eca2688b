//! Integration test: issue two credentials, assemble a proof, verify it at
//! the gateway.

use civis_core::{encode_short_string, FieldElement, PUBLIC_SIGNAL_COUNT};
use civis_gateway::AuditLog;
use civis_integration_tests::*;
use civis_proof::{age_in_years, CircuitInputs, ConstraintMode, ProofBundle};

// =========================================================================
// Happy path
// =========================================================================

#[test]
fn test_round_trip_accepts_eligible_holder() {
    let world = World::new();
    let request = world.request(date(2000, 1, 1), "US", alice());
    let bundle = prove(ConstraintMode::Strict, &request).expect("eligible holder can prove");

    assert_eq!(bundle.mode, ConstraintMode::Strict);
    assert!(world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));
}

#[test]
fn test_two_thousand_scenario_signals() {
    let world = World::new();
    let request = world.request(date(2000, 1, 1), "US", alice());
    let bundle = prove(ConstraintMode::Strict, &request).unwrap();
    let input = bundle.signal_array();

    assert_eq!(input.len(), PUBLIC_SIGNAL_COUNT);
    assert_eq!(input[0], FieldElement::from_u64(JUNE_1_2024));
    assert_eq!(input[1], FieldElement::from_u64(18));
    assert_eq!(input[2], encode_short_string("US").unwrap());
    assert_eq!(input[7], alice().to_field());
    assert_eq!(input[8], alice().to_field());

    let dob = request.date_of_birth.subject_value;
    assert_eq!(
        age_in_years(&dob, &FieldElement::from_u64(JUNE_1_2024)),
        Some(24)
    );
}

#[test]
fn test_bundle_survives_json() {
    let world = World::new();
    let bundle = prove(
        ConstraintMode::Strict,
        &world.request(date(1990, 5, 17), "US", alice()),
    )
    .unwrap();

    let restored = ProofBundle::from_json(&bundle.to_json().unwrap()).unwrap();
    assert_eq!(restored, bundle);
    assert!(world
        .gateway
        .verify(&restored.proof, &restored.signal_array(), alice()));
}

#[tokio::test]
async fn test_off_thread_assembly_verifies() {
    let world = World::new();
    let request = world.request(date(2000, 1, 1), "US", alice());
    let bundle = assembler(ConstraintMode::Strict)
        .assemble_off_thread(request)
        .await
        .unwrap();
    assert!(world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));
}

// =========================================================================
// Age boundary
// =========================================================================

#[test]
fn test_exactly_eighteen_today_is_eligible() {
    let world = World::new();
    let bundle = prove(
        ConstraintMode::Strict,
        &world.request(date(2006, 6, 1), "US", alice()),
    )
    .expect("18th birthday counts");
    assert!(world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));
}

#[test]
fn test_one_day_short_of_eighteen_is_refused() {
    let world = World::new();
    let err = prove(
        ConstraintMode::Strict,
        &world.request(date(2006, 6, 2), "US", alice()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("age"), "unexpected error: {err}");
}

#[test]
fn test_seventeen_years_eleven_months() {
    let world = World::new();
    let request = world.request(date(2006, 7, 1), "US", alice());

    let inputs = CircuitInputs::from_credentials(
        &request.date_of_birth,
        &request.citizenship,
        request.wallet,
        request.current_date,
        &Default::default(),
    )
    .unwrap();
    assert_eq!(
        age_in_years(&inputs.witness.date_of_birth, &inputs.signals.current_date),
        Some(17)
    );

    // Strict refuses to produce a proof at all.
    assert!(prove(ConstraintMode::Strict, &request).is_err());

    // Permissive produces one, but it is not evidence of eligibility and a
    // strict gateway does not accept it.
    let bundle = prove(ConstraintMode::Permissive, &request).expect("permissive proves anyway");
    assert_eq!(bundle.mode, ConstraintMode::Permissive);
    assert!(!world
        .gateway
        .verify(&bundle.proof, &bundle.signal_array(), alice()));
}

// =========================================================================
// Policy and audit
// =========================================================================

#[test]
fn test_wrong_country_refused() {
    let world = World::new();
    let err = prove(
        ConstraintMode::Strict,
        &world.request(date(2000, 1, 1), "CA", alice()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("citizenship"), "unexpected error: {err}");
}

#[test]
fn test_audit_log_records_both_outcomes() {
    let world = World::new();
    let bundle = prove(
        ConstraintMode::Strict,
        &world.request(date(2000, 1, 1), "US", alice()),
    )
    .unwrap();

    let accepted = world
        .gateway
        .verify_and_record(&bundle.proof, &bundle.signal_array(), alice());
    let rejected = world
        .gateway
        .verify_and_record(&bundle.proof, &bundle.signal_array(), mallory());
    assert!(accepted.accepted);
    assert!(!rejected.accepted);

    let log = world.gateway.audit_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log.accepted_count(), 1);
    assert_eq!(log.by_caller(&mallory()), vec![rejected]);

    let restored = AuditLog::from_json(&log.to_json().unwrap()).unwrap();
    assert_eq!(restored.records(), log.records());
}
