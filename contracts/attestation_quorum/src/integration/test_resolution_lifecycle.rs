//! End-to-end resolution flows across requests, attestations and finalization.

#![cfg(test)]

use crate::test_helpers::{self, TestVerifier};
use crate::*;
use soroban_sdk::testutils::storage::Persistent as _;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Bytes, Env};

#[test]
fn test_full_resolution_lifecycle() {
    let e = Env::default();
    let (client, admin) = test_helpers::setup(&e);

    // Operators and the proof signer.
    let verifier = TestVerifier::new(11);
    verifier.authorize(&e, &client, &admin);
    let op1 = test_helpers::register_operator(&e, &client, &admin, 100);
    let op2 = test_helpers::register_operator(&e, &client, &admin, 100);
    let op3 = test_helpers::register_operator(&e, &client, &admin, 100);
    assert_eq!(client.get_total_weight(), 300);

    // Open.
    e.ledger().set_timestamp(1_000);
    let request_id = test_helpers::open_request(&e, &client);
    assert_eq!(client.get_request_state(&request_id), RequestState::Created);

    // Attest.
    test_helpers::attest(&e, &client, &verifier, &op1, &request_id, true);
    test_helpers::attest(&e, &client, &verifier, &op2, &request_id, false);
    assert_eq!(client.get_request_state(&request_id), RequestState::Attesting);
    test_helpers::attest(&e, &client, &verifier, &op3, &request_id, true);
    assert_eq!(
        client.get_request_state(&request_id),
        RequestState::QuorumReached(true)
    );

    // Finalize.
    e.ledger().set_timestamp(2_000);
    let aggregate = Bytes::from_slice(&e, &[0x5a; 96]);
    let fulfillment = client.finalize_resolution(&op2, &request_id, &true, &aggregate);
    assert!(fulfillment.exists);
    assert!(fulfillment.outcome);
    assert_eq!(fulfillment.winning_weight, 200);
    assert_eq!(fulfillment.finalized_at, 2_000);
    assert_eq!(client.get_request_state(&request_id), RequestState::Finalized);

    // Terminal.
    assert_eq!(
        client.try_finalize_resolution(&op1, &request_id, &true, &aggregate),
        Err(Ok(Error::AlreadyFulfilled))
    );
    assert_eq!(client.get_attestations(&request_id).len(), 3);
    assert_eq!(client.get_fulfillment(&request_id), fulfillment);
}

#[test]
fn test_requests_resolve_independently() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[100, 100, 100], 66);
    let other = test_helpers::open_request(&e, &f.client);

    f.attest(&e, 0, true);
    f.attest(&e, 1, true);
    test_helpers::attest(&e, &f.client, &f.verifier, &f.operator(0), &other, false);

    f.client
        .finalize_resolution(&f.operator(2), &f.request_id, &true, &Bytes::new(&e));

    assert!(f.client.get_fulfillment(&f.request_id).exists);
    assert!(!f.client.get_fulfillment(&other).exists);
    let status = f.client.get_quorum_status(&other);
    assert_eq!(status.no_weight, 100);
    assert!(!status.is_quorum_reached);
    assert_eq!(f.client.get_request_count(), 2);
}

#[test]
fn test_single_signer_configuration() {
    // One operator holding all weight with a 100% threshold finalizes on its
    // own first attestation.
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[1], 100);

    f.attest(&e, 0, false);
    let status = f.client.get_quorum_status(&f.request_id);
    assert_eq!(status.required_weight, 1);
    assert!(status.is_quorum_reached);

    let fulfillment =
        f.client
            .finalize_resolution(&f.operator(0), &f.request_id, &false, &Bytes::new(&e));
    assert!(!fulfillment.outcome);
    assert_eq!(fulfillment.winning_weight, 1);
}

#[test]
fn test_rotating_verifier_mid_request() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[100, 100, 100], 66);
    f.attest(&e, 0, true);

    let replacement = TestVerifier::new(12);
    replacement.authorize(&e, &f.client, &f.admin);
    f.client
        .set_verifier(&f.admin, &f.verifier.address(&e, &f.client), &false);

    // Proofs from the revoked signer no longer count.
    let stale = f
        .verifier
        .prove_attestation(&e, &f.client, &f.request_id, true);
    assert_eq!(
        f.client.try_submit_attestation(
            &f.operator(1),
            &f.request_id,
            &true,
            &test_helpers::cid(&e, "bafy-stale"),
            &Bytes::new(&e),
            &stale,
            &test_helpers::DATA_TIMESTAMP,
        ),
        Err(Ok(Error::Unauthorized))
    );

    test_helpers::attest(
        &e,
        &f.client,
        &replacement,
        &f.operator(1),
        &f.request_id,
        true,
    );
    assert!(f.client.get_quorum_status(&f.request_id).is_quorum_reached);
}

#[test]
fn test_removed_operator_cannot_finalize() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[100, 100, 100], 50);
    f.attest(&e, 0, true);
    f.attest(&e, 1, true);

    f.client.set_avs_node(&f.admin, &f.operator(2), &false);
    assert_eq!(
        f.client
            .try_finalize_resolution(&f.operator(2), &f.request_id, &true, &Bytes::new(&e)),
        Err(Ok(Error::Unauthorized))
    );

    let stranger = Address::generate(&e);
    assert!(!f.client.is_eligible(&stranger));
    f.client
        .finalize_resolution(&f.operator(0), &f.request_id, &true, &Bytes::new(&e));
}

#[test]
fn test_open_request_entries_stay_live() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[100], 66);
    let ttl = |key: DataKey| {
        e.as_contract(&f.client.address, || e.storage().persistent().get_ttl(&key))
    };
    let request_key = DataKey::Request(f.request_id.clone());
    assert_eq!(ttl(request_key.clone()), BUMP_AMOUNT);

    // Past the threshold the next write renews every entry of the request.
    e.ledger().set_sequence_number(20_000);
    assert_eq!(ttl(request_key.clone()), BUMP_AMOUNT - 20_000);
    f.attest(&e, 0, true);
    assert_eq!(ttl(request_key.clone()), BUMP_AMOUNT);
    assert_eq!(ttl(DataKey::Attestations(f.request_id.clone())), BUMP_AMOUNT);
    assert_eq!(ttl(DataKey::Tally(f.request_id.clone())), BUMP_AMOUNT);

    e.ledger().set_sequence_number(40_000);
    f.client
        .finalize_resolution(&f.operator(0), &f.request_id, &true, &Bytes::new(&e));
    assert_eq!(ttl(request_key), BUMP_AMOUNT);
    assert_eq!(ttl(DataKey::Fulfillment(f.request_id.clone())), BUMP_AMOUNT);
}
