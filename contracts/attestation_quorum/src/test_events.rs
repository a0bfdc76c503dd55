//! Tests for emitted events: payloads and when each one fires.
//!
//! Events are read after the call that emits them; the host only keeps the
//! events of the most recent top-level invocation.

#![cfg(test)]

use crate::events::{
    AttestationSubmitted, OperatorWeightUpdated, QuorumReached, ResolutionFinalized,
    VerificationRequested,
};
use crate::test_helpers::{self, cid, ATTESTATION_CID, DATA_TIMESTAMP, MARKET_REF, QUESTION};
use crate::*;
use soroban_sdk::testutils::{Address as _, Events as _, Ledger};
use soroban_sdk::{vec, Address, Bytes, Env, Event, Val, Vec};

fn record<T: Event>(e: &Env, contract: &Address, event: &T) -> (Address, Vec<Val>, Val) {
    (contract.clone(), event.topics(e), event.data(e))
}

fn submitted(
    e: &Env,
    f: &test_helpers::Fixture,
    i: u32,
    outcome: bool,
    weight: u64,
) -> AttestationSubmitted {
    AttestationSubmitted {
        request_id: f.request_id.clone(),
        operator: f.operator(i),
        outcome,
        attestation_cid: cid(e, ATTESTATION_CID),
        weight,
        timestamp: DATA_TIMESTAMP,
    }
}

fn quorum(
    f: &test_helpers::Fixture,
    outcome: bool,
    weight: u64,
    required_weight: u64,
) -> QuorumReached {
    QuorumReached {
        request_id: f.request_id.clone(),
        outcome,
        weight,
        required_weight,
    }
}

#[test]
fn request_opened_event() {
    let e = Env::default();
    let (client, _admin) = test_helpers::setup(&e);
    e.ledger().set_timestamp(1_234);

    let requester = Address::generate(&e);
    let market_ref = Bytes::from_slice(&e, MARKET_REF);
    let data = Bytes::from_slice(&e, QUESTION);
    let request_id = client.request_resolution(&requester, &market_ref, &data);

    let expected = VerificationRequested {
        request_id,
        requester,
        market_ref,
        data,
        created_at: 1_234,
    };
    assert_eq!(e.events().all(), vec![&e, record(&e, &client.address, &expected)]);
}

#[test]
fn quorum_signalled_when_second_half_arrives() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[50, 50], 66);
    let contract = f.client.address.clone();

    f.attest(&e, 0, true);
    assert_eq!(
        e.events().all(),
        vec![&e, record(&e, &contract, &submitted(&e, &f, 0, true, 50))]
    );

    f.attest(&e, 1, true);
    assert_eq!(
        e.events().all(),
        vec![
            &e,
            record(&e, &contract, &submitted(&e, &f, 1, true, 50)),
            record(&e, &contract, &quorum(&f, true, 100, 66)),
        ]
    );
}

#[test]
fn quorum_signalled_only_on_first_crossing() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[40, 40, 20], 66);
    let contract = f.client.address.clone();

    f.attest(&e, 0, true);
    assert_eq!(e.events().all().len(), 1);

    f.attest(&e, 1, true);
    assert_eq!(
        e.events().all(),
        vec![
            &e,
            record(&e, &contract, &submitted(&e, &f, 1, true, 40)),
            record(&e, &contract, &quorum(&f, true, 80, 66)),
        ]
    );

    f.attest(&e, 2, true);
    assert_eq!(
        e.events().all(),
        vec![&e, record(&e, &contract, &submitted(&e, &f, 2, true, 20))]
    );
}

#[test]
fn each_side_signals_once() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[50, 50], 50);
    let contract = f.client.address.clone();

    f.attest(&e, 0, true);
    assert_eq!(
        e.events().all(),
        vec![
            &e,
            record(&e, &contract, &submitted(&e, &f, 0, true, 50)),
            record(&e, &contract, &quorum(&f, true, 50, 50)),
        ]
    );

    f.attest(&e, 1, false);
    assert_eq!(
        e.events().all(),
        vec![
            &e,
            record(&e, &contract, &submitted(&e, &f, 1, false, 50)),
            record(&e, &contract, &quorum(&f, false, 50, 50)),
        ]
    );
}

#[test]
fn finalization_event_carries_fulfillment() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[100, 100, 100], 66);
    f.attest(&e, 0, true);
    f.attest(&e, 1, true);

    let aggregate = Bytes::from_slice(&e, b"bls-aggregate");
    let fulfillment =
        f.client
            .finalize_resolution(&f.operator(2), &f.request_id, &true, &aggregate);

    let expected = ResolutionFinalized {
        request_id: f.request_id.clone(),
        outcome: true,
        aggregate_signature: aggregate,
        winning_weight: 200,
        attestation_cid: cid(&e, ATTESTATION_CID),
        finalizer: f.operator(2),
    };
    assert_eq!(
        e.events().all(),
        vec![&e, record(&e, &f.client.address, &expected)]
    );
    assert_eq!(fulfillment.winning_weight, expected.winning_weight);
    assert_eq!(fulfillment.attestation_cid, expected.attestation_cid);
}

#[test]
fn rejected_submission_emits_nothing() {
    let e = Env::default();
    let f = test_helpers::fixture(&e, &[100, 100], 66);
    f.attest(&e, 0, true);

    let proof = f
        .verifier
        .prove_attestation(&e, &f.client, &f.request_id, true);
    let result = f.client.try_submit_attestation(
        &f.operator(0),
        &f.request_id,
        &true,
        &cid(&e, ATTESTATION_CID),
        &Bytes::new(&e),
        &proof,
        &DATA_TIMESTAMP,
    );
    assert_eq!(result, Err(Ok(Error::AlreadyFulfilled)));
    assert_eq!(e.events().all().len(), 0);
}

#[test]
fn weight_update_event() {
    let e = Env::default();
    let (client, admin) = test_helpers::setup(&e);
    let first = test_helpers::register_operator(&e, &client, &admin, 30);
    let second = Address::generate(&e);

    client.set_operator_weight(&admin, &second, &45);
    let expected = OperatorWeightUpdated {
        operator: second,
        old_weight: 0,
        new_weight: 45,
        total_weight: 75,
    };
    assert_eq!(
        e.events().all(),
        vec![&e, record(&e, &client.address, &expected)]
    );

    client.set_operator_weight(&admin, &first, &10);
    let expected = OperatorWeightUpdated {
        operator: first,
        old_weight: 30,
        new_weight: 10,
        total_weight: 55,
    };
    assert_eq!(
        e.events().all(),
        vec![&e, record(&e, &client.address, &expected)]
    );
}
