//! Attestation ledger: one attestation per (request, operator), each bound to
//! a verified proof, with running YES/NO weight tallies.
//!
//! Attestations are kept per request in submission order. A separate
//! `Attested(request, operator)` entry indexes into that list and is what
//! rejects a second submission from the same operator.

use soroban_sdk::{log, Address, Bytes, BytesN, Env, String, Vec};

use crate::errors::Error;
use crate::events::{AttestationSubmitted, QuorumReached};
use crate::operators;
use crate::proof;
use crate::quorum;
use crate::requests;
use crate::types::{Attestation, DataSpec, Request};
use crate::DataKey;

/// String form of an outcome as committed to in a proof's result hash.
#[must_use]
pub fn outcome_result(e: &Env, outcome: bool) -> Bytes {
    if outcome {
        Bytes::from_slice(e, b"true")
    } else {
        Bytes::from_slice(e, b"false")
    }
}

/// Data spec an attestation on `request` must prove: the market reference is
/// the data source, the request payload is the query and the claimed outcome
/// is the expected result.
#[must_use]
pub fn data_spec_for(e: &Env, request: &Request, outcome: bool, timestamp: u64) -> DataSpec {
    DataSpec {
        data_source_id: request.market_ref.clone(),
        query_logic: request.data.clone(),
        timestamp,
        expected_result: outcome_result(e, outcome),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn submit_attestation(
    e: &Env,
    operator: &Address,
    request_id: &BytesN<32>,
    outcome: bool,
    attestation_cid: String,
    signature: Bytes,
    proof: Bytes,
    timestamp: u64,
) -> Result<(), Error> {
    operator.require_auth();

    let request = requests::get_request(e, request_id)?;
    let weight = operators::require_eligible(e, operator)?;

    let attested_key = DataKey::Attested(request_id.clone(), operator.clone());
    if e.storage().persistent().has(&attested_key) {
        return Err(Error::AlreadyFulfilled);
    }
    if request.fulfilled {
        return Err(Error::AlreadyFulfilled);
    }

    let spec = data_spec_for(e, &request, outcome, timestamp);
    let result = proof::check(e, &proof, &spec)?;
    if result != outcome_result(e, outcome) {
        return Err(Error::InvalidParameter);
    }

    let (yes_weight, no_weight) = quorum::get_tally(e, request_id);
    let tally = if outcome {
        (
            yes_weight.checked_add(weight).ok_or(Error::InvalidParameter)?,
            no_weight,
        )
    } else {
        (
            yes_weight,
            no_weight.checked_add(weight).ok_or(Error::InvalidParameter)?,
        )
    };

    let mut attestations = get_attestations(e, request_id);
    let index = attestations.len();
    attestations.push_back(Attestation {
        operator: operator.clone(),
        outcome,
        attestation_cid: attestation_cid.clone(),
        signature,
        proof,
        timestamp,
        weight,
    });
    let list_key = DataKey::Attestations(request_id.clone());
    e.storage().persistent().set(&list_key, &attestations);
    crate::bump(e, &list_key);
    e.storage().persistent().set(&attested_key, &index);
    crate::bump(e, &attested_key);
    quorum::set_tally(e, request_id, tally);
    crate::bump(e, &DataKey::Request(request_id.clone()));
    crate::bump_instance(e);

    AttestationSubmitted {
        request_id: request_id.clone(),
        operator: operator.clone(),
        outcome,
        attestation_cid,
        weight,
        timestamp,
    }
    .publish(e);
    log!(e, "attestation accepted", request_id.clone(), outcome, weight);

    let status = quorum::current_status(e, request_id);
    let bucket = quorum::side_weight(&status, outcome);
    let signalled_key = DataKey::QuorumSignalled(request_id.clone(), outcome);
    if bucket >= status.required_weight && !e.storage().persistent().has(&signalled_key) {
        e.storage().persistent().set(&signalled_key, &true);
        crate::bump(e, &signalled_key);
        QuorumReached {
            request_id: request_id.clone(),
            outcome,
            weight: bucket,
            required_weight: status.required_weight,
        }
        .publish(e);
        log!(e, "quorum reached", request_id.clone(), outcome, bucket);
    }

    Ok(())
}

/// Attestations for a request in submission order; empty if there are none.
#[must_use]
pub fn get_attestations(e: &Env, request_id: &BytesN<32>) -> Vec<Attestation> {
    e.storage()
        .persistent()
        .get(&DataKey::Attestations(request_id.clone()))
        .unwrap_or(Vec::new(e))
}

#[must_use]
pub fn get_attestation(
    e: &Env,
    request_id: &BytesN<32>,
    operator: &Address,
) -> Option<Attestation> {
    let index: u32 = e
        .storage()
        .persistent()
        .get(&DataKey::Attested(request_id.clone(), operator.clone()))?;
    get_attestations(e, request_id).get(index)
}

#[must_use]
pub fn has_attested(e: &Env, request_id: &BytesN<32>, operator: &Address) -> bool {
    e.storage()
        .persistent()
        .has(&DataKey::Attested(request_id.clone(), operator.clone()))
}

/// Earliest attestation on the given side.
#[must_use]
pub fn first_attestation_for(
    e: &Env,
    request_id: &BytesN<32>,
    outcome: bool,
) -> Option<Attestation> {
    get_attestations(e, request_id)
        .iter()
        .find(|a| a.outcome == outcome)
}
