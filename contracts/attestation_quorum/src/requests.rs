//! Request registry: opens resolution requests and derives their lifecycle state.

use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{log, Address, Bytes, BytesN, Env};

use crate::errors::Error;
use crate::events::VerificationRequested;
use crate::finalization;
use crate::quorum;
use crate::types::{Request, RequestState};
use crate::DataKey;

/// Opens a new request and returns its id.
///
/// The id hashes the requester, both payloads, the ledger time and sequence
/// and a contract-wide nonce, so identical calls always yield distinct ids.
pub fn request_resolution(
    e: &Env,
    requester: &Address,
    market_ref: Bytes,
    data: Bytes,
) -> Result<BytesN<32>, Error> {
    requester.require_auth();

    let nonce: u64 = e
        .storage()
        .instance()
        .get(&DataKey::RequestNonce)
        .unwrap_or(0);
    let next_nonce = nonce.checked_add(1).ok_or(Error::InvalidParameter)?;
    let created_at = e.ledger().timestamp();

    let mut preimage = requester.clone().to_xdr(e);
    preimage.extend_from_array(&market_ref.len().to_be_bytes());
    preimage.append(&market_ref);
    preimage.extend_from_array(&data.len().to_be_bytes());
    preimage.append(&data);
    preimage.extend_from_array(&created_at.to_be_bytes());
    preimage.extend_from_array(&e.ledger().sequence().to_be_bytes());
    preimage.extend_from_array(&nonce.to_be_bytes());
    let request_id = e.crypto().keccak256(&preimage).to_bytes();

    let key = DataKey::Request(request_id.clone());
    if e.storage().persistent().has(&key) {
        return Err(Error::InvalidParameter);
    }

    let request = Request {
        request_id: request_id.clone(),
        requester: requester.clone(),
        market_ref: market_ref.clone(),
        data: data.clone(),
        fulfilled: false,
        created_at,
    };
    e.storage().persistent().set(&key, &request);
    crate::bump(e, &key);
    e.storage()
        .instance()
        .set(&DataKey::RequestNonce, &next_nonce);
    e.storage()
        .instance()
        .set(&DataKey::RequestCount, &(get_request_count(e) + 1));
    crate::bump_instance(e);

    VerificationRequested {
        request_id: request_id.clone(),
        requester: requester.clone(),
        market_ref,
        data,
        created_at,
    }
    .publish(e);
    log!(e, "request opened", request_id.clone(), requester.clone());

    Ok(request_id)
}

pub fn get_request(e: &Env, request_id: &BytesN<32>) -> Result<Request, Error> {
    e.storage()
        .persistent()
        .get(&DataKey::Request(request_id.clone()))
        .ok_or(Error::NotFound)
}

pub(crate) fn save_request(e: &Env, request: &Request) {
    let key = DataKey::Request(request.request_id.clone());
    e.storage().persistent().set(&key, request);
    crate::bump(e, &key);
}

#[must_use]
pub fn get_request_count(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::RequestCount)
        .unwrap_or(0)
}

pub fn request_state(e: &Env, request_id: &BytesN<32>) -> Result<RequestState, Error> {
    let request = get_request(e, request_id)?;
    if request.fulfilled || finalization::is_finalized(e, request_id) {
        return Ok(RequestState::Finalized);
    }
    let status = quorum::current_status(e, request_id);
    if status.yes_weight == 0 && status.no_weight == 0 {
        return Ok(RequestState::Created);
    }
    if status.yes_weight >= status.required_weight {
        return Ok(RequestState::QuorumReached(true));
    }
    if status.no_weight >= status.required_weight {
        return Ok(RequestState::QuorumReached(false));
    }
    Ok(RequestState::Attesting)
}
