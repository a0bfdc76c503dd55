//! Resolution finalization: the single terminal transition of a request.

use soroban_sdk::{log, Address, Bytes, BytesN, Env};

use crate::attestation_ledger;
use crate::errors::Error;
use crate::events::ResolutionFinalized;
use crate::operators;
use crate::quorum;
use crate::requests;
use crate::types::Fulfillment;
use crate::DataKey;

/// Finalizes `request_id` with `outcome` if that side currently meets the
/// required weight, and writes the fulfillment record.
///
/// # Errors
/// * `NotFound` - unknown request.
/// * `Unauthorized` - caller is not an eligible operator.
/// * `AlreadyFulfilled` - request was finalized before.
/// * `InvalidParameter` - the claimed side has no attestations or is below the required weight.
pub fn finalize_resolution(
    e: &Env,
    operator: &Address,
    request_id: &BytesN<32>,
    outcome: bool,
    aggregate_signature: Bytes,
) -> Result<Fulfillment, Error> {
    operator.require_auth();

    let mut request = requests::get_request(e, request_id)?;
    operators::require_eligible(e, operator)?;
    if request.fulfilled || is_finalized(e, request_id) {
        return Err(Error::AlreadyFulfilled);
    }

    let status = quorum::current_status(e, request_id);
    let winning_weight = quorum::side_weight(&status, outcome);
    if winning_weight == 0 || winning_weight < status.required_weight {
        return Err(Error::InvalidParameter);
    }
    let winner = attestation_ledger::first_attestation_for(e, request_id, outcome)
        .ok_or(Error::InvalidParameter)?;

    request.fulfilled = true;
    requests::save_request(e, &request);

    let fulfillment = Fulfillment {
        exists: true,
        attestation_cid: winner.attestation_cid.clone(),
        outcome,
        metadata: aggregate_signature.clone(),
        winning_weight,
        finalized_at: e.ledger().timestamp(),
    };
    let key = DataKey::Fulfillment(request_id.clone());
    e.storage().persistent().set(&key, &fulfillment);
    crate::bump(e, &key);
    crate::bump_instance(e);

    ResolutionFinalized {
        request_id: request_id.clone(),
        outcome,
        aggregate_signature,
        winning_weight,
        attestation_cid: winner.attestation_cid,
        finalizer: operator.clone(),
    }
    .publish(e);
    log!(e, "resolution finalized", request_id.clone(), outcome, winning_weight);

    Ok(fulfillment)
}

#[must_use]
pub fn is_finalized(e: &Env, request_id: &BytesN<32>) -> bool {
    e.storage()
        .persistent()
        .has(&DataKey::Fulfillment(request_id.clone()))
}

/// Fulfillment of a known request, or an empty record while it is open.
pub fn get_fulfillment(e: &Env, request_id: &BytesN<32>) -> Result<Fulfillment, Error> {
    requests::get_request(e, request_id)?;
    Ok(e.storage()
        .persistent()
        .get(&DataKey::Fulfillment(request_id.clone()))
        .unwrap_or_else(|| Fulfillment::empty(e)))
}
