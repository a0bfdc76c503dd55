//! Weighted quorum evaluation.
//!
//! Per-request tallies hold the YES and NO weight accumulated at submission
//! time. Total weight and the threshold are read live on every evaluation,
//! so admin changes move the required weight of requests that are still open.

use soroban_sdk::{BytesN, Env};

use crate::operators;
use crate::types::QuorumStatus;
use crate::DataKey;

/// `ceil(total_weight * threshold_percent / 100)`.
#[must_use]
pub fn required_weight(total_weight: u64, threshold_percent: u32) -> u64 {
    let scaled = u128::from(total_weight) * u128::from(threshold_percent);
    u64::try_from(scaled.div_ceil(100)).unwrap_or(u64::MAX)
}

#[must_use]
pub fn evaluate(
    yes_weight: u64,
    no_weight: u64,
    total_weight: u64,
    threshold_percent: u32,
) -> QuorumStatus {
    let required = required_weight(total_weight, threshold_percent);
    QuorumStatus {
        is_quorum_reached: yes_weight >= required || no_weight >= required,
        yes_weight,
        no_weight,
        required_weight: required,
    }
}

#[must_use]
pub fn side_weight(status: &QuorumStatus, outcome: bool) -> u64 {
    if outcome {
        status.yes_weight
    } else {
        status.no_weight
    }
}

/// Returns `(yes_weight, no_weight)` for a request.
#[must_use]
pub fn get_tally(e: &Env, request_id: &BytesN<32>) -> (u64, u64) {
    e.storage()
        .persistent()
        .get(&DataKey::Tally(request_id.clone()))
        .unwrap_or((0, 0))
}

pub fn set_tally(e: &Env, request_id: &BytesN<32>, tally: (u64, u64)) {
    let key = DataKey::Tally(request_id.clone());
    e.storage().persistent().set(&key, &tally);
    crate::bump(e, &key);
}

#[must_use]
pub fn current_status(e: &Env, request_id: &BytesN<32>) -> QuorumStatus {
    let (yes_weight, no_weight) = get_tally(e, request_id);
    evaluate(
        yes_weight,
        no_weight,
        operators::get_total_weight(e),
        operators::get_quorum_threshold(e),
    )
}
