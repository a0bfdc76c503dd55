//! Operator registry: admin, AVS node flags, operator weights, the quorum
//! threshold and the set of signers authorized to sign proofs.
//!
//! All writes are admin-only; the caller passes the address it claims to be
//! and that address must both match the stored admin and authorize the call.
//! `TotalWeight` is maintained incrementally so it always equals the sum of
//! every stored operator weight.

use soroban_sdk::{Address, BytesN, Env};

use crate::errors::Error;
use crate::events::{
    AdminTransferred, OperatorNodeUpdated, OperatorWeightUpdated, QuorumThresholdUpdated,
    VerifierUpdated,
};
use crate::types::OperatorInfo;
use crate::DataKey;

/// Threshold (percent of total weight) applied until the admin changes it.
pub const DEFAULT_QUORUM_THRESHOLD: u32 = 66;

pub const MAX_QUORUM_THRESHOLD: u32 = 100;

/// Strkeys of the all-zero account and contract ids.
const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";
const ZERO_CONTRACT: &str = "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4";

pub fn initialize(e: &Env, admin: &Address) -> Result<(), Error> {
    if e.storage().instance().has(&DataKey::Admin) {
        return Err(Error::AlreadyInitialized);
    }
    reject_zero_address(admin)?;
    e.storage().instance().set(&DataKey::Admin, admin);
    e.storage()
        .instance()
        .set(&DataKey::QuorumThreshold, &DEFAULT_QUORUM_THRESHOLD);
    e.storage().instance().set(&DataKey::TotalWeight, &0_u64);
    Ok(())
}

pub fn get_admin(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

/// Checks that `caller` is the admin and has authorized this invocation.
pub fn require_admin(e: &Env, caller: &Address) -> Result<(), Error> {
    let admin = get_admin(e)?;
    if *caller != admin {
        return Err(Error::OnlyAdmin);
    }
    caller.require_auth();
    Ok(())
}

pub fn transfer_admin(e: &Env, caller: &Address, new_admin: &Address) -> Result<(), Error> {
    require_admin(e, caller)?;
    reject_zero_address(new_admin)?;
    e.storage().instance().set(&DataKey::Admin, new_admin);
    AdminTransferred {
        old_admin: caller.clone(),
        new_admin: new_admin.clone(),
    }
    .publish(e);
    Ok(())
}

/// Compares the address's strkey against both zero ids with a single host
/// conversion.
#[must_use]
pub fn is_zero_address(addr: &Address) -> bool {
    let strkey = addr.to_string();
    if strkey.len() as usize != ZERO_ACCOUNT.len() {
        return false;
    }
    let mut buf = [0u8; ZERO_ACCOUNT.len()];
    strkey.copy_into_slice(&mut buf);
    buf[..] == *ZERO_ACCOUNT.as_bytes() || buf[..] == *ZERO_CONTRACT.as_bytes()
}

fn reject_zero_address(addr: &Address) -> Result<(), Error> {
    if is_zero_address(addr) {
        return Err(Error::ZeroAddress);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// AVS nodes and weights
// ---------------------------------------------------------------------------

pub fn set_avs_node(
    e: &Env,
    caller: &Address,
    operator: &Address,
    enabled: bool,
) -> Result<(), Error> {
    require_admin(e, caller)?;
    reject_zero_address(operator)?;
    let key = DataKey::AvsNode(operator.clone());
    if enabled {
        e.storage().instance().set(&key, &true);
    } else {
        e.storage().instance().remove(&key);
    }
    OperatorNodeUpdated {
        operator: operator.clone(),
        enabled,
    }
    .publish(e);
    Ok(())
}

#[must_use]
pub fn is_avs_node(e: &Env, operator: &Address) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::AvsNode(operator.clone()))
        .unwrap_or(false)
}

/// Sets an operator's weight and moves `TotalWeight` by the difference.
pub fn set_operator_weight(
    e: &Env,
    caller: &Address,
    operator: &Address,
    weight: u64,
) -> Result<(), Error> {
    require_admin(e, caller)?;
    reject_zero_address(operator)?;

    let old_weight = get_operator_weight(e, operator);
    let total = get_total_weight(e);
    let new_total = if weight >= old_weight {
        total.checked_add(weight - old_weight)
    } else {
        total.checked_sub(old_weight - weight)
    }
    .ok_or(Error::InvalidParameter)?;

    let key = DataKey::OperatorWeight(operator.clone());
    if weight == 0 {
        e.storage().instance().remove(&key);
    } else {
        e.storage().instance().set(&key, &weight);
    }
    e.storage().instance().set(&DataKey::TotalWeight, &new_total);

    OperatorWeightUpdated {
        operator: operator.clone(),
        old_weight,
        new_weight: weight,
        total_weight: new_total,
    }
    .publish(e);
    Ok(())
}

#[must_use]
pub fn get_operator_weight(e: &Env, operator: &Address) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::OperatorWeight(operator.clone()))
        .unwrap_or(0)
}

#[must_use]
pub fn get_total_weight(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::TotalWeight)
        .unwrap_or(0)
}

#[must_use]
pub fn get_operator(e: &Env, operator: &Address) -> OperatorInfo {
    OperatorInfo {
        is_node: is_avs_node(e, operator),
        weight: get_operator_weight(e, operator),
    }
}

#[must_use]
pub fn is_eligible(e: &Env, operator: &Address) -> bool {
    is_avs_node(e, operator) && get_operator_weight(e, operator) > 0
}

/// Returns the operator's current weight if it may attest or finalize.
pub fn require_eligible(e: &Env, operator: &Address) -> Result<u64, Error> {
    let weight = get_operator_weight(e, operator);
    if !is_avs_node(e, operator) || weight == 0 {
        return Err(Error::Unauthorized);
    }
    Ok(weight)
}

// ---------------------------------------------------------------------------
// Quorum threshold
// ---------------------------------------------------------------------------

pub fn set_quorum_threshold(e: &Env, caller: &Address, percent: u32) -> Result<(), Error> {
    require_admin(e, caller)?;
    if percent > MAX_QUORUM_THRESHOLD {
        return Err(Error::InvalidParameter);
    }
    let old_percent = get_quorum_threshold(e);
    e.storage()
        .instance()
        .set(&DataKey::QuorumThreshold, &percent);
    QuorumThresholdUpdated {
        old_percent,
        new_percent: percent,
    }
    .publish(e);
    Ok(())
}

#[must_use]
pub fn get_quorum_threshold(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&DataKey::QuorumThreshold)
        .unwrap_or(DEFAULT_QUORUM_THRESHOLD)
}

// ---------------------------------------------------------------------------
// Authorized proof signers
// ---------------------------------------------------------------------------

pub fn set_verifier(
    e: &Env,
    caller: &Address,
    signer: &BytesN<20>,
    enabled: bool,
) -> Result<(), Error> {
    require_admin(e, caller)?;
    if signer.to_array() == [0u8; 20] {
        return Err(Error::ZeroAddress);
    }
    let key = DataKey::Verifier(signer.clone());
    if enabled {
        e.storage().instance().set(&key, &true);
    } else {
        e.storage().instance().remove(&key);
    }
    VerifierUpdated {
        signer: signer.clone(),
        enabled,
    }
    .publish(e);
    Ok(())
}

#[must_use]
pub fn is_verifier(e: &Env, signer: &BytesN<20>) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::Verifier(signer.clone()))
        .unwrap_or(false)
}
