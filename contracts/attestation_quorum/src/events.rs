//! Contract events.
//!
//! Each event carries enough data for an indexer to rebuild request,
//! attestation and fulfillment state without reading contract storage.

use soroban_sdk::{contractevent, Address, Bytes, BytesN, String};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerificationRequested {
    pub request_id: BytesN<32>,
    pub requester: Address,
    pub market_ref: Bytes,
    pub data: Bytes,
    pub created_at: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttestationSubmitted {
    pub request_id: BytesN<32>,
    pub operator: Address,
    pub outcome: bool,
    pub attestation_cid: String,
    pub weight: u64,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuorumReached {
    pub request_id: BytesN<32>,
    pub outcome: bool,
    pub weight: u64,
    pub required_weight: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolutionFinalized {
    pub request_id: BytesN<32>,
    pub outcome: bool,
    pub aggregate_signature: Bytes,
    pub winning_weight: u64,
    pub attestation_cid: String,
    pub finalizer: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorNodeUpdated {
    pub operator: Address,
    pub enabled: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorWeightUpdated {
    pub operator: Address,
    pub old_weight: u64,
    pub new_weight: u64,
    pub total_weight: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuorumThresholdUpdated {
    pub old_percent: u32,
    pub new_percent: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerifierUpdated {
    pub signer: BytesN<20>,
    pub enabled: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferred {
    pub old_admin: Address,
    pub new_admin: Address,
}
