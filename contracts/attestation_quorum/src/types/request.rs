use soroban_sdk::{contracttype, Address, Bytes, BytesN};

/// A resolution request opened by a requester.
///
/// `market_ref` and `data` are opaque to the contract; they only feed the
/// request id and the data spec that attestation proofs are checked against.
/// `fulfilled` is the only field that changes after creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    pub request_id: BytesN<32>,
    pub requester: Address,
    pub market_ref: Bytes,
    pub data: Bytes,
    pub fulfilled: bool,
    pub created_at: u64,
}

/// Live quorum view for a request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuorumStatus {
    pub is_quorum_reached: bool,
    pub yes_weight: u64,
    pub no_weight: u64,
    pub required_weight: u64,
}

/// Lifecycle of a request, derived from its attestations and fulfillment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RequestState {
    /// Open, no attestations yet.
    Created,
    /// At least one attestation, neither side at the required weight.
    Attesting,
    /// A side meets the required weight (YES reported first if both do).
    QuorumReached(bool),
    /// Terminal.
    Finalized,
}

/// Combined operator view: the node flag and the weight are independent.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorInfo {
    pub is_node: bool,
    pub weight: u64,
}
