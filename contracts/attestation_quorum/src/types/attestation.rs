//! Attestation record and the data spec a proof is bound to.

use soroban_sdk::{contracttype, Address, Bytes, String};

/// Length of the hash header: data source, computation and result hashes.
pub const PROOF_HEADER_LEN: u32 = 96;

/// Header plus a 65-byte recoverable secp256k1 signature (r ∥ s ∥ v).
pub const PROOF_LEN: u32 = PROOF_HEADER_LEN + 65;

/// Upper bound on an encoded expected result.
pub const MAX_RESULT_LEN: u32 = 256;

/// One operator's attestation on a request.
///
/// # Fields
/// * `operator` - Attesting operator.
/// * `outcome` - Claimed market outcome.
/// * `attestation_cid` - Content identifier of the off-chain attestation blob, never interpreted.
/// * `signature` - Operator signature over the attestation, stored as given.
/// * `proof` - Proof bundle that was verified on submission.
/// * `timestamp` - Operator-supplied data timestamp, also bound into the proof.
/// * `weight` - Operator weight counted into the tally at submission.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attestation {
    pub operator: Address,
    pub outcome: bool,
    pub attestation_cid: String,
    pub signature: Bytes,
    pub proof: Bytes,
    pub timestamp: u64,
    pub weight: u64,
}

/// Inputs a proof is checked against.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataSpec {
    pub data_source_id: Bytes,
    pub query_logic: Bytes,
    pub timestamp: u64,
    pub expected_result: Bytes,
}
