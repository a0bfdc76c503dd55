#![no_std]

//! # Attestation Quorum Contract
//!
//! Resolves market questions from operator attestations. Requesters open
//! requests, registered operators submit proof-backed YES/NO attestations
//! weighted by their stake, and once one side holds the configured share of
//! total weight any eligible operator finalizes the request into an
//! immutable fulfillment.

use soroban_sdk::{
    contract, contractimpl, contracttype, Address, Bytes, BytesN, Env, String, Vec,
};

pub mod attestation_ledger;
mod curve;
pub mod errors;
pub mod events;
pub mod finalization;
pub mod operators;
pub mod proof;
pub mod quorum;
pub mod requests;
pub mod types;

pub use errors::Error;
pub use types::{
    Attestation, DataSpec, Fulfillment, OperatorInfo, QuorumStatus, Request, RequestState,
};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    /// Quorum threshold in percent of total weight.
    QuorumThreshold,
    /// Sum of all operator weights.
    TotalWeight,
    AvsNode(Address),
    OperatorWeight(Address),
    /// Authorized proof signer (20-byte secp256k1 address).
    Verifier(BytesN<20>),
    RequestNonce,
    RequestCount,
    Request(BytesN<32>),
    /// Vec<Attestation> in submission order.
    Attestations(BytesN<32>),
    /// (request, operator) -> index into Attestations.
    Attested(BytesN<32>, Address),
    /// (yes_weight, no_weight).
    Tally(BytesN<32>),
    /// Set once the side first reaches the required weight.
    QuorumSignalled(BytesN<32>, bool),
    Fulfillment(BytesN<32>),
}

const DAY_IN_LEDGERS: u32 = 17_280;

/// Entries stay live for 30 days after the call that last touched them.
pub(crate) const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const LIFETIME_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Extends the TTL of a persistent per-request entry.
pub(crate) fn bump(e: &Env, key: &DataKey) {
    e.storage()
        .persistent()
        .extend_ttl(key, LIFETIME_THRESHOLD, BUMP_AMOUNT);
}

/// Extends the TTL of the contract instance, which holds all configuration.
pub(crate) fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(LIFETIME_THRESHOLD, BUMP_AMOUNT);
}

#[contract]
pub struct AttestationQuorum;

#[contractimpl]
impl AttestationQuorum {
    /// Initialize the contract with an admin address. Threshold starts at 66%.
    pub fn initialize(e: Env, admin: Address) -> Result<(), Error> {
        operators::initialize(&e, &admin)
    }

    pub fn transfer_admin(e: Env, caller: Address, new_admin: Address) -> Result<(), Error> {
        operators::transfer_admin(&e, &caller, &new_admin)
    }

    pub fn get_admin(e: Env) -> Result<Address, Error> {
        operators::get_admin(&e)
    }

    // ---------------------------------------------------------------------
    // Operator registry (admin)
    // ---------------------------------------------------------------------

    /// Enable or disable an operator as an AVS node.
    pub fn set_avs_node(
        e: Env,
        caller: Address,
        operator: Address,
        enabled: bool,
    ) -> Result<(), Error> {
        operators::set_avs_node(&e, &caller, &operator, enabled)
    }

    /// Set an operator's voting weight; total weight moves by the difference.
    pub fn set_operator_weight(
        e: Env,
        caller: Address,
        operator: Address,
        weight: u64,
    ) -> Result<(), Error> {
        operators::set_operator_weight(&e, &caller, &operator, weight)
    }

    /// Set the quorum threshold (0..=100 percent of total weight).
    pub fn set_quorum_threshold(e: Env, caller: Address, percent: u32) -> Result<(), Error> {
        operators::set_quorum_threshold(&e, &caller, percent)
    }

    /// Add or remove a signer whose proofs are accepted.
    pub fn set_verifier(
        e: Env,
        caller: Address,
        signer: BytesN<20>,
        enabled: bool,
    ) -> Result<(), Error> {
        operators::set_verifier(&e, &caller, &signer, enabled)
    }

    pub fn is_avs_node(e: Env, operator: Address) -> bool {
        operators::is_avs_node(&e, &operator)
    }

    pub fn get_operator_weight(e: Env, operator: Address) -> u64 {
        operators::get_operator_weight(&e, &operator)
    }

    pub fn get_operator(e: Env, operator: Address) -> OperatorInfo {
        operators::get_operator(&e, &operator)
    }

    pub fn is_eligible(e: Env, operator: Address) -> bool {
        operators::is_eligible(&e, &operator)
    }

    pub fn get_total_weight(e: Env) -> u64 {
        operators::get_total_weight(&e)
    }

    pub fn get_quorum_threshold(e: Env) -> u32 {
        operators::get_quorum_threshold(&e)
    }

    pub fn is_verifier(e: Env, signer: BytesN<20>) -> bool {
        operators::is_verifier(&e, &signer)
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    /// Open a resolution request. Every call yields a fresh id.
    pub fn request_resolution(
        e: Env,
        requester: Address,
        market_ref: Bytes,
        data: Bytes,
    ) -> Result<BytesN<32>, Error> {
        requests::request_resolution(&e, &requester, market_ref, data)
    }

    pub fn get_request(e: Env, request_id: BytesN<32>) -> Result<Request, Error> {
        requests::get_request(&e, &request_id)
    }

    pub fn get_request_count(e: Env) -> u64 {
        requests::get_request_count(&e)
    }

    pub fn get_request_state(e: Env, request_id: BytesN<32>) -> Result<RequestState, Error> {
        requests::request_state(&e, &request_id)
    }

    // ---------------------------------------------------------------------
    // Proofs
    // ---------------------------------------------------------------------

    /// Check a proof against an encoded data spec. Returns the proven result
    /// on success and `(false, "")` on any failure.
    pub fn verify(e: Env, proof: Bytes, data_spec: Bytes) -> (bool, String) {
        proof::verify(&e, &proof, &data_spec)
    }

    pub fn encode_data_spec(e: Env, spec: DataSpec) -> Bytes {
        proof::encode_data_spec(&e, &spec)
    }

    pub fn proof_header(e: Env, spec: DataSpec) -> BytesN<96> {
        proof::proof_header(&e, &spec)
    }

    /// Digest a verifier has to sign for `spec`.
    pub fn proof_signing_digest(e: Env, spec: DataSpec) -> BytesN<32> {
        let header = proof::proof_header(&e, &spec);
        proof::signing_digest(&e, &header).to_bytes()
    }

    /// Encoded data spec an attestation on this request must be proven against.
    pub fn attestation_data_spec(
        e: Env,
        request_id: BytesN<32>,
        outcome: bool,
        timestamp: u64,
    ) -> Result<Bytes, Error> {
        let request = requests::get_request(&e, &request_id)?;
        let spec = attestation_ledger::data_spec_for(&e, &request, outcome, timestamp);
        Ok(proof::encode_data_spec(&e, &spec))
    }

    // ---------------------------------------------------------------------
    // Attestations and quorum
    // ---------------------------------------------------------------------

    /// Submit an operator attestation. The proof must verify against the
    /// request's data spec for `outcome` and `timestamp`.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_attestation(
        e: Env,
        operator: Address,
        request_id: BytesN<32>,
        outcome: bool,
        attestation_cid: String,
        signature: Bytes,
        proof: Bytes,
        timestamp: u64,
    ) -> Result<(), Error> {
        attestation_ledger::submit_attestation(
            &e,
            &operator,
            &request_id,
            outcome,
            attestation_cid,
            signature,
            proof,
            timestamp,
        )
    }

    pub fn get_attestations(e: Env, request_id: BytesN<32>) -> Result<Vec<Attestation>, Error> {
        requests::get_request(&e, &request_id)?;
        Ok(attestation_ledger::get_attestations(&e, &request_id))
    }

    pub fn get_attestation(
        e: Env,
        request_id: BytesN<32>,
        operator: Address,
    ) -> Result<Attestation, Error> {
        requests::get_request(&e, &request_id)?;
        attestation_ledger::get_attestation(&e, &request_id, &operator).ok_or(Error::NotFound)
    }

    pub fn has_attested(
        e: Env,
        request_id: BytesN<32>,
        operator: Address,
    ) -> Result<bool, Error> {
        requests::get_request(&e, &request_id)?;
        Ok(attestation_ledger::has_attested(&e, &request_id, &operator))
    }

    /// Live quorum status, computed from current total weight and threshold.
    pub fn get_quorum_status(e: Env, request_id: BytesN<32>) -> Result<QuorumStatus, Error> {
        requests::get_request(&e, &request_id)?;
        Ok(quorum::current_status(&e, &request_id))
    }

    // ---------------------------------------------------------------------
    // Finalization
    // ---------------------------------------------------------------------

    /// Finalize a request once `outcome` holds the required weight.
    pub fn finalize_resolution(
        e: Env,
        operator: Address,
        request_id: BytesN<32>,
        outcome: bool,
        aggregate_signature: Bytes,
    ) -> Result<Fulfillment, Error> {
        finalization::finalize_resolution(&e, &operator, &request_id, outcome, aggregate_signature)
    }

    pub fn get_fulfillment(e: Env, request_id: BytesN<32>) -> Result<Fulfillment, Error> {
        finalization::get_fulfillment(&e, &request_id)
    }
}







#[cfg(test)]
mod test_events;
