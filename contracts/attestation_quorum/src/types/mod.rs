//! Protocol data types for requests, attestations, quorum status and fulfillments.

pub mod attestation;
pub mod fulfillment;
pub mod request;

pub use attestation::{Attestation, DataSpec, MAX_RESULT_LEN, PROOF_HEADER_LEN, PROOF_LEN};
pub use fulfillment::Fulfillment;
pub use request::{OperatorInfo, QuorumStatus, Request, RequestState};
