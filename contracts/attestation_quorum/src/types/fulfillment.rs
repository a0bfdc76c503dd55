use soroban_sdk::{contracttype, Bytes, Env, String};

/// Final, immutable outcome of a request.
///
/// Written once by finalization. Before that, reads return an empty record
/// with `exists == false`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fulfillment {
    pub exists: bool,
    pub attestation_cid: String,
    pub outcome: bool,
    /// Aggregate signature supplied by the finalizing operator.
    pub metadata: Bytes,
    pub winning_weight: u64,
    pub finalized_at: u64,
}

impl Fulfillment {
    #[must_use]
    pub fn empty(e: &Env) -> Self {
        Fulfillment {
            exists: false,
            attestation_cid: String::from_str(e, ""),
            outcome: false,
            metadata: Bytes::new(e),
            winning_weight: 0,
            finalized_at: 0,
        }
    }
}
