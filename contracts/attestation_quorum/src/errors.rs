use soroban_sdk::contracterror;

/// Contract error codes. Codes are part of the public interface and must not
/// be renumbered.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Operand is the zero account/contract address or an all-zero signer key.
    ZeroAddress = 1,
    /// Caller is not the contract admin.
    OnlyAdmin = 2,
    /// Operator is not an enabled node with positive weight, or the proof
    /// signer is not an authorized verifier.
    Unauthorized = 3,
    /// Unknown request id.
    NotFound = 4,
    /// Duplicate attestation, or the request is already finalized.
    AlreadyFulfilled = 5,
    /// Malformed input, non-qualifying finalization or threshold above 100.
    InvalidParameter = 6,
    NotInitialized = 7,
    AlreadyInitialized = 8,
}
