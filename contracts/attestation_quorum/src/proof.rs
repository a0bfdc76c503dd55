//! Proof verification.
//!
//! A proof is `dataSourceHash ∥ computationCodeHash ∥ outputResultHash ∥ sig`
//! where the three keccak256 hashes are recomputed from a [`DataSpec`] and
//! `sig` is a 65-byte recoverable secp256k1 signature (r ∥ s ∥ v) over the
//! Ethereum personal-message digest of `keccak256(header)`. The recovered
//! signer must be in the authorized verifier set.
//!
//! Data specs travel as a packed big-endian layout:
//! `u32 len ∥ data_source_id ∥ u64 timestamp ∥ u32 len ∥ query_logic ∥ u32 len ∥ expected_result`.

use soroban_sdk::crypto::Hash;
use soroban_sdk::{Bytes, BytesN, Env, String};

use crate::curve;
use crate::errors::Error;
use crate::operators;
use crate::types::{DataSpec, MAX_RESULT_LEN, PROOF_HEADER_LEN, PROOF_LEN};

const ETH_MESSAGE_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

/// Returns `(true, expected_result)` when `proof` matches `data_spec` and is
/// signed by an authorized verifier, `(false, "")` otherwise.
pub fn verify(e: &Env, proof: &Bytes, data_spec: &Bytes) -> (bool, String) {
    match decode_data_spec(data_spec).and_then(|spec| check(e, proof, &spec)) {
        Ok(result) => (true, bytes_to_string(e, &result)),
        Err(_) => (false, String::from_str(e, "")),
    }
}

/// Checks `proof` against an already decoded spec and returns the expected
/// result it commits to.
///
/// # Errors
/// * `InvalidParameter` - proof too short, header mismatch, bad recovery id or
///   a signature no key can be recovered from.
/// * `Unauthorized` - recovered signer is not an authorized verifier.
pub fn check(e: &Env, proof: &Bytes, spec: &DataSpec) -> Result<Bytes, Error> {
    if proof.len() < PROOF_LEN {
        return Err(Error::InvalidParameter);
    }
    let header = proof_header(e, spec);
    if proof.slice(0..PROOF_HEADER_LEN) != Bytes::from(header.clone()) {
        return Err(Error::InvalidParameter);
    }
    let digest = signing_digest(e, &header);
    let signer = recover_signer(e, &digest, &proof.slice(PROOF_HEADER_LEN..PROOF_LEN))?;
    if !operators::is_verifier(e, &signer) {
        return Err(Error::Unauthorized);
    }
    Ok(spec.expected_result.clone())
}

#[must_use]
pub fn proof_header(e: &Env, spec: &DataSpec) -> BytesN<96> {
    let mut source = spec.data_source_id.clone();
    source.extend_from_array(&spec.timestamp.to_be_bytes());

    let mut header = [0u8; 96];
    header[..32].copy_from_slice(&e.crypto().keccak256(&source).to_array());
    header[32..64].copy_from_slice(&e.crypto().keccak256(&spec.query_logic).to_array());
    header[64..].copy_from_slice(&e.crypto().keccak256(&spec.expected_result).to_array());
    BytesN::from_array(e, &header)
}

/// Digest the verifier signs: `keccak256(prefix ∥ keccak256(header))`.
#[must_use]
pub fn signing_digest(e: &Env, header: &BytesN<96>) -> Hash<32> {
    let inner = e.crypto().keccak256(&Bytes::from(header.clone()));
    let mut message = Bytes::from_array(e, ETH_MESSAGE_PREFIX);
    message.extend_from_array(&inner.to_array());
    e.crypto().keccak256(&message)
}

fn recover_signer(e: &Env, digest: &Hash<32>, sig: &Bytes) -> Result<BytesN<20>, Error> {
    let mut raw = [0u8; 65];
    sig.copy_into_slice(&mut raw);
    let recovery_id = match raw[64] {
        v @ 0..=1 => u32::from(v),
        v @ 27..=28 => u32::from(v - 27),
        _ => return Err(Error::InvalidParameter),
    };
    let mut rs = [0u8; 64];
    rs.copy_from_slice(&raw[..64]);
    let (rs, recovery_id) = curve::normalize_signature(&rs, recovery_id)?;
    let public_key = e
        .crypto()
        .secp256k1_recover(digest, &BytesN::from_array(e, &rs), recovery_id);
    Ok(eth_address(e, &public_key))
}

/// Last 20 bytes of `keccak256(x ∥ y)` for an uncompressed SEC-1 public key.
#[must_use]
pub fn eth_address(e: &Env, public_key: &BytesN<65>) -> BytesN<20> {
    let key = public_key.to_array();
    let hash = e.crypto().keccak256(&Bytes::from_slice(e, &key[1..])).to_array();
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    BytesN::from_array(e, &addr)
}

// ---------------------------------------------------------------------------
// Data spec codec
// ---------------------------------------------------------------------------

#[must_use]
pub fn encode_data_spec(e: &Env, spec: &DataSpec) -> Bytes {
    let mut out = Bytes::new(e);
    push_len_prefixed(&mut out, &spec.data_source_id);
    out.extend_from_array(&spec.timestamp.to_be_bytes());
    push_len_prefixed(&mut out, &spec.query_logic);
    push_len_prefixed(&mut out, &spec.expected_result);
    out
}

pub fn decode_data_spec(raw: &Bytes) -> Result<DataSpec, Error> {
    let mut reader = Reader { raw, pos: 0 };
    let data_source_id = reader.len_prefixed()?;
    let timestamp = reader.u64()?;
    let query_logic = reader.len_prefixed()?;
    let expected_result = reader.len_prefixed()?;
    reader.finish()?;
    if expected_result.len() > MAX_RESULT_LEN {
        return Err(Error::InvalidParameter);
    }
    Ok(DataSpec {
        data_source_id,
        query_logic,
        timestamp,
        expected_result,
    })
}

fn push_len_prefixed(out: &mut Bytes, field: &Bytes) {
    out.extend_from_array(&field.len().to_be_bytes());
    out.append(field);
}

struct Reader<'a> {
    raw: &'a Bytes,
    pos: u32,
}

impl Reader<'_> {
    fn take(&mut self, n: u32) -> Result<Bytes, Error> {
        let end = self.pos.checked_add(n).ok_or(Error::InvalidParameter)?;
        if end > self.raw.len() {
            return Err(Error::InvalidParameter);
        }
        let out = self.raw.slice(self.pos..end);
        self.pos = end;
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, Error> {
        let mut buf = [0u8; 4];
        self.take(4)?.copy_into_slice(&mut buf);
        Ok(u32::from_be_bytes(buf))
    }

    fn u64(&mut self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        self.take(8)?.copy_into_slice(&mut buf);
        Ok(u64::from_be_bytes(buf))
    }

    fn len_prefixed(&mut self) -> Result<Bytes, Error> {
        let n = self.u32()?;
        self.take(n)
    }

    fn finish(self) -> Result<(), Error> {
        if self.pos != self.raw.len() {
            return Err(Error::InvalidParameter);
        }
        Ok(())
    }
}

fn bytes_to_string(e: &Env, b: &Bytes) -> String {
    let mut buf = [0u8; MAX_RESULT_LEN as usize];
    let len = b.len() as usize;
    b.copy_into_slice(&mut buf[..len]);
    String::from_bytes(e, &buf[..len])
}
