//! secp256k1 scalar and field checks applied to a signature before it is
//! handed to the host for key recovery.
//!
//! The host aborts the invocation on signatures it cannot recover from, so
//! everything it would reject is caught here first: zero or out-of-range
//! `r`/`s`, and an `r` that is not the x-coordinate of a curve point. High-S
//! signatures, which Ethereum's ecrecover accepts, are normalized to low-S.
//!
//! Numbers are four little-endian `u64` limbs.

use crate::errors::Error;

pub(crate) type Limbs = [u64; 4];

/// Group order `n`.
pub(crate) const N: Limbs = [
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// `n / 2`, the largest low-S value.
const HALF_N: Limbs = [
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
];

/// Field prime `p = 2^256 - 2^32 - 977`.
const P: Limbs = [
    0xFFFF_FFFE_FFFF_FC2F,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// `(p - 1) / 2`, the Euler criterion exponent.
const LEGENDRE_EXP: Limbs = [
    0xFFFF_FFFF_7FFF_FE17,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
];

/// `2^256 mod p`.
const FOLD: u64 = 0x1_0000_03D1;

const ONE: Limbs = [1, 0, 0, 0];

/// Validates `r ∥ s` and returns it in low-S form together with the matching
/// recovery id.
///
/// # Errors
/// * `InvalidParameter` - `r` or `s` is zero or not below `n`, or `r` is not
///   the x-coordinate of a point on the curve.
pub(crate) fn normalize_signature(
    rs: &[u8; 64],
    recovery_id: u32,
) -> Result<([u8; 64], u32), Error> {
    let r = from_be(&rs[..32]);
    let s = from_be(&rs[32..]);
    if is_zero(&r) || is_zero(&s) || !lt(&r, &N) || !lt(&s, &N) {
        return Err(Error::InvalidParameter);
    }
    if !is_x_coordinate(&r) {
        return Err(Error::InvalidParameter);
    }
    if !lt(&HALF_N, &s) {
        return Ok((*rs, recovery_id));
    }
    let (low_s, _) = sub(&N, &s);
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&rs[..32]);
    out[32..].copy_from_slice(&to_be(&low_s));
    Ok((out, recovery_id ^ 1))
}

/// Whether `x^3 + 7` is a square mod `p`. `x` must already be below `p`.
pub(crate) fn is_x_coordinate(x: &Limbs) -> bool {
    let cube = mul_mod_p(&mul_mod_p(x, x), x);
    let y2 = add_mod_p(&cube, 7);
    is_zero(&y2) || pow_mod_p(&y2, &LEGENDRE_EXP) == ONE
}

pub(crate) fn from_be(bytes: &[u8]) -> Limbs {
    let mut out = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        out[3 - i] = u64::from_be_bytes(word);
    }
    out
}

pub(crate) fn to_be(limbs: &Limbs) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, limb) in limbs.iter().rev().enumerate() {
        out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
    }
    out
}

fn is_zero(a: &Limbs) -> bool {
    a.iter().all(|l| *l == 0)
}

/// `a < b`
fn lt(a: &Limbs, b: &Limbs) -> bool {
    for i in (0..4).rev() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
    }
    false
}

/// `a - b` with the final borrow.
pub(crate) fn sub(a: &Limbs, b: &Limbs) -> (Limbs, bool) {
    let mut out = [0u64; 4];
    let mut borrow = false;
    for i in 0..4 {
        let (d, b1) = a[i].overflowing_sub(b[i]);
        let (d, b2) = d.overflowing_sub(u64::from(borrow));
        out[i] = d;
        borrow = b1 || b2;
    }
    (out, borrow)
}

/// `a + x` with the final carry.
fn add_small(a: &Limbs, x: u64) -> (Limbs, bool) {
    let mut out = *a;
    let mut carry = x;
    for limb in out.iter_mut() {
        let (s, c) = limb.overflowing_add(carry);
        *limb = s;
        carry = u64::from(c);
        if carry == 0 {
            break;
        }
    }
    (out, carry != 0)
}

fn reduce_once(mut a: Limbs) -> Limbs {
    while !lt(&a, &P) {
        a = sub(&a, &P).0;
    }
    a
}

fn add_mod_p(a: &Limbs, x: u64) -> Limbs {
    let (sum, carry) = add_small(a, x);
    if carry {
        // sum + 2^256 == sum + FOLD (mod p); sum is tiny after wrapping
        return reduce_once(add_small(&sum, FOLD).0);
    }
    reduce_once(sum)
}

pub(crate) fn mul_mod_p(a: &Limbs, b: &Limbs) -> Limbs {
    let mut wide = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0u128;
        for j in 0..4 {
            let t = u128::from(a[i]) * u128::from(b[j]) + u128::from(wide[i + j]) + carry;
            wide[i + j] = t as u64;
            carry = t >> 64;
        }
        wide[i + 4] = carry as u64;
    }

    // lo + hi * 2^256 == lo + hi * FOLD (mod p)
    let mut folded = [0u64; 5];
    let mut carry = 0u128;
    for i in 0..4 {
        let t = u128::from(wide[i]) + u128::from(wide[i + 4]) * u128::from(FOLD) + carry;
        folded[i] = t as u64;
        carry = t >> 64;
    }
    folded[4] = carry as u64;

    let mut out = [0u64; 4];
    let mut carry = u128::from(folded[4]) * u128::from(FOLD);
    for i in 0..4 {
        let t = u128::from(folded[i]) + carry;
        out[i] = t as u64;
        carry = t >> 64;
    }
    if carry != 0 {
        out = add_small(&out, FOLD).0;
    }
    reduce_once(out)
}

fn pow_mod_p(base: &Limbs, exp: &Limbs) -> Limbs {
    let mut acc = ONE;
    for limb in exp.iter().rev() {
        for bit in (0..64).rev() {
            acc = mul_mod_p(&acc, &acc);
            if (limb >> bit) & 1 == 1 {
                acc = mul_mod_p(&acc, base);
            }
        }
    }
    acc
}
