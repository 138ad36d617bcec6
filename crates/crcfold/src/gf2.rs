//! GF(2) polynomial arithmetic used to derive folding constants.
//!
//! Polynomials are carried in unsigned integers, one coefficient per bit,
//! bit `i` holding the coefficient of `x^i`. A degree-32 generator is passed
//! without its implicit `x^32` term, so `0x04C1_1DB7` names
//! `x^32 + x^26 + ... + x + 1`.
//!
//! Everything here is `const` so tables can be built at compile time, but the
//! folding constants themselves are derived at run time (see
//! [`crate::constants`]) because the stride exponents go past 260 000 and the
//! bit-serial divider would blow the const-eval budget.

// ─────────────────────────────────────────────────────────────────────────────
// Bit Reflection
// ─────────────────────────────────────────────────────────────────────────────

/// Reverse the low `nr_bits` bits of `value`.
///
/// Bits above `nr_bits` are discarded, so `reflect(x, n)` always fits in `n`
/// bits. `nr_bits` must be at most 64; `reflect(x, 0)` is `0`.
///
/// ```
/// use crcfold::gf2::reflect;
///
/// assert_eq!(reflect(0b1010, 4), 0b0101);
/// assert_eq!(reflect(0x1_04C1_1DB7, 33), 0x1_DB71_0641);
/// ```
#[inline]
#[must_use]
pub const fn reflect(value: u64, nr_bits: u32) -> u64 {
  debug_assert!(nr_bits <= 64);
  if nr_bits == 0 {
    return 0;
  }
  value.reverse_bits() >> (64 - nr_bits)
}

/// Reverse all 32 bits of a 32-bit polynomial.
#[inline]
#[must_use]
pub const fn reflect32(value: u32) -> u32 {
  value.reverse_bits()
}

// ─────────────────────────────────────────────────────────────────────────────
// Division
// ─────────────────────────────────────────────────────────────────────────────

/// Divide `x^n` by `p(x) = x^deg + poly` with bit-serial long division.
///
/// Returns `(remainder, quotient)` such that `x^n = quotient·p(x) + remainder`
/// and `deg(remainder) < deg`. Only the low 64 quotient bits survive; higher
/// bits fall off the top, which is fine for every quotient the constant
/// tables need (the Barrett quotient `floor(x^64 / p)` is 33 bits).
///
/// When `n < deg`, `x^n` is already reduced: the remainder is `x^n` and the
/// quotient is zero.
///
/// `deg` must be in `1..=32` and `poly` must not have bits at or above `deg`.
#[must_use]
pub const fn xnmodp(n: u32, poly: u64, deg: u32) -> (u64, u64) {
  debug_assert!(matches!(deg, 1..=32));
  let mask = (1u64 << deg) - 1;
  let poly = poly & mask;

  if n < deg {
    return (1u64 << n, 0);
  }

  // x^deg ≡ poly, quotient 1.
  let mut rem = poly;
  let mut quot = 1u64;
  let mut i = deg;
  while i < n {
    let carry = (rem >> (deg - 1)) & 1;
    quot = (quot << 1) | carry;
    rem = (rem << 1) & mask;
    if carry != 0 {
      rem ^= poly;
    }
    i += 1;
  }

  (rem, quot)
}

/// `floor(x^64 / p(x))` for a degree-32 generator: the Barrett quotient.
///
/// Always 33 bits wide (bit 32 set).
#[inline]
#[must_use]
pub const fn barrett_quotient(poly: u32) -> u64 {
  xnmodp(64, poly as u64, 32).1
}

// ─────────────────────────────────────────────────────────────────────────────
// Multiplication
// ─────────────────────────────────────────────────────────────────────────────

/// Carry-less product of two 64-bit polynomials.
///
/// This is the software model of PCLMULQDQ/PMULL and the portable backend's
/// multiplier.
#[inline]
#[must_use]
pub const fn clmul(a: u64, b: u64) -> u128 {
  let a = a as u128;
  let mut acc = 0u128;
  let mut b = b;
  let mut i = 0u32;
  while b != 0 {
    if b & 1 != 0 {
      acc ^= a << i;
    }
    b >>= 1;
    i += 1;
  }
  acc
}

/// Multiply two remainders and reduce mod `x^32 + poly`.
#[must_use]
pub const fn mul_mod(a: u32, b: u32, poly: u32) -> u32 {
  let mut product = clmul(a as u64, b as u64) as u64;

  // product is at most 63 bits; clear bits 62..32 from the top.
  let full = (1u64 << 32) | poly as u64;
  let mut bit = 62u32;
  while bit >= 32 {
    if (product >> bit) & 1 != 0 {
      product ^= full << (bit - 32);
    }
    bit -= 1;
  }

  product as u32
}

/// `x^n mod (x^32 + poly)` by square-and-multiply.
///
/// Agrees with `xnmodp(n, poly, 32).0` for every `n` but costs `O(log n)`
/// multiplications instead of `n` shift steps.
#[must_use]
pub const fn xpow_mod(n: u32, poly: u32) -> u32 {
  if n < 32 {
    return 1u32 << n;
  }

  let mut result = 1u32;
  let mut base = 2u32; // x^1
  let mut exp = n;
  while exp > 0 {
    if exp & 1 != 0 {
      result = mul_mod(result, base, poly);
    }
    base = mul_mod(base, base, poly);
    exp >>= 1;
  }
  result
}

// ─────────────────────────────────────────────────────────────────────────────
// Byte Table
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of the byte-at-a-time lookup table.
///
/// Normal: `index·x^32 mod p`, shifted in MSB-first. Reflected: the same
/// value computed in the bit-reversed domain, so `table[i]` is what
/// `crc = table[(crc ^ b) & 0xff] ^ (crc >> 8)` expects.
#[must_use]
pub const fn byte_table_entry(poly: u32, reflected: bool, index: u8) -> u32 {
  let mut k = 0;
  if reflected {
    let rpoly = reflect32(poly);
    let mut crc = index as u32;
    while k < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ rpoly } else { crc >> 1 };
      k += 1;
    }
    crc
  } else {
    let mut crc = (index as u32) << 24;
    while k < 8 {
      crc = if crc & 0x8000_0000 != 0 { (crc << 1) ^ poly } else { crc << 1 };
      k += 1;
    }
    crc
  }
}

/// Full 256-entry byte table for `poly`.
#[must_use]
#[allow(clippy::indexing_slicing)] // i < 256
pub const fn byte_table(poly: u32, reflected: bool) -> [u32; 256] {
  let mut table = [0u32; 256];
  let mut i = 0usize;
  while i < 256 {
    table[i] = byte_table_entry(poly, reflected, i as u8);
    i += 1;
  }
  table
}
