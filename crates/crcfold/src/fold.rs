//! Block folding and Barrett reduction.
//!
//! Reduces up to [`BLOCK_SIZE`] bytes of 16-byte chunks to a 32-bit CRC
//! register using only carry-less multiplies and the constants of one
//! [`FoldConstants`] set.
//!
//! # Algorithm
//!
//! Treat the block as `M = Σ chunk_c·x^(128·(n-1-c))`. The register after the
//! block is `(M + seed·x^(8L-32))·x^32 mod p`, where the seed is the incoming
//! CRC XORed into the polynomially-highest 32 bits of the first chunk.
//!
//! 1. **Bulk fold**: a 16-lane window where lane `j` carries weight
//!    `x^(128j)`. The last 16 chunks land in their lane directly. Every earlier
//!    chunk `j` is multiplied by `x^k`, `k = 1024·(j/8 - 1)`, and XORed into
//!    lane `8 + j%8`, so `128·lane + k = 128·j`.
//! 2. **Short fold**: lanes 15..1 are split into 32-bit words, each word
//!    multiplied by `x^(128j + 32t + 32)` and summed into 64 bits.
//! 3. **Final fold**: lane 0 plus its 32 implicit zero bits (192 bits) is
//!    reduced to 64 bits in two dependent steps with `x^96` and `x^64`.
//! 4. **Barrett**: the 64-bit sum is reduced to 32 bits.
//!
//! Multiplier products never exceed 96 bits, so every partial result fits in a
//! `u128` without reduction until step 4.

// Lane indices are `< LANES`, long indices are in `1..LONG_PAIRS` and short
// indices are `< SHORT_QUADS` by construction of the block walk.
#![allow(clippy::indexing_slicing)]

use crate::{
  clmul::Clmul,
  constants::{BLOCK_SIZE, FoldConstants, LANES, SHORT_QUADS, VECTOR_WIDTH},
  params::Convention,
};

/// Maximum chunks per call.
pub const MAX_CHUNKS: usize = BLOCK_SIZE / VECTOR_WIDTH;

// ─────────────────────────────────────────────────────────────────────────────
// Register Frames
// ─────────────────────────────────────────────────────────────────────────────

/// How a convention lays polynomials out in registers.
///
/// Normal: bit `b` of a register is the coefficient of `x^b`. Reflected: bit
/// `b` of a `w`-bit register is the coefficient of `x^(w-1-b)`.
trait Frame {
  /// Load a chunk so its first byte holds the highest-degree coefficients.
  fn load(chunk: &[u8; 16]) -> u128;

  /// Place a CRC register over the highest-degree 32 bits of a chunk.
  fn seed(crc: u32) -> u128;

  /// Split into (high-degree, low-degree) 64-bit halves.
  fn halves(v: u128) -> (u64, u64);

  /// Reorder a `[high half, low half]` long pair to `(low lane, high lane)`
  /// multipliers for [`Clmul::clmul_pair`].
  fn lane_pair(pair: [u64; 2]) -> (u64, u64);

  /// Left shift applied to the summed short-fold products.
  const SHORT_SHIFT: u32;

  fn final_fold<C: Clmul>(mul: C, v: u128, k: [u64; 2]) -> u64;

  fn barrett<C: Clmul>(mul: C, a: u64, k: [u64; 2]) -> u32;
}

struct Msb;
struct Lsb;

impl Frame for Msb {
  #[inline(always)]
  fn load(chunk: &[u8; 16]) -> u128 {
    u128::from_be_bytes(*chunk)
  }

  #[inline(always)]
  fn seed(crc: u32) -> u128 {
    u128::from(crc) << 96
  }

  #[inline(always)]
  fn halves(v: u128) -> (u64, u64) {
    ((v >> 64) as u64, v as u64)
  }

  #[inline(always)]
  fn lane_pair(pair: [u64; 2]) -> (u64, u64) {
    (pair[1], pair[0])
  }

  const SHORT_SHIFT: u32 = 0;

  #[inline(always)]
  fn final_fold<C: Clmul>(mul: C, v: u128, k: [u64; 2]) -> u64 {
    let (hi, lo) = Self::halves(v);
    // 192 → 96 bits.
    let u = mul.clmul(hi, k[0]) ^ (u128::from(lo) << 32);
    // 96 → 64 bits.
    (u as u64) ^ (mul.clmul((u >> 64) as u64, k[1]) as u64)
  }

  #[inline(always)]
  fn barrett<C: Clmul>(mul: C, a: u64, k: [u64; 2]) -> u32 {
    let q = (mul.clmul(a, k[0]) >> 64) as u64;
    (a ^ mul.clmul(q, k[1]) as u64) as u32
  }
}

impl Frame for Lsb {
  #[inline(always)]
  fn load(chunk: &[u8; 16]) -> u128 {
    u128::from_le_bytes(*chunk)
  }

  #[inline(always)]
  fn seed(crc: u32) -> u128 {
    u128::from(crc)
  }

  #[inline(always)]
  fn halves(v: u128) -> (u64, u64) {
    (v as u64, (v >> 64) as u64)
  }

  #[inline(always)]
  fn lane_pair(pair: [u64; 2]) -> (u64, u64) {
    (pair[0], pair[1])
  }

  const SHORT_SHIFT: u32 = 1;

  #[inline(always)]
  fn final_fold<C: Clmul>(mul: C, v: u128, k: [u64; 2]) -> u64 {
    let (hi, lo) = Self::halves(v);
    // 192 → 96 bits, read in a 96-bit frame.
    let r = mul.clmul(hi, k[0]) ^ u128::from(lo);
    let top = (r as u64) & 0xFFFF_FFFF;
    let rest = (r >> 32) as u64;
    // 96 → 64 bits.
    rest ^ (mul.clmul(top, k[1]) as u64)
  }

  #[inline(always)]
  fn barrett<C: Clmul>(mul: C, a: u64, k: [u64; 2]) -> u32 {
    let q = (mul.clmul(a & 0xFFFF_FFFF, k[0]) as u64) & 0xFFFF_FFFF;
    ((a ^ mul.clmul(q, k[1]) as u64) >> 32) as u32
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stages
// ─────────────────────────────────────────────────────────────────────────────

/// Long pair for chunk position `j >= LANES`: stride `1024·(j/8 - 1)`.
///
/// Always in `1..LONG_PAIRS`; `long[0]` is never used.
#[inline(always)]
const fn long_index(j: usize) -> usize {
  MAX_CHUNKS / 8 - j / 8
}

/// Multiply a chunk by a long-stride pair.
#[inline(always)]
fn fold_long<F: Frame, C: Clmul>(mul: C, v: u128, pair: [u64; 2]) -> u128 {
  let (lo, hi) = F::lane_pair(pair);
  mul.clmul_pair(v, lo, hi)
}

/// Multiply the four 32-bit words of a lane by a quad and sum.
///
/// Word `t` (bits `32t..32t+32` of the register) pairs with `quad[3 - t]` in
/// both conventions. The convention's shift is not applied here.
#[inline(always)]
fn fold_words<C: Clmul>(mul: C, v: u128, quad: &[u64; 4]) -> u64 {
  let mut acc = 0u64;
  for t in 0..4 {
    let word = u64::from((v >> (32 * t)) as u32);
    // 32×32 products fit in 63 bits.
    acc ^= mul.clmul(word, quad[3 - t]) as u64;
  }
  acc
}

#[inline(always)]
fn fold_in<F: Frame, C: Clmul>(mul: C, k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  let Some((first, rest)) = chunks.split_first() else {
    return crc;
  };
  debug_assert!(chunks.len() <= MAX_CHUNKS);

  let n = chunks.len();
  let mut lanes = [0u128; LANES];
  let mut absorb = |j: usize, v: u128| {
    if j < LANES {
      lanes[j] ^= v;
    } else {
      lanes[8 + (j & 7)] ^= fold_long::<F, C>(mul, v, k.long[long_index(j)]);
    }
  };

  absorb(n - 1, F::load(first) ^ F::seed(crc));
  for (c, chunk) in rest.iter().enumerate() {
    absorb(n - 2 - c, F::load(chunk));
  }

  let mut acc = 0u64;
  for (j, lane) in lanes.iter().enumerate().skip(1) {
    acc ^= fold_words(mul, *lane, &k.short[SHORT_QUADS - 1 - j]);
  }
  acc <<= F::SHORT_SHIFT;
  acc ^= F::final_fold(mul, lanes[0], k.final_fold);

  F::barrett(mul, acc, k.barrett)
}

// ─────────────────────────────────────────────────────────────────────────────
// Public Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Fold `chunks` (at most [`MAX_CHUNKS`]) into `crc` and reduce to 32 bits.
///
/// `crc` is the raw register, without any inversion. An empty slice returns
/// it unchanged.
#[inline(always)]
pub fn fold_block<C: Clmul>(mul: C, k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  match k.convention {
    Convention::Normal => fold_in::<Msb, C>(mul, k, crc, chunks),
    Convention::Reflected => fold_in::<Lsb, C>(mul, k, crc, chunks),
  }
}

/// Reduce one 128-bit lane with 32 implicit zero bits to a 64-bit value
/// congruent to `lane·x^32`, using the `[x^96, x^64]` pair.
#[must_use]
pub fn final_fold<C: Clmul>(mul: C, k: &FoldConstants, lane: u128) -> u64 {
  match k.convention {
    Convention::Normal => Msb::final_fold(mul, lane, k.final_fold),
    Convention::Reflected => Lsb::final_fold(mul, lane, k.final_fold),
  }
}

/// Same reduction as [`final_fold`], done word by word with the
/// `x^128, x^96, x^64, x^32` quad instead of two dependent folds.
///
/// The two agree modulo `p`; after [`barrett`] they are identical.
#[must_use]
pub fn final_fold_words<C: Clmul>(mul: C, k: &FoldConstants, lane: u128) -> u64 {
  let quad = &k.short[SHORT_QUADS - 1];
  match k.convention {
    Convention::Normal => fold_words(mul, lane, quad) << Msb::SHORT_SHIFT,
    Convention::Reflected => fold_words(mul, lane, quad) << Lsb::SHORT_SHIFT,
  }
}

/// Barrett-reduce a 64-bit value to its 32-bit remainder mod `p`.
///
/// Normal: `a` is a degree-63 polynomial, bit `b` = `x^b`. Reflected: bit `b`
/// of `a` is `x^(63-b)` and the result is the reflected remainder.
#[must_use]
pub fn barrett<C: Clmul>(mul: C, k: &FoldConstants, a: u64) -> u32 {
  match k.convention {
    Convention::Normal => Msb::barrett(mul, a, k.barrett),
    Convention::Reflected => Lsb::barrett(mul, a, k.barrett),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{clmul::Portable, table::ByteTable};

  const IEEE: u32 = 0x04C1_1DB7;

  fn constants(conv: Convention) -> FoldConstants {
    FoldConstants::derive(IEEE, conv)
  }

  fn chunks(data: &[u8]) -> &[[u8; 16]] {
    let (chunks, rest) = data.as_chunks::<16>();
    assert!(rest.is_empty());
    chunks
  }

  fn pattern(len: usize) -> std::vec::Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 3)) as u8).collect()
  }

  #[test]
  fn barrett_scenario_normal() {
    // {9e d3 20 cc} followed by 32 zero bits.
    let k = constants(Convention::Normal);
    let a = u64::from_be_bytes([0x9E, 0xD3, 0x20, 0xCC, 0, 0, 0, 0]);
    let expected = ByteTable::new(IEEE, Convention::Normal).update(0, &[0x9E, 0xD3, 0x20, 0xCC]);
    assert_eq!(barrett(Portable, &k, a), expected);
  }

  #[test]
  fn barrett_scenario_reflected() {
    let k = constants(Convention::Reflected);
    let a = u64::from_le_bytes([0x9E, 0xD3, 0x20, 0xCC, 0, 0, 0, 0]);
    let expected = ByteTable::new(IEEE, Convention::Reflected).update(0, &[0x9E, 0xD3, 0x20, 0xCC]);
    assert_eq!(barrett(Portable, &k, a), expected);
  }

  #[test]
  fn barrett_scenario_inverted() {
    // Inverting the register first is the same as XORing the data's first
    // 32 bits with ones.
    let bytes = [0x9E ^ 0xFF, 0xD3 ^ 0xFF, 0x20 ^ 0xFF, 0xCC ^ 0xFF];
    for conv in [Convention::Normal, Convention::Reflected] {
      let k = constants(conv);
      let a = match conv {
        Convention::Normal => u64::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3], 0, 0, 0, 0]),
        Convention::Reflected => u64::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3], 0, 0, 0, 0]),
      };
      let expected = ByteTable::new(IEEE, conv).update(!0, &[0x9E, 0xD3, 0x20, 0xCC]);
      assert_eq!(barrett(Portable, &k, a), expected, "{conv:?}");
    }
  }

  #[test]
  fn final_fold_matches_table_for_one_lane() {
    for conv in [Convention::Normal, Convention::Reflected] {
      let k = constants(conv);
      let data = pattern(16);
      let lane = match conv {
        Convention::Normal => u128::from_be_bytes(chunks(&data)[0]),
        Convention::Reflected => u128::from_le_bytes(chunks(&data)[0]),
      };
      let expected = ByteTable::new(IEEE, conv).update(0, &data);
      assert_eq!(barrett(Portable, &k, final_fold(Portable, &k, lane)), expected, "{conv:?}");
    }
  }

  #[test]
  fn final_fold_variants_agree_after_barrett() {
    for conv in [Convention::Normal, Convention::Reflected] {
      let k = constants(conv);
      for seed in [0u128, 1, u128::MAX, 0x0123_4567_89AB_CDEF_FEDC_BA98_7654_3210, 1 << 127] {
        let a = barrett(Portable, &k, final_fold(Portable, &k, seed));
        let b = barrett(Portable, &k, final_fold_words(Portable, &k, seed));
        assert_eq!(a, b, "{conv:?} lane={seed:#x}");
      }
    }
  }

  #[test]
  fn fold_block_matches_table() {
    for conv in [Convention::Normal, Convention::Reflected] {
      let k = constants(conv);
      let table = ByteTable::new(IEEE, conv);
      for len in [16, 32, 48, 240, 256, 272, 1024, 2048, 4096, 16_384, BLOCK_SIZE] {
        let data = pattern(len);
        for crc in [0u32, !0, 0x1234_5678] {
          assert_eq!(
            fold_block(Portable, &k, crc, chunks(&data)),
            table.update(crc, &data),
            "{conv:?} len={len} crc={crc:#x}"
          );
        }
      }
    }
  }

  #[test]
  fn long_index_skips_the_full_block_stride() {
    use crate::constants::{LONG_PAIRS, long_stride};

    assert_eq!(long_index(LANES), LONG_PAIRS - 1);
    assert_eq!(long_index(MAX_CHUNKS - 1), 1);
    for j in LANES..MAX_CHUNKS {
      let idx = long_index(j);
      assert!((1..LONG_PAIRS).contains(&idx), "j={j}");
      // Lane weight plus stride lands the chunk at 128·j bits.
      assert_eq!(128 * (8 + (j & 7)) + long_stride(idx) as usize, 128 * j);
    }
  }

  #[test]
  fn empty_block_keeps_register() {
    let k = constants(Convention::Reflected);
    assert_eq!(fold_block(Portable, &k, 0xCAFE_F00D, &[]), 0xCAFE_F00D);
  }
}
