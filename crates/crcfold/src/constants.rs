//! Folding and Barrett constants for a 32-bit generator.
//!
//! A [`FoldConstants`] set is a pure function of `(poly, convention)`. It holds
//! everything the folding engine multiplies by:
//!
//! | Field | Entries | Normal | Reflected |
//! |-------|---------|--------|-----------|
//! | `long` | 255 pairs | `x^(k+64)`, `x^k` | `rev(x^(k+32))<<1`, `rev(x^(k-32))<<1` |
//! | `short` | 16 quads | `x^(i+128)` .. `x^(i+32)` | `rev(x^(i+32))` .. `rev(x^(i+128))` |
//! | `final_fold` | 1 pair | `x^96`, `x^64` | `rev(x^96)<<1`, `rev(x^64)<<1` |
//! | `barrett` | 1 pair | `m`, `n` | `rev33(m)`, `rev33(n)` |
//!
//! where every `x^e` is `x^e mod p(x)`, `k` runs over the 1024-bit strides of a
//! [`BLOCK_SIZE`] block, `i` over the 128-bit lanes of the last 2048 bits,
//! `m = floor(x^64 / p)` and `n = x^32 + poly`.
//!
//! # Reflected bookkeeping
//!
//! In the reflected frame a 64-bit register `r` stands for the polynomial
//! `Σ r_b·x^(63-b)`, and the carry-less product of two such registers picks up
//! one extra factor of `x`. A 32-bit remainder stored as `rev32(K) << 1` reads
//! as `K·x^31`, so a 64×33 product carries `x^32` on top of the multiplier.
//! The long pairs subtract 32 from the exponent to cancel it; the short quads
//! are stored unshifted and the engine shifts their 64-bit sum left once
//! instead.

use crate::{
  gf2::{barrett_quotient, reflect, reflect32, xpow_mod},
  params::Convention,
};

/// Bytes folded per block before the running CRC is fully reduced.
pub const BLOCK_SIZE: usize = 32 * 1024;

/// Width of one folding lane in bytes.
pub const VECTOR_WIDTH: usize = 16;

/// Mask for the in-lane byte offset of an address.
pub const ALIGN_MASK: usize = VECTOR_WIDTH - 1;

/// Inputs shorter than this never reach the folding engine: after aligning
/// the start there would not be a full lane left.
pub const MIN_FOLD_LEN: usize = VECTOR_WIDTH + ALIGN_MASK;

/// Long-stride pairs: one per 1024-bit stride in a block, minus the last.
pub const LONG_PAIRS: usize = BLOCK_SIZE * 8 / 1024 - 1;

/// Short quads: one per 128-bit lane of the final 2048 bits.
pub const SHORT_QUADS: usize = 16;

/// Lanes in the folding window.
pub const LANES: usize = 16;

/// `vperm`/`pshufb` control that reverses the 16 bytes of a lane.
///
/// Needed by SIMD backends whose lane order disagrees with the convention.
pub const BYTE_REVERSE: u128 = 0x0F0E_0D0C_0B0A_0908_0706_0504_0302_0100;

/// Stride exponent of `long[idx]`: `BLOCK_SIZE·8 - 1024·(idx+1)`.
#[inline]
#[must_use]
pub const fn long_stride(idx: usize) -> u32 {
  (BLOCK_SIZE * 8 - 1024 * (idx + 1)) as u32
}

/// Lane exponent of `short[idx]`: `1920 - 128·idx`.
#[inline]
#[must_use]
pub const fn short_base(idx: usize) -> u32 {
  (128 * (SHORT_QUADS - 1 - idx)) as u32
}

/// Constant set for one `(poly, convention)`.
#[derive(Clone, PartialEq, Eq)]
pub struct FoldConstants {
  pub poly: u32,
  pub convention: Convention,
  /// `[high half, low half]` multipliers per stride, strides descending.
  ///
  /// `long[0]` (a full-block stride) is never read by the engine; it keeps
  /// the listing at one pair per 1024-bit stride.
  pub long: [[u64; 2]; LONG_PAIRS],
  /// Word multipliers per lane, lane exponents descending.
  pub short: [[u64; 4]; SHORT_QUADS],
  /// `[x^96, x^64]` in the convention's form.
  pub final_fold: [u64; 2],
  /// `[m, n]` in the convention's form.
  pub barrett: [u64; 2],
}

impl core::fmt::Debug for FoldConstants {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("FoldConstants")
      .field("poly", &format_args!("{:#010x}", self.poly))
      .field("convention", &self.convention)
      .field("final_fold", &format_args!("[{:#x}, {:#x}]", self.final_fold[0], self.final_fold[1]))
      .field("barrett", &format_args!("[{:#x}, {:#x}]", self.barrett[0], self.barrett[1]))
      .finish_non_exhaustive()
  }
}

impl FoldConstants {
  /// Derive the full set for `poly` in `convention`.
  ///
  /// Deterministic; about 300 square-and-multiply evaluations.
  #[must_use]
  pub fn derive(poly: u32, convention: Convention) -> Self {
    let rem = |e: u32| xpow_mod(e, poly);
    // rev32(K) << 1: a remainder placed as a 33-bit reflected multiplier.
    let rev_shifted = |e: u32| u64::from(reflect32(rem(e))) << 1;
    let rev = |e: u32| u64::from(reflect32(rem(e)));

    let mut long = [[0u64; 2]; LONG_PAIRS];
    for (idx, pair) in long.iter_mut().enumerate() {
      let k = long_stride(idx);
      *pair = match convention {
        Convention::Normal => [u64::from(rem(k + 64)), u64::from(rem(k))],
        Convention::Reflected => [rev_shifted(k + 32), rev_shifted(k - 32)],
      };
    }

    let mut short = [[0u64; 4]; SHORT_QUADS];
    for (idx, quad) in short.iter_mut().enumerate() {
      let i = short_base(idx);
      *quad = match convention {
        Convention::Normal => [rem(i + 128), rem(i + 96), rem(i + 64), rem(i + 32)].map(u64::from),
        Convention::Reflected => [rev(i + 32), rev(i + 64), rev(i + 96), rev(i + 128)],
      };
    }

    let m = barrett_quotient(poly);
    let n = (1u64 << 32) | u64::from(poly);
    let (final_fold, barrett) = match convention {
      Convention::Normal => ([u64::from(rem(96)), u64::from(rem(64))], [m, n]),
      Convention::Reflected => ([rev_shifted(96), rev_shifted(64)], [reflect(m, 33), reflect(n, 33)]),
    };

    log::trace!(
      "derived fold constants: poly={poly:#010x} convention={} barrett=[{:#x}, {:#x}]",
      convention.as_str(),
      barrett[0],
      barrett[1]
    );

    Self { poly, convention, long, short, final_fold, barrett }
  }

  /// Exponents behind `long[idx]`, in storage order.
  #[must_use]
  pub const fn long_exponents(&self, idx: usize) -> [u32; 2] {
    let k = long_stride(idx);
    match self.convention {
      Convention::Normal => [k + 64, k],
      Convention::Reflected => [k + 32, k - 32],
    }
  }

  /// `long[idx]` as the `.octa` listing lays it out: `[(exponent, value); 2]`.
  ///
  /// Normal pairs are listed as stored. Reflected listings pair
  /// `rev32(x^k)<<1` with `rev32(x^(k+64))<<1`, which is not the engine's
  /// frame, so both are recomputed from the polynomial.
  #[must_use]
  pub fn listing_long(&self, idx: usize) -> [(u32, u64); 2] {
    let k = long_stride(idx);
    let rem = |e: u32| xpow_mod(e, self.poly);
    match self.convention {
      Convention::Normal => [(k + 64, u64::from(rem(k + 64))), (k, u64::from(rem(k)))],
      Convention::Reflected => [
        (k, u64::from(reflect32(rem(k))) << 1),
        (k + 64, u64::from(reflect32(rem(k + 64))) << 1),
      ],
    }
  }

  /// Exponents behind `short[idx]`, in storage order.
  #[must_use]
  pub const fn short_exponents(&self, idx: usize) -> [u32; 4] {
    let i = short_base(idx);
    match self.convention {
      Convention::Normal => [i + 128, i + 96, i + 64, i + 32],
      Convention::Reflected => [i + 32, i + 64, i + 96, i + 128],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const IEEE: u32 = 0x04C1_1DB7;

  #[test]
  fn table_shapes() {
    assert_eq!(LONG_PAIRS, 255);
    assert_eq!(long_stride(0), 261_120);
    assert_eq!(long_stride(LONG_PAIRS - 1), 1024);
    assert_eq!(short_base(0), 1920);
    assert_eq!(short_base(SHORT_QUADS - 1), 0);
    assert_eq!(MIN_FOLD_LEN, 31);
  }

  #[test]
  fn normal_ieee_known_values() {
    let c = FoldConstants::derive(IEEE, Convention::Normal);
    assert_eq!(c.final_fold, [0xF200_AA66, 0x490D_678D]);
    assert_eq!(c.barrett, [0x1_04D1_01DF, 0x1_04C1_1DB7]);
    // i = 0: x^128, x^96, x^64, x^32
    assert_eq!(c.short[SHORT_QUADS - 1], [0xE8A4_5605, 0xF200_AA66, 0x490D_678D, 0x04C1_1DB7]);
  }

  #[test]
  fn reflected_ieee_known_values() {
    let c = FoldConstants::derive(IEEE, Convention::Reflected);
    assert_eq!(c.final_fold, [0xCCAA_009E, 0x1_63CD_6124]);
    assert_eq!(c.barrett, [0x1_F701_1641, 0x1_DB71_0641]);
    assert_eq!(c.short[SHORT_QUADS - 1], [0xEDB8_8320, 0xB1E6_B092, 0x6655_004F, 0xA06A_2517]);
  }

  #[test]
  fn derivation_is_deterministic() {
    for conv in [Convention::Normal, Convention::Reflected] {
      assert!(FoldConstants::derive(0x1EDC_6F41, conv) == FoldConstants::derive(0x1EDC_6F41, conv));
    }
  }

  #[test]
  fn reflected_long_pairs_are_shifted_reversals() {
    let normal = FoldConstants::derive(IEEE, Convention::Normal);
    let reflected = FoldConstants::derive(IEEE, Convention::Reflected);
    for idx in [0, 17, LONG_PAIRS - 1] {
      let [hi, lo] = reflected.long_exponents(idx);
      assert_eq!(reflected.long[idx][0], u64::from(reflect32(xpow_mod(hi, IEEE))) << 1);
      assert_eq!(reflected.long[idx][1], u64::from(reflect32(xpow_mod(lo, IEEE))) << 1);
      assert_eq!(normal.long_exponents(idx), [long_stride(idx) + 64, long_stride(idx)]);
      // Every multiplier stays within 33 bits.
      assert!(reflected.long[idx].iter().all(|&v| v >> 33 == 0));
    }
  }

  #[test]
  fn normal_listing_is_storage() {
    let c = FoldConstants::derive(IEEE, Convention::Normal);
    for idx in [0, 100, LONG_PAIRS - 1] {
      let [(e0, v0), (e1, v1)] = c.listing_long(idx);
      assert_eq!([e0, e1], c.long_exponents(idx));
      assert_eq!([v0, v1], c.long[idx]);
    }
  }

  #[test]
  fn reflected_listing_uses_stride_and_stride_plus_64() {
    let c = FoldConstants::derive(IEEE, Convention::Reflected);
    assert_eq!(c.listing_long(0), [(261_120, 0x1_6517_97D2), (261_184, 0x99EA_94A8)]);
    assert_eq!(c.listing_long(LONG_PAIRS - 1), [(1024, 0x1_AF77_FCD4), (1088, 0x7D65_7A10)]);
  }

  #[test]
  fn quad_exponents_follow_storage_order() {
    let c = FoldConstants::derive(IEEE, Convention::Normal);
    assert_eq!(c.short_exponents(0), [2048, 2016, 1984, 1952]);
    let r = FoldConstants::derive(IEEE, Convention::Reflected);
    assert_eq!(r.short_exponents(0), [1952, 1984, 2016, 2048]);
  }
}
