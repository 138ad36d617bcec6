//! PMULL multiplier.

// SIMD intrinsics require unsafe; safety is documented per-block.
#![allow(unsafe_code)]

use core::arch::aarch64::vmull_p64;

use super::Clmul;
use crate::{constants::FoldConstants, fold};

/// Proof that the CPU executes `pmull` (the AES extension).
#[derive(Clone, Copy, Debug)]
pub struct Pmull(());

impl Pmull {
  #[inline]
  #[must_use]
  pub fn detect() -> Option<Self> {
    #[cfg(feature = "std")]
    {
      if std::arch::is_aarch64_feature_detected!("aes") {
        return Some(Self(()));
      }
      None
    }

    #[cfg(not(feature = "std"))]
    {
      if cfg!(target_feature = "aes") { Some(Self(())) } else { None }
    }
  }
}

impl Clmul for Pmull {
  const NAME: &'static str = "aarch64/pmull";

  #[inline(always)]
  fn clmul(self, a: u64, b: u64) -> u128 {
    // SAFETY: a `Pmull` token only exists after detection succeeded.
    unsafe { vmull_p64(a, b) }
  }
}

#[target_feature(enable = "neon,aes")]
unsafe fn fold_block_pmull(token: Pmull, k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  fold::fold_block(token, k, crc, chunks)
}

/// Fold one block with PMULL, or the portable multiplier if the CPU lacks it.
pub fn fold_block(k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  match Pmull::detect() {
    // SAFETY: detection succeeded, so the enabled features are present.
    Some(token) => unsafe { fold_block_pmull(token, k, crc, chunks) },
    None => fold::fold_block(super::Portable, k, crc, chunks),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clmul::Portable;

  #[test]
  fn matches_portable() {
    let Some(hw) = Pmull::detect() else {
      return;
    };
    let samples = [0u64, 1, 0x1_DB71_0641, u64::MAX, 1 << 63, 0x0123_4567_89AB_CDEF];
    for &a in &samples {
      for &b in &samples {
        assert_eq!(hw.clmul(a, b), Portable.clmul(a, b), "a={a:#x} b={b:#x}");
      }
    }
  }
}
