//! PCLMULQDQ multiplier.

// SIMD intrinsics require unsafe; safety is documented per-block.
#![allow(unsafe_code)]

use core::arch::x86_64::{__m128i, _mm_clmulepi64_si128, _mm_cvtsi64_si128, _mm_set_epi64x, _mm_xor_si128};

use super::Clmul;
use crate::{constants::FoldConstants, fold};

/// Proof that the CPU executes `pclmulqdq`.
#[derive(Clone, Copy, Debug)]
pub struct Pclmul(());

impl Pclmul {
  /// Returns the token if PCLMULQDQ and SSE2 are available.
  #[inline]
  #[must_use]
  pub fn detect() -> Option<Self> {
    #[cfg(feature = "std")]
    {
      if std::arch::is_x86_feature_detected!("pclmulqdq") && std::arch::is_x86_feature_detected!("sse2") {
        return Some(Self(()));
      }
      None
    }

    #[cfg(not(feature = "std"))]
    {
      if cfg!(all(target_feature = "pclmulqdq", target_feature = "sse2")) { Some(Self(())) } else { None }
    }
  }
}

impl Clmul for Pclmul {
  const NAME: &'static str = "x86_64/pclmul";

  #[inline(always)]
  fn clmul(self, a: u64, b: u64) -> u128 {
    // SAFETY: a `Pclmul` token only exists after detection succeeded.
    unsafe {
      let r = _mm_clmulepi64_si128::<0x00>(_mm_cvtsi64_si128(a as i64), _mm_cvtsi64_si128(b as i64));
      core::mem::transmute::<__m128i, u128>(r)
    }
  }

  #[inline(always)]
  fn clmul_pair(self, v: u128, lo: u64, hi: u64) -> u128 {
    // SAFETY: a `Pclmul` token only exists after detection succeeded.
    unsafe {
      let x = core::mem::transmute::<u128, __m128i>(v);
      let k = _mm_set_epi64x(hi as i64, lo as i64);
      let r = _mm_xor_si128(_mm_clmulepi64_si128::<0x00>(x, k), _mm_clmulepi64_si128::<0x11>(x, k));
      core::mem::transmute::<__m128i, u128>(r)
    }
  }
}

#[target_feature(enable = "pclmulqdq,sse2")]
unsafe fn fold_block_pclmul(token: Pclmul, k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  fold::fold_block(token, k, crc, chunks)
}

/// Fold one block with PCLMULQDQ, or the portable multiplier if the CPU
/// lacks it.
pub fn fold_block(k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  match Pclmul::detect() {
    // SAFETY: detection succeeded, so the enabled features are present.
    Some(token) => unsafe { fold_block_pclmul(token, k, crc, chunks) },
    None => fold::fold_block(super::Portable, k, crc, chunks),
  }
}
