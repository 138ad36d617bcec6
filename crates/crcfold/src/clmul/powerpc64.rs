//! VPMSUMD multiplier (POWER8 and later).
//!
//! `vpmsumd` multiplies both doubleword lanes and XORs the two products, so a
//! single product is one lane against a zeroed lane, and a long-pair fold is
//! one instruction.
//!
//! # Safety
//!
//! Uses inline assembly. A [`Vpmsum`] token is only handed out after the CPU
//! reports the POWER8 vector crypto facility.

#![allow(unsafe_code)]

use core::{arch::asm, simd::i64x2};

use super::Clmul;
use crate::{constants::FoldConstants, fold};

/// Proof that the CPU executes `vpmsumd`.
#[derive(Clone, Copy, Debug)]
pub struct Vpmsum(());

impl Vpmsum {
  /// Returns the token if the POWER8 vector crypto facility is available.
  #[inline]
  #[must_use]
  pub fn detect() -> Option<Self> {
    if cfg!(all(target_feature = "vsx", target_feature = "power8-vector", target_feature = "power8-crypto")) {
      return Some(Self(()));
    }

    #[cfg(feature = "std")]
    {
      use std::sync::OnceLock;
      static DETECTED: OnceLock<bool> = OnceLock::new();
      if *DETECTED.get_or_init(runtime_vpmsum) {
        return Some(Self(()));
      }
    }

    None
  }
}

/// Runtime detection via `/proc/self/auxv`; `is_powerpc64_feature_detected!`
/// is not stable.
#[cfg(all(feature = "std", any(target_os = "linux", target_os = "android")))]
fn runtime_vpmsum() -> bool {
  use std::{fs::File, io::Read};

  // ELF auxiliary vector entry types
  const AT_HWCAP: u64 = 16;
  const AT_HWCAP2: u64 = 26;

  // linux/arch/powerpc/include/uapi/asm/cputable.h
  const PPC_FEATURE_HAS_ALTIVEC: u64 = 0x1000_0000;
  const PPC_FEATURE_HAS_VSX: u64 = 0x0000_0080;
  const PPC_FEATURE2_ARCH_2_07: u64 = 0x8000_0000;
  const PPC_FEATURE2_VEC_CRYPTO: u64 = 0x0200_0000;

  let read = || -> Option<(u64, u64)> {
    let mut file = File::open("/proc/self/auxv").ok()?;
    let mut buf = [0u8; 4096];
    let n = file.read(&mut buf).ok()?;

    let mut hwcap = 0u64;
    let mut hwcap2 = 0u64;
    for entry in buf.get(..n)?.chunks_exact(16) {
      let a_type = u64::from_ne_bytes(entry.get(0..8)?.try_into().ok()?);
      let a_val = u64::from_ne_bytes(entry.get(8..16)?.try_into().ok()?);
      match a_type {
        AT_HWCAP => hwcap = a_val,
        AT_HWCAP2 => hwcap2 = a_val,
        0 => break,
        _ => {}
      }
    }
    Some((hwcap, hwcap2))
  };

  let (hwcap, hwcap2) = read().unwrap_or((0, 0));
  let vector = PPC_FEATURE_HAS_ALTIVEC | PPC_FEATURE_HAS_VSX;
  let found = hwcap & vector == vector && hwcap2 & PPC_FEATURE2_ARCH_2_07 != 0 && hwcap2 & PPC_FEATURE2_VEC_CRYPTO != 0;
  log::debug!("powerpc64 auxv: hwcap={hwcap:#x} hwcap2={hwcap2:#x} vpmsumd={found}");
  found
}

/// No stable runtime detector elsewhere; rely on `-C target-feature`.
#[cfg(all(feature = "std", not(any(target_os = "linux", target_os = "android"))))]
fn runtime_vpmsum() -> bool {
  false
}

/// `lane0(a)·lane0(b) ⊕ lane1(a)·lane1(b)` as a 128-bit integer.
#[inline]
#[target_feature(enable = "altivec,vsx,power8-vector,power8-crypto")]
unsafe fn vpmsumd(a: i64x2, b: i64x2) -> u128 {
  let out: i64x2;
  // SAFETY: the caller guarantees the enabled features; the instruction only
  // touches the named registers.
  unsafe {
    asm!(
      "vpmsumd {out}, {a}, {b}",
      out = lateout(vreg) out,
      a = in(vreg) a,
      b = in(vreg) b,
      options(nomem, nostack, pure)
    );
  }
  // The quadword's in-memory image is a native-endian u128 on either byte
  // order, so the lane numbering of `out` does not matter here.
  // SAFETY: both types are 16 plain bytes.
  unsafe { core::mem::transmute::<i64x2, u128>(out) }
}

impl Clmul for Vpmsum {
  const NAME: &'static str = "powerpc64/vpmsum";

  #[inline(always)]
  fn clmul(self, a: u64, b: u64) -> u128 {
    // SAFETY: a `Vpmsum` token only exists after detection succeeded.
    unsafe { vpmsumd(i64x2::from_array([a as i64, 0]), i64x2::from_array([b as i64, 0])) }
  }

  #[inline(always)]
  fn clmul_pair(self, v: u128, lo: u64, hi: u64) -> u128 {
    // Halves pair up by value, so lane order only has to agree between the
    // two operands.
    let x = i64x2::from_array([v as i64, (v >> 64) as i64]);
    let k = i64x2::from_array([lo as i64, hi as i64]);
    // SAFETY: a `Vpmsum` token only exists after detection succeeded.
    unsafe { vpmsumd(x, k) }
  }
}

#[target_feature(enable = "altivec,vsx,power8-vector,power8-crypto")]
unsafe fn fold_block_vpmsum(token: Vpmsum, k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  fold::fold_block(token, k, crc, chunks)
}

/// Fold one block with VPMSUMD, or the portable multiplier if the CPU lacks
/// it.
pub fn fold_block(k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  match Vpmsum::detect() {
    // SAFETY: detection succeeded, so the enabled features are present.
    Some(token) => unsafe { fold_block_vpmsum(token, k, crc, chunks) },
    None => fold::fold_block(super::Portable, k, crc, chunks),
  }
}
