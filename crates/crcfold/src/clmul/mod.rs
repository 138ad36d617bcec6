//! Carry-less multiplication backends.
//!
//! The folding engine is written once against [`Clmul`] and monomorphized per
//! backend. Hardware backends are zero-sized tokens that can only be obtained
//! through capability detection, so holding one proves the instruction is
//! available and the safe [`Clmul::clmul`] call is sound.

mod portable;
#[cfg(target_arch = "x86_64")]
pub mod x86_64;
#[cfg(target_arch = "aarch64")]
pub mod aarch64;
#[cfg(target_arch = "powerpc64")]
pub mod powerpc64;

pub use portable::Portable;

/// A 64×64 → 128-bit carry-less multiplier.
pub trait Clmul: Copy {
  /// Diagnostic name, e.g. `"x86_64/pclmul"`.
  const NAME: &'static str;

  /// Carry-less product of `a` and `b`.
  fn clmul(self, a: u64, b: u64) -> u128;

  /// `lo64(v)·lo ⊕ hi64(v)·hi`: both halves of a lane against a constant pair.
  ///
  /// Backends with a two-lane multiplier override this to keep `v` in one
  /// vector register.
  #[inline(always)]
  fn clmul_pair(self, v: u128, lo: u64, hi: u64) -> u128 {
    self.clmul(v as u64, lo) ^ self.clmul((v >> 64) as u64, hi)
  }
}
