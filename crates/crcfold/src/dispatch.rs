//! Backend selection and caching.
//!
//! Candidates are ordered best to worst; under `auto` the first hardware
//! candidate whose capability check succeeds wins. The software multiplier is
//! slower than the byte table, so with no hardware candidate `auto` runs the
//! table and `portable` is only reached by forcing it. Under `std` the choice
//! is made once and cached in a `OnceLock`; without it, detection is
//! compile-time only and costs nothing to repeat.

use crate::{
  clmul::{Clmul, Portable},
  config::{self, FoldForce},
  constants::FoldConstants,
  fold,
};

/// Signature of a block folding kernel.
pub type FoldFn = fn(&FoldConstants, u32, &[[u8; 16]]) -> u32;

/// What the orchestration layer runs for aligned bulk data.
#[derive(Clone, Copy, Debug)]
pub enum Kernel {
  /// Byte table only.
  Table,
  /// Fold with the given kernel.
  Fold(FoldFn),
}

/// A kernel with a capability check.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
  /// Human-readable name for diagnostics (e.g., "x86_64/pclmul").
  pub name: &'static str,
  /// Which force mode selects this candidate explicitly.
  pub force: FoldForce,
  /// Returns true if the CPU can run `func`.
  pub available: fn() -> bool,
  pub func: FoldFn,
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected {
  pub name: &'static str,
  pub kernel: Kernel,
}

impl Selected {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, kernel: Kernel) -> Self {
    Self { name, kernel }
  }
}

fn portable_kernel(k: &FoldConstants, crc: u32, chunks: &[[u8; 16]]) -> u32 {
  fold::fold_block(Portable, k, crc, chunks)
}

const PORTABLE: Candidate =
  Candidate { name: Portable::NAME, force: FoldForce::Portable, available: || true, func: portable_kernel };

const TABLE: Selected = Selected::new("table", Kernel::Table);

/// All candidates for this target, best first. The last is always portable.
#[must_use]
pub fn candidates() -> &'static [Candidate] {
  #[cfg(target_arch = "x86_64")]
  {
    use crate::clmul::x86_64::{self, Pclmul};
    const LIST: &[Candidate] = &[
      Candidate {
        name: Pclmul::NAME,
        force: FoldForce::Pclmul,
        available: || Pclmul::detect().is_some(),
        func: x86_64::fold_block,
      },
      PORTABLE,
    ];
    LIST
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::clmul::aarch64::{self, Pmull};
    const LIST: &[Candidate] = &[
      Candidate {
        name: Pmull::NAME,
        force: FoldForce::Pmull,
        available: || Pmull::detect().is_some(),
        func: aarch64::fold_block,
      },
      PORTABLE,
    ];
    LIST
  }

  #[cfg(target_arch = "powerpc64")]
  {
    use crate::clmul::powerpc64::{self, Vpmsum};
    const LIST: &[Candidate] = &[
      Candidate {
        name: Vpmsum::NAME,
        force: FoldForce::Vpmsum,
        available: || Vpmsum::detect().is_some(),
        func: powerpc64::fold_block,
      },
      PORTABLE,
    ];
    LIST
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64")))]
  {
    const LIST: &[Candidate] = &[PORTABLE];
    LIST
  }
}

/// Select a kernel for `force`.
///
/// `force` is expected to be clamped already; a hardware mode that is not in
/// the candidate list falls through to auto selection.
#[must_use]
pub fn select_for(force: FoldForce) -> Selected {
  if force == FoldForce::Table {
    return TABLE;
  }

  let list = candidates();
  if force != FoldForce::Auto
    && let Some(c) = list.iter().find(|c| c.force == force && (c.available)())
  {
    return Selected::new(c.name, Kernel::Fold(c.func));
  }

  list
    .iter()
    .find(|c| c.force != FoldForce::Portable && (c.available)())
    .map_or(TABLE, |c| Selected::new(c.name, Kernel::Fold(c.func)))
}

fn select() -> Selected {
  let cfg = config::get();
  let selected = select_for(cfg.effective_force);
  log::debug!(
    "crcfold backend: {} (requested={}, effective={})",
    selected.name,
    cfg.requested_force.as_str(),
    cfg.effective_force.as_str()
  );
  selected
}

/// The process-wide kernel.
#[must_use]
pub fn selected() -> Selected {
  #[cfg(feature = "std")]
  {
    use std::sync::OnceLock;
    static SELECTED: OnceLock<Selected> = OnceLock::new();
    *SELECTED.get_or_init(select)
  }

  #[cfg(not(feature = "std"))]
  {
    select()
  }
}

/// Name of the process-wide kernel.
#[must_use]
pub fn selected_backend() -> &'static str {
  selected().name
}
