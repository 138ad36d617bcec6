//! Runtime configuration (backend overrides).
//!
//! The only knob is `CRCFOLD_FORCE`, read once per process:
//!
//! | Value | Effect |
//! |-------|--------|
//! | `auto` (default) | best detected hardware multiplier, else the byte table |
//! | `portable` | software carry-less multiply |
//! | `table` | no folding; byte table for every length |
//! | `pclmul` | x86_64 PCLMULQDQ |
//! | `pmull` | aarch64 PMULL |
//! | `vpmsum` | powerpc64 VPMSUMD (POWER8+) |
//!
//! Forced modes are always clamped to detected CPU capabilities; an
//! unsupported hardware request degrades to `auto`.

use core::str::FromStr;

use crate::error::ConfigError;

/// Environment variable holding the forced backend.
pub const FORCE_VAR: &str = "CRCFOLD_FORCE";

/// Forced backend selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FoldForce {
  /// Use the default auto selector.
  #[default]
  Auto,
  /// Skip folding entirely.
  Table,
  /// Fold with the software multiplier.
  Portable,
  /// Fold with PCLMULQDQ (x86_64).
  Pclmul,
  /// Fold with PMULL (aarch64).
  Pmull,
  /// Fold with VPMSUMD (powerpc64).
  Vpmsum,
}

impl FoldForce {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Table => "table",
      Self::Portable => "portable",
      Self::Pclmul => "pclmul",
      Self::Pmull => "pmull",
      Self::Vpmsum => "vpmsum",
    }
  }
}

impl FromStr for FoldForce {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let value = s.trim();
    let eq = |name: &str| value.eq_ignore_ascii_case(name);
    if value.is_empty() || eq("auto") {
      return Ok(Self::Auto);
    }
    if eq("table") || eq("bytewise") {
      return Ok(Self::Table);
    }
    if eq("portable") || eq("scalar") {
      return Ok(Self::Portable);
    }
    if eq("pclmul") || eq("pclmulqdq") {
      return Ok(Self::Pclmul);
    }
    if eq("pmull") {
      return Ok(Self::Pmull);
    }
    if eq("vpmsum") || eq("vpmsumd") {
      return Ok(Self::Vpmsum);
    }
    Err(ConfigError::new(FORCE_VAR))
  }
}

/// Effective configuration after applying overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoldConfig {
  /// Requested force mode (environment).
  pub requested_force: FoldForce,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: FoldForce,
}

#[cfg(feature = "std")]
fn read_env_force() -> FoldForce {
  let Ok(value) = std::env::var(FORCE_VAR) else {
    return FoldForce::Auto;
  };
  match value.parse() {
    Ok(force) => force,
    Err(err) => {
      log::warn!("{err}: {value:?}; falling back to auto");
      FoldForce::Auto
    }
  }
}

#[cfg(feature = "std")]
fn requested() -> FoldForce {
  use std::sync::OnceLock;
  static FORCE: OnceLock<FoldForce> = OnceLock::new();
  *FORCE.get_or_init(read_env_force)
}

#[cfg(not(feature = "std"))]
fn requested() -> FoldForce {
  FoldForce::Auto
}

/// Clamp a request to what the CPU can run.
#[must_use]
pub fn clamp_force(requested: FoldForce) -> FoldForce {
  match requested {
    FoldForce::Auto | FoldForce::Table | FoldForce::Portable => requested,
    FoldForce::Pclmul => {
      #[cfg(target_arch = "x86_64")]
      {
        if crate::clmul::x86_64::Pclmul::detect().is_some() {
          return FoldForce::Pclmul;
        }
      }
      log::warn!("{FORCE_VAR}=pclmul is not supported on this CPU; using auto");
      FoldForce::Auto
    }
    FoldForce::Pmull => {
      #[cfg(target_arch = "aarch64")]
      {
        if crate::clmul::aarch64::Pmull::detect().is_some() {
          return FoldForce::Pmull;
        }
      }
      log::warn!("{FORCE_VAR}=pmull is not supported on this CPU; using auto");
      FoldForce::Auto
    }
    FoldForce::Vpmsum => {
      #[cfg(target_arch = "powerpc64")]
      {
        if crate::clmul::powerpc64::Vpmsum::detect().is_some() {
          return FoldForce::Vpmsum;
        }
      }
      log::warn!("{FORCE_VAR}=vpmsum is not supported on this CPU; using auto");
      FoldForce::Auto
    }
  }
}

/// Get the effective configuration for this process.
#[must_use]
pub fn get() -> FoldConfig {
  let requested_force = requested();
  FoldConfig { requested_force, effective_force: clamp_force(requested_force) }
}
