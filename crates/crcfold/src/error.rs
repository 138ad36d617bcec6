//! Error types for the outer layers.
//!
//! The folding engine itself has no recoverable errors. These cover parsing a
//! variant description and reading the environment overrides.

use core::fmt;

/// A polynomial, preset name or output format could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParseParamsError {
  /// Input was empty or contained only a radix prefix.
  Empty,
  /// A character is not a digit in the input's radix.
  InvalidDigit,
  /// The value needs more than 33 bits (32 plus the implicit `x^32` term).
  TooWide,
  /// Not a known preset name.
  UnknownPreset,
  /// Not a known output format.
  UnknownFormat,
}

impl fmt::Display for ParseParamsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Empty => "empty polynomial",
      Self::InvalidDigit => "invalid digit in polynomial",
      Self::TooWide => "polynomial wider than 32 bits",
      Self::UnknownPreset => "unknown CRC-32 preset",
      Self::UnknownFormat => "unknown output format",
    })
  }
}

impl core::error::Error for ParseParamsError {}

/// An environment override held a value that is not recognised.
///
/// Never surfaced to callers of the checksum API: the override is ignored and
/// the error is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ConfigError {
  /// Name of the offending variable.
  pub var: &'static str,
}

impl ConfigError {
  #[inline]
  #[must_use]
  pub const fn new(var: &'static str) -> Self {
    Self { var }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unrecognised value for {}", self.var)
  }
}

impl core::error::Error for ConfigError {}
