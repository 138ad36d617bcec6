//! CRC-32 variant description.
//!
//! A variant is the generator polynomial plus two switches: the bit order
//! (normal / MSB-first vs. reflected / LSB-first) and whether the register is
//! inverted on entry and exit. Names follow the
//! [CRC Catalogue](https://reveng.sourceforge.io/crc-catalogue/).

use core::{fmt, str::FromStr};

use crate::error::ParseParamsError;

/// Bit order of a CRC variant.
///
/// Resolved once per constant set; the folding engine never branches on it
/// per chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Convention {
  /// MSB-first. Chunks are loaded big-endian.
  Normal,
  /// LSB-first. Chunks are loaded little-endian and every constant is
  /// bit-reversed.
  Reflected,
}

impl Convention {
  #[inline]
  #[must_use]
  pub const fn from_reflected(reflected: bool) -> Self {
    if reflected { Self::Reflected } else { Self::Normal }
  }

  #[inline]
  #[must_use]
  pub const fn is_reflected(self) -> bool {
    matches!(self, Self::Reflected)
  }

  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Normal => "normal",
      Self::Reflected => "reflected",
    }
  }
}

/// Parameters of a 32-bit CRC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Crc32Params {
  /// Catalogue name, or `"custom"`.
  pub name: &'static str,
  /// Generator polynomial without the implicit `x^32` term.
  pub poly: u32,
  /// Bit order.
  pub convention: Convention,
  /// Invert the register on entry and exit (`init = xorout = 0xFFFFFFFF`).
  pub invert: bool,
}

impl Crc32Params {
  /// CRC-32/ISO-HDLC: Ethernet, gzip, zip, PNG.
  pub const ISO_HDLC: Self = Self::named("CRC-32/ISO-HDLC", 0x04C1_1DB7, Convention::Reflected, true);

  /// CRC-32/BZIP2: the same polynomial processed MSB-first.
  pub const BZIP2: Self = Self::named("CRC-32/BZIP2", 0x04C1_1DB7, Convention::Normal, true);

  /// CRC-32/ISCSI (Castagnoli): iSCSI, SCTP, ext4, Btrfs.
  pub const ISCSI: Self = Self::named("CRC-32/ISCSI", 0x1EDC_6F41, Convention::Reflected, true);

  /// Presets in lookup order.
  pub const PRESETS: [Self; 3] = [Self::ISO_HDLC, Self::BZIP2, Self::ISCSI];

  const fn named(name: &'static str, poly: u32, convention: Convention, invert: bool) -> Self {
    Self { name, poly, convention, invert }
  }

  /// A variant outside the catalogue presets.
  #[inline]
  #[must_use]
  pub const fn custom(poly: u32, reflected: bool, invert: bool) -> Self {
    Self::named("custom", poly, Convention::from_reflected(reflected), invert)
  }

  #[inline]
  #[must_use]
  pub const fn is_reflected(&self) -> bool {
    self.convention.is_reflected()
  }

  /// Check value: the CRC of the ASCII bytes `"123456789"`.
  ///
  /// `None` for custom variants.
  #[must_use]
  pub const fn check(&self) -> Option<u32> {
    match (self.poly, self.convention, self.invert) {
      (0x04C1_1DB7, Convention::Reflected, true) => Some(0xCBF4_3926),
      (0x04C1_1DB7, Convention::Normal, true) => Some(0xFC89_1918),
      (0x1EDC_6F41, Convention::Reflected, true) => Some(0xE306_9283),
      _ => None,
    }
  }

  /// Look up a preset by catalogue name or common alias, ignoring case.
  #[must_use]
  pub fn preset(name: &str) -> Option<Self> {
    let name = name.trim();
    let eq = |s: &str| name.eq_ignore_ascii_case(s);
    if eq("CRC-32/ISO-HDLC") || eq("iso-hdlc") || eq("crc32") || eq("ieee") {
      return Some(Self::ISO_HDLC);
    }
    if eq("CRC-32/BZIP2") || eq("bzip2") {
      return Some(Self::BZIP2);
    }
    if eq("CRC-32/ISCSI") || eq("iscsi") || eq("crc32c") || eq("castagnoli") {
      return Some(Self::ISCSI);
    }
    None
  }
}

impl fmt::Display for Crc32Params {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} (poly={:#010x}, {}, invert={})",
      self.name,
      self.poly,
      self.convention.as_str(),
      self.invert
    )
  }
}

/// Parse a generator polynomial: `0x`-prefixed hex or plain decimal.
///
/// Underscore separators are allowed. The value may not exceed 32 bits; a
/// 33-bit value with bit 32 set is accepted and the implicit term dropped, so
/// `0x104C11DB7` and `0x04C11DB7` name the same generator.
pub fn parse_poly(text: &str) -> Result<u32, ParseParamsError> {
  let text = text.trim();
  let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
    Some(hex) => parse_digits(hex, 16)?,
    None => parse_digits(text, 10)?,
  };

  match value >> 32 {
    0 | 1 => Ok(value as u32),
    _ => Err(ParseParamsError::TooWide),
  }
}

fn parse_digits(digits: &str, radix: u32) -> Result<u64, ParseParamsError> {
  let mut value = 0u64;
  let mut seen = false;
  for c in digits.chars().filter(|&c| c != '_') {
    let d = c.to_digit(radix).ok_or(ParseParamsError::InvalidDigit)?;
    value = value
      .checked_mul(u64::from(radix))
      .and_then(|v| v.checked_add(u64::from(d)))
      .ok_or(ParseParamsError::TooWide)?;
    seen = true;
  }
  if seen { Ok(value) } else { Err(ParseParamsError::Empty) }
}

impl FromStr for Crc32Params {
  type Err = ParseParamsError;

  /// Accepts a preset name (`"iso-hdlc"`, `"crc32c"`, ...). Custom
  /// polynomials go through [`parse_poly`] plus explicit switches.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.trim().is_empty() {
      return Err(ParseParamsError::Empty);
    }
    Self::preset(s).ok_or(ParseParamsError::UnknownPreset)
  }
}
