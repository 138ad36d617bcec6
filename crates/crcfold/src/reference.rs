//! Bitwise reference model.
//!
//! One register shift per input bit, no tables and no folding. This is the
//! oracle every optimized path is tested against; it follows the Rocksoft
//! model with `refin = refout` and `init = xorout ∈ {0, 0xFFFFFFFF}`.
//!
//! Intentionally slow (~8 operations per bit).

// SAFETY: All indexing uses bounded loop indices (0..data.len()).
#![allow(clippy::indexing_slicing)]

use crate::params::Crc32Params;

/// Bitwise CRC-32 register update.
///
/// Returns the raw register; the caller applies any inversion.
#[must_use]
pub const fn crc32_bitwise(poly: u32, reflected: bool, init: u32, data: &[u8]) -> u32 {
  let mut crc = init;
  let mut i = 0;
  if reflected {
    let rpoly = poly.reverse_bits();
    while i < data.len() {
      crc ^= data[i] as u32;
      let mut bit = 0;
      while bit < 8 {
        crc = if crc & 1 != 0 { (crc >> 1) ^ rpoly } else { crc >> 1 };
        bit += 1;
      }
      i += 1;
    }
  } else {
    while i < data.len() {
      crc ^= (data[i] as u32) << 24;
      let mut bit = 0;
      while bit < 8 {
        crc = if crc & 0x8000_0000 != 0 { (crc << 1) ^ poly } else { crc << 1 };
        bit += 1;
      }
      i += 1;
    }
  }
  crc
}

/// Same contract as [`Crc32Fold::reduce`](crate::Crc32Fold::reduce),
/// computed bit by bit.
#[must_use]
pub const fn reference_reduce(params: &Crc32Params, crc: u32, data: &[u8]) -> u32 {
  let mask = if params.invert { !0 } else { 0 };
  crc32_bitwise(params.poly, params.is_reflected(), crc ^ mask, data) ^ mask
}

#[cfg(test)]
mod tests {
  use super::*;

  // Compile-time check values.
  const ISO_HDLC_CHECK: u32 = reference_reduce(&Crc32Params::ISO_HDLC, 0, b"123456789");
  const BZIP2_CHECK: u32 = reference_reduce(&Crc32Params::BZIP2, 0, b"123456789");

  #[test]
  fn check_values() {
    assert_eq!(ISO_HDLC_CHECK, 0xCBF4_3926);
    assert_eq!(BZIP2_CHECK, 0xFC89_1918);
    assert_eq!(reference_reduce(&Crc32Params::ISCSI, 0, b"123456789"), 0xE306_9283);
  }

  #[test]
  fn raw_register_of_zero_input_is_zero() {
    assert_eq!(crc32_bitwise(0x04C1_1DB7, false, 0, &[0; 64]), 0);
    assert_eq!(crc32_bitwise(0x04C1_1DB7, true, 0, &[0; 64]), 0);
  }

  #[test]
  fn single_byte_equals_table_entry() {
    for b in 0..=255u8 {
      assert_eq!(crc32_bitwise(0x04C1_1DB7, false, 0, &[b]), crate::gf2::byte_table_entry(0x04C1_1DB7, false, b));
      assert_eq!(crc32_bitwise(0x1EDC_6F41, true, 0, &[b]), crate::gf2::byte_table_entry(0x1EDC_6F41, true, b));
    }
  }
}
