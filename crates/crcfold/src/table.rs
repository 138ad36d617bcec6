//! Byte-at-a-time table update.
//!
//! Handles everything the folding engine does not: inputs below
//! [`MIN_FOLD_LEN`](crate::constants::MIN_FOLD_LEN) and the unaligned edges of
//! longer ones.

use crate::{gf2, params::Convention};

/// 256-entry lookup table for one `(poly, convention)`.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteTable {
  entries: [u32; 256],
  convention: Convention,
}

impl core::fmt::Debug for ByteTable {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ByteTable").field("convention", &self.convention).finish_non_exhaustive()
  }
}

impl ByteTable {
  #[must_use]
  pub const fn new(poly: u32, convention: Convention) -> Self {
    Self { entries: gf2::byte_table(poly, convention.is_reflected()), convention }
  }

  #[inline]
  #[must_use]
  pub const fn entries(&self) -> &[u32; 256] {
    &self.entries
  }

  /// Feed `data` through the register one byte at a time.
  ///
  /// No inversion is applied.
  #[inline]
  #[must_use]
  pub fn update(&self, crc: u32, data: &[u8]) -> u32 {
    match self.convention {
      Convention::Reflected => update_reflected(&self.entries, crc, data),
      Convention::Normal => update_normal(&self.entries, crc, data),
    }
  }
}

#[inline]
fn update_reflected(table: &[u32; 256], mut crc: u32, data: &[u8]) -> u32 {
  for &b in data {
    #[allow(clippy::indexing_slicing)] // index is masked to 0..=255
    let entry = table[((crc ^ u32::from(b)) & 0xFF) as usize];
    crc = entry ^ (crc >> 8);
  }
  crc
}

#[inline]
fn update_normal(table: &[u32; 256], mut crc: u32, data: &[u8]) -> u32 {
  for &b in data {
    #[allow(clippy::indexing_slicing)] // index is masked to 0..=255
    let entry = table[(((crc >> 24) ^ u32::from(b)) & 0xFF) as usize];
    crc = entry ^ (crc << 8);
  }
  crc
}
