//! CRC-32 context: alignment handling around the folding engine.

use crate::{
  constants::{ALIGN_MASK, FoldConstants, MIN_FOLD_LEN, VECTOR_WIDTH},
  dispatch::{self, FoldFn, Kernel},
  fold::MAX_CHUNKS,
  params::Crc32Params,
  table::ByteTable,
};

/// Everything needed to checksum with one CRC-32 variant.
///
/// Built once per variant and immutable afterwards, so a shared reference can
/// be used from any number of threads.
///
/// ```
/// use crcfold::{Crc32Fold, Crc32Params};
///
/// let ctx = Crc32Fold::new(Crc32Params::ISO_HDLC);
/// assert_eq!(ctx.reduce(0, b"123456789"), 0xCBF4_3926);
///
/// // The accumulator threads through calls.
/// let crc = ctx.reduce(0, b"1234");
/// assert_eq!(ctx.reduce(crc, b"56789"), 0xCBF4_3926);
/// ```
#[derive(Clone, Debug)]
pub struct Crc32Fold {
  params: Crc32Params,
  constants: FoldConstants,
  table: ByteTable,
}

impl Crc32Fold {
  /// Derive constants and byte table for `params`.
  #[must_use]
  pub fn new(params: Crc32Params) -> Self {
    log::debug!("building CRC-32 context for {params}");
    Self {
      constants: FoldConstants::derive(params.poly, params.convention),
      table: ByteTable::new(params.poly, params.convention),
      params,
    }
  }

  #[inline]
  #[must_use]
  pub const fn params(&self) -> &Crc32Params {
    &self.params
  }

  #[inline]
  #[must_use]
  pub const fn constants(&self) -> &FoldConstants {
    &self.constants
  }

  #[inline]
  #[must_use]
  pub const fn table(&self) -> &ByteTable {
    &self.table
  }

  /// Update `crc` with `data` using the process-wide backend.
  ///
  /// When the variant inverts, `crc` is a finished checksum (0 for a fresh
  /// start) and so is the result. Otherwise both are raw register values.
  /// An empty `data` returns `crc` unchanged.
  #[must_use]
  pub fn reduce(&self, crc: u32, data: &[u8]) -> u32 {
    self.reduce_with(dispatch::selected().kernel, crc, data)
  }

  /// [`reduce`](Self::reduce) with an explicit kernel.
  #[must_use]
  pub fn reduce_with(&self, kernel: Kernel, crc: u32, data: &[u8]) -> u32 {
    let mask = if self.params.invert { !0 } else { 0 };
    let crc = crc ^ mask;

    let crc = match kernel {
      Kernel::Fold(func) if data.len() >= MIN_FOLD_LEN => self.fold_aligned(func, crc, data),
      _ => self.table.update(crc, data),
    };

    crc ^ mask
  }

  /// Table up to the first 16-byte boundary, fold the aligned middle in
  /// blocks, table the tail.
  fn fold_aligned(&self, func: FoldFn, mut crc: u32, data: &[u8]) -> u32 {
    let misalign = data.as_ptr() as usize & ALIGN_MASK;
    let prealign = if misalign == 0 { 0 } else { VECTOR_WIDTH - misalign };
    let (head, body) = data.split_at(prealign.min(data.len()));
    crc = self.table.update(crc, head);

    let (chunks, tail) = body.as_chunks::<VECTOR_WIDTH>();
    for block in chunks.chunks(MAX_CHUNKS) {
      crc = func(&self.constants, crc, block);
    }

    self.table.update(crc, tail)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presets
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! preset_context {
  ($(#[$doc:meta])* $fn_name:ident => $params:expr) => {
    $(#[$doc])*
    #[cfg(feature = "std")]
    #[must_use]
    pub fn $fn_name() -> &'static Crc32Fold {
      use std::sync::OnceLock;
      static CTX: OnceLock<Crc32Fold> = OnceLock::new();
      CTX.get_or_init(|| Crc32Fold::new($params))
    }
  };
}

preset_context!(
  /// Shared CRC-32/ISO-HDLC context.
  iso_hdlc => Crc32Params::ISO_HDLC
);
preset_context!(
  /// Shared CRC-32/BZIP2 context.
  bzip2 => Crc32Params::BZIP2
);
preset_context!(
  /// Shared CRC-32/ISCSI context.
  iscsi => Crc32Params::ISCSI
);

#[cfg(test)]
mod tests {
  use std::vec::Vec;

  use super::*;

  fn data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(167).wrapping_add(13)).collect()
  }

  #[test]
  fn check_values() {
    for params in Crc32Params::PRESETS {
      let ctx = Crc32Fold::new(params);
      assert_eq!(Some(ctx.reduce(0, b"123456789")), params.check(), "{params}");
    }
  }

  #[test]
  fn short_inputs_use_table() {
    let ctx = Crc32Fold::new(Crc32Params::ISO_HDLC);
    let buf = data(MIN_FOLD_LEN - 1);
    let expected = ctx.table().update(!0, &buf) ^ !0;
    assert_eq!(ctx.reduce(0, &buf), expected);
  }

  #[test]
  fn every_kernel_agrees_with_table() {
    let ctx = Crc32Fold::new(Crc32Params::BZIP2);
    let buf = data(3 * crate::constants::BLOCK_SIZE + 77);
    let expected = ctx.reduce_with(Kernel::Table, 0, &buf);
    for c in dispatch::candidates().iter().filter(|c| (c.available)()) {
      assert_eq!(ctx.reduce_with(Kernel::Fold(c.func), 0, &buf), expected, "{}", c.name);
    }
  }

  #[test]
  fn offsets_within_a_lane() {
    let ctx = Crc32Fold::new(Crc32Params::ISCSI);
    let buf = data(4096 + 16);
    let expected: Vec<u32> = (0..16).map(|o| ctx.reduce_with(Kernel::Table, 0, &buf[o..o + 4096])).collect();
    for (o, want) in expected.iter().enumerate() {
      assert_eq!(ctx.reduce(0, &buf[o..o + 4096]), *want, "offset {o}");
    }
  }

  #[test]
  fn empty_input_is_identity() {
    let raw = Crc32Fold::new(Crc32Params::custom(0x04C1_1DB7, false, false));
    assert_eq!(raw.reduce(0x1234_5678, &[]), 0x1234_5678);
    let inverted = Crc32Fold::new(Crc32Params::ISO_HDLC);
    assert_eq!(inverted.reduce(0x1234_5678, &[]), 0x1234_5678);
  }

  #[cfg(feature = "std")]
  #[test]
  fn presets_are_shared() {
    assert!(core::ptr::eq(iso_hdlc(), iso_hdlc()));
    assert_eq!(bzip2().params(), &Crc32Params::BZIP2);
    assert_eq!(iscsi().reduce(0, b"123456789"), 0xE306_9283);
  }
}
