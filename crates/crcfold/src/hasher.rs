//! Streaming hashers for the catalogue presets.

use crate::reduce;

define_crc32_type!(
  /// CRC-32/ISO-HDLC (Ethernet, gzip, zip, PNG).
  ///
  /// ```
  /// use crcfold::{Checksum, Crc32IsoHdlc};
  ///
  /// let mut h = Crc32IsoHdlc::new();
  /// h.update(b"12345");
  /// h.update(b"6789");
  /// assert_eq!(h.finalize(), 0xCBF4_3926);
  /// ```
  pub struct Crc32IsoHdlc {
    context: reduce::iso_hdlc,
  }
);

define_crc32_type!(
  /// CRC-32/BZIP2: the ISO-HDLC polynomial, MSB-first.
  pub struct Crc32Bzip2 {
    context: reduce::bzip2,
  }
);

define_crc32_type!(
  /// CRC-32/ISCSI (Castagnoli).
  pub struct Crc32Iscsi {
    context: reduce::iscsi,
  }
);
