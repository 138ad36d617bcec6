//! Differential fuzzing against reference implementations.
//!
//! Compares the preset hashers against crc32fast and the bitwise model.

#![no_main]

use crcfold::{Checksum, Crc32IsoHdlc, Crc32Iscsi, Crc32Params, reference::reference_reduce};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let ours = Crc32IsoHdlc::checksum(data);
  let reference = crc32fast::hash(data);
  assert_eq!(
    ours,
    reference,
    "CRC-32/ISO-HDLC differential mismatch: ours={ours:#010x}, reference={reference:#010x}, len={}",
    data.len()
  );

  let iscsi = Crc32Iscsi::checksum(data);
  assert_eq!(iscsi, reference_reduce(&Crc32Params::ISCSI, 0, data), "CRC-32/ISCSI oracle mismatch");

  // Streaming must match one-shot
  let split = data.first().map_or(0, |&b| usize::from(b)).min(data.len());
  let mut hasher = Crc32IsoHdlc::new();
  hasher.update(&data[..split]);
  hasher.update(&data[split..]);
  assert_eq!(hasher.finalize(), ours, "CRC-32/ISO-HDLC streaming mismatch");
});
