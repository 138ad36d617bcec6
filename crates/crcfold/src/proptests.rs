extern crate std;

use std::vec::Vec;

use crc_fast::CrcAlgorithm;
use proptest::prelude::*;

use crate::{
  Checksum, Convention, Crc32Bzip2, Crc32Fold, Crc32IsoHdlc, Crc32Iscsi, Crc32Params,
  clmul::Portable,
  config::FoldForce,
  constants::FoldConstants,
  dispatch::{self, Kernel},
  fold,
  gf2::{self, reflect},
  reference::reference_reduce,
};

fn any_params() -> impl Strategy<Value = Crc32Params> {
  (any::<u32>(), any::<bool>(), any::<bool>())
    .prop_map(|(poly, reflected, invert)| Crc32Params::custom(poly | 1, reflected, invert))
}

fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
  proptest::collection::vec(any::<u8>(), 0..=max)
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn reduce_matches_bitwise_oracle(params in any_params(), crc in any::<u32>(), data in bytes(4096)) {
    let ctx = Crc32Fold::new(params);
    prop_assert_eq!(ctx.reduce(crc, &data), reference_reduce(&params, crc, &data));
  }

  #[test]
  fn every_backend_matches_portable(params in any_params(), data in bytes(2048)) {
    let ctx = Crc32Fold::new(params);
    let expected = ctx.reduce_with(dispatch::select_for(FoldForce::Portable).kernel, 0, &data);
    for c in dispatch::candidates().iter().filter(|c| (c.available)()) {
      prop_assert_eq!(ctx.reduce_with(Kernel::Fold(c.func), 0, &data), expected, "{}", c.name);
    }
  }

  #[test]
  fn chunking_is_irrelevant(data in bytes(4096), split in any::<usize>()) {
    let ctx = Crc32Fold::new(Crc32Params::BZIP2);
    let split = if data.is_empty() { 0 } else { split % data.len() };
    let (a, b) = data.split_at(split);
    prop_assert_eq!(ctx.reduce(ctx.reduce(0, a), b), ctx.reduce(0, &data));
  }

  #[test]
  fn final_fold_forms_agree(lane in any::<u128>(), reflected in any::<bool>(), poly in any::<u32>()) {
    let k = FoldConstants::derive(poly | 1, Convention::from_reflected(reflected));
    let a = fold::barrett(Portable, &k, fold::final_fold(Portable, &k, lane));
    let b = fold::barrett(Portable, &k, fold::final_fold_words(Portable, &k, lane));
    prop_assert_eq!(a, b);
  }

  #[test]
  fn barrett_equals_table_of_four_bytes(word in any::<[u8; 4]>(), reflected in any::<bool>(), poly in any::<u32>()) {
    let conv = Convention::from_reflected(reflected);
    let k = FoldConstants::derive(poly, conv);
    let padded = [word[0], word[1], word[2], word[3], 0, 0, 0, 0];
    let a = if reflected { u64::from_le_bytes(padded) } else { u64::from_be_bytes(padded) };
    let expected = crate::table::ByteTable::new(poly, conv).update(0, &word);
    prop_assert_eq!(fold::barrett(Portable, &k, a), expected);
  }

  #[test]
  fn reflect_round_trips(x in any::<u64>(), n in 0u32..=64) {
    let masked = if n == 64 { x } else { x & ((1u64 << n) - 1) };
    prop_assert_eq!(reflect(reflect(x, n), n), masked);
  }

  #[test]
  fn xpow_mod_matches_division(n in 0u32..4096, poly in any::<u32>()) {
    prop_assert_eq!(u64::from(gf2::xpow_mod(n, poly)), gf2::xnmodp(n, u64::from(poly), 32).0);
  }

  // ─────────────────────────────────────────────────────────────────────────────
  // Cross-validation against crc-fast-rust
  // ─────────────────────────────────────────────────────────────────────────────

  #[test]
  fn iso_hdlc_matches_crc_fast_rust(data in bytes(4096)) {
    let reference = crc_fast::checksum(CrcAlgorithm::Crc32IsoHdlc, &data) as u32;
    prop_assert_eq!(Crc32IsoHdlc::checksum(&data), reference);
  }

  #[test]
  fn iscsi_matches_crc_fast_rust(data in bytes(4096)) {
    let reference = crc_fast::checksum(CrcAlgorithm::Crc32Iscsi, &data) as u32;
    prop_assert_eq!(Crc32Iscsi::checksum(&data), reference);
  }

  #[test]
  fn bzip2_matches_crc_fast_rust(data in bytes(4096)) {
    let reference = crc_fast::checksum(CrcAlgorithm::Crc32Bzip2, &data) as u32;
    prop_assert_eq!(Crc32Bzip2::checksum(&data), reference);
  }

  #[test]
  fn streaming_matches_crc_fast_rust(data in bytes(4096), chunk in 1usize..=257) {
    let mut ours = Crc32IsoHdlc::new();
    let mut reference = crc_fast::Digest::new(CrcAlgorithm::Crc32IsoHdlc);

    for part in data.chunks(chunk) {
      ours.update(part);
      reference.update(part);
    }

    prop_assert_eq!(ours.finalize(), reference.finalize() as u32);
  }
}
