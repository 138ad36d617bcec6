//! Any polynomial in either bit order must agree with the bitwise model,
//! whichever kernel runs and wherever the input is split.

#![no_main]

use crcfold::{
  Crc32Fold, Crc32Params,
  dispatch::{self, Kernel},
  reference::reference_reduce,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &[u8]| {
  let Some((head, data)) = input.split_first_chunk::<10>() else {
    return;
  };
  let poly = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
  let crc = u32::from_le_bytes([head[4], head[5], head[6], head[7]]);
  let reflected = head[8] & 1 != 0;
  let invert = head[8] & 2 != 0;
  let split = usize::from(head[9]).min(data.len());

  let params = Crc32Params::custom(poly, reflected, invert);
  let ctx = Crc32Fold::new(params);
  let expected = reference_reduce(&params, crc, data);

  assert_eq!(ctx.reduce(crc, data), expected, "{params} len={}", data.len());
  assert_eq!(ctx.reduce(ctx.reduce(crc, &data[..split]), &data[split..]), expected, "{params} split={split}");

  assert_eq!(ctx.reduce_with(Kernel::Table, crc, data), expected, "table {params}");
  for c in dispatch::candidates().iter().filter(|c| (c.available)()) {
    assert_eq!(ctx.reduce_with(Kernel::Fold(c.func), crc, data), expected, "{} {params}", c.name);
  }
});
