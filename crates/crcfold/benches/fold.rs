//! Folding engine benchmarks.
//!
//! Run: `cargo bench -p crcfold`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p crcfold`
//!
//! This benchmarks:
//! - Main dispatch path (auto-selects best backend)
//! - Every available kernel, including the byte table, on the same input
//! - Misaligned input (prealign + tail path)
//! - Constant derivation for a fresh polynomial

use core::hint::black_box;

use crc_fast::{CrcAlgorithm, Digest as CrcFastDigest};
use crcfold::{
  Checksum, Convention, Crc32Fold, Crc32IsoHdlc, Crc32Params,
  constants::FoldConstants,
  dispatch::{self, Kernel},
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Standard benchmark sizes.
const SIZES: [usize; 7] = [64, 256, 1024, 4096, 16384, 65536, 1048576];

/// Sizes for the per-kernel comparison (the portable multiplier is slow).
const KERNEL_SIZES: [usize; 4] = [256, 4096, 32768, 262144];

fn make_data(len: usize) -> Vec<u8> {
  (0..len)
    .map(|i| (i as u8).wrapping_mul(31).wrapping_add((i >> 8) as u8))
    .collect()
}

fn bench_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32/dispatch");
  eprintln!("crcfold backend: {}", crcfold::selected_backend());

  for size in SIZES {
    let data = make_data(size);
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::new("crcfold", size), &data, |b, data| {
      b.iter(|| black_box(Crc32IsoHdlc::checksum(black_box(data))));
    });

    group.bench_with_input(BenchmarkId::new("crc-fast", size), &data, |b, data| {
      b.iter(|| {
        let mut h = CrcFastDigest::new(CrcAlgorithm::Crc32IsoHdlc);
        h.update(black_box(data));
        black_box(h.finalize())
      });
    });
  }

  group.finish();
}

fn bench_kernels(c: &mut Criterion) {
  let ctx = Crc32Fold::new(Crc32Params::ISCSI);
  let mut kernels = vec![("table", Kernel::Table)];
  for cand in dispatch::candidates().iter().filter(|cand| (cand.available)()) {
    kernels.push((cand.name, Kernel::Fold(cand.func)));
  }

  let mut group = c.benchmark_group("crc32/kernels");
  for size in KERNEL_SIZES {
    let data = make_data(size);
    group.throughput(Throughput::Bytes(size as u64));

    for &(name, kernel) in &kernels {
      group.bench_with_input(BenchmarkId::new(name, size), &data, |b, data| {
        b.iter(|| black_box(ctx.reduce_with(kernel, 0, black_box(data))));
      });
    }
  }
  group.finish();
}

fn bench_misaligned(c: &mut Criterion) {
  let ctx = Crc32Fold::new(Crc32Params::BZIP2);
  let backing = make_data(65536 + 16);

  let mut group = c.benchmark_group("crc32/misaligned");
  group.throughput(Throughput::Bytes(65536));
  for offset in [0usize, 1, 7, 15] {
    let data = &backing[offset..offset + 65536];
    group.bench_with_input(BenchmarkId::from_parameter(offset), data, |b, data| {
      b.iter(|| black_box(ctx.reduce(0, black_box(data))));
    });
  }
  group.finish();
}

fn bench_derive(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32/derive");
  for (name, convention) in [("normal", Convention::Normal), ("reflected", Convention::Reflected)] {
    group.bench_function(name, |b| {
      b.iter(|| black_box(FoldConstants::derive(black_box(0x8141_41AB), convention)));
    });
  }
  group.finish();
}

criterion_group!(benches, bench_dispatch, bench_kernels, bench_misaligned, bench_derive);
criterion_main!(benches);
