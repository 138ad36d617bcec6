//! CRC-32 by carry-less folding and Barrett reduction.
//!
//! This crate computes 32-bit CRCs in either bit order for any generator
//! polynomial. Instead of feeding the register one byte at a time it folds
//! 16-byte lanes together with 64×64-bit carry-less multiplies, then reduces the
//! residue with a fixed-point Barrett step. Every multiplier is a remainder or
//! quotient of `x^n mod p(x)`, derived at run time from the polynomial alone.
//!
//! # Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`gf2`] | polynomial arithmetic: `x^n mod p`, reflection, byte tables |
//! | [`constants`] | the folding/Barrett constant set for one variant |
//! | [`fold`] | block folding engine, generic over a [`clmul::Clmul`] backend |
//! | [`reduce`] | [`Crc32Fold`]: alignment handling and the `reduce` entry point |
//! | [`emit`] | serializers for the derived tables |
//!
//! # Hardware Acceleration
//!
//! | Arch | Feature | Backend name |
//! |------|---------|--------------|
//! | x86_64 | PCLMULQDQ | `x86_64/pclmul` |
//! | aarch64 | PMULL (AES) | `aarch64/pmull` |
//! | powerpc64 | VPMSUMD (POWER8) | `powerpc64/vpmsum` |
//! | any | none | `table` |
//!
//! Selection happens once per process and can be overridden with
//! `CRCFOLD_FORCE` (see [`config`]). Without a hardware multiplier the byte
//! table is used; the software fold (`portable`) only runs when forced.
//!
//! # Example
//!
//! ```rust
//! use crcfold::{Checksum, Crc32Fold, Crc32IsoHdlc, Crc32Params};
//!
//! // Preset hasher
//! assert_eq!(Crc32IsoHdlc::checksum(b"123456789"), 0xCBF4_3926);
//!
//! // Any polynomial, either bit order
//! let ctx = Crc32Fold::new(Crc32Params::custom(0x8141_41AB, false, false));
//! let crc = ctx.reduce(0, b"123456789");
//! assert_eq!(crc, crcfold::reference::reference_reduce(ctx.params(), 0, b"123456789"));
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded use. Backend detection then
//! relies on compile-time target features, and the preset hashers (which need
//! a `OnceLock`) are unavailable.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]
// powerpc64 backend needs nightly-only asm/SIMD/target-feature support
#![cfg_attr(target_arch = "powerpc64", feature(asm_experimental_arch, portable_simd, powerpc_target_feature))]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "std")]
#[macro_use]
mod macros;

pub mod clmul;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod emit;
pub mod error;
pub mod fold;
pub mod gf2;
#[cfg(feature = "std")]
mod hasher;
pub mod params;
pub mod reduce;
pub mod reference;
pub mod table;

#[cfg(all(test, feature = "std"))]
mod proptests;

pub use dispatch::selected_backend;
pub use error::{ConfigError, ParseParamsError};
#[cfg(feature = "std")]
pub use hasher::{Crc32Bzip2, Crc32IsoHdlc, Crc32Iscsi};
pub use params::{Convention, Crc32Params};
pub use reduce::Crc32Fold;
pub use traits::Checksum;
