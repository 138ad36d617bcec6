//! Checksum traits shared by the crcfold crates.
//!
//! `no_std` compatible with zero dependencies. Algorithm crates implement
//! [`Checksum`] for their streaming hasher types so callers can be generic over
//! the variant.
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;

pub use checksum::Checksum;
