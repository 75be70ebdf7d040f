//! `lwr-math` — Core arithmetic primitives for the LWR key-encapsulation
//! scheme.
//!
//! `no_std`, zero-allocation, dependency-free. Sub-modules cover branchless
//! constant-time operations, deterministic coefficient sampling maps, and the
//! safe-zone reconciliation predicate. Everything here is straight-line code
//! over flat arrays: no secret-dependent branches, no secret-dependent
//! indexing.

#![no_std]
#![deny(unsafe_code)]
#![allow(clippy::cast_lossless, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

pub mod ct;
pub mod recon;
pub mod sample;

/// Vector length per module row.
pub const N: usize = 256;

/// Modulus (power of two, 13-bit).
pub const Q: i32 = 8192;

/// Reduction mask: `x & Q_MASK` keeps the low 13 bits, i.e. `x mod Q`.
pub const Q_MASK: i32 = 0x1FFF;

/// Compression shift: stored entries are `(x mod Q) >> SHIFT`, one byte each.
pub const SHIFT: u32 = 5;

/// Size in bytes of seeds.
pub const SEED_BYTES: usize = 32;

/// Size in bytes of the safe-zone mask (one bit per position of `N`).
pub const MASK_BYTES: usize = N / 8;
