//! `lwr-hash` — Scalar Keccak/SHA-3 primitives for the LWR KEM.
//!
//! A byte-cursor sponge over `keccak::f1600` backing the two flavours the
//! scheme needs: an incremental, restartable SHAKE-256 stream (matrix and
//! ternary expansion) and SHA3-256 (key derivation). Both share the 136-byte
//! rate; they differ only in the padding suffix.
//!
//! Sponge states are zeroized on drop: the ternary streams are keyed by
//! secret seeds, so their states are secret too.

#![no_std]
#![deny(unsafe_code)]

mod keccak1x;

pub const SHAKE256_RATE: usize = 136;
pub const SHA3_256_RATE: usize = 136;

const SHAKE_PAD: u8 = 0x1F;
const SHA3_PAD: u8 = 0x06;

pub use keccak1x::{sha3_256, Sha3_256, Shake256};
