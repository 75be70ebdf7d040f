//! `lwr-rs` — A lightweight post-quantum key encapsulation mechanism over
//! Learning With Rounding.
//!
//! The modulus is a power of two, so rounding is a bit shift and reduction is
//! a mask; there is no rejection sampling and no NTT. Public matrices and
//! ternary vectors are regenerated on demand from 32-byte seeds, keeping the
//! working set a few kilobytes regardless of rank. Reconciliation extracts
//! one bit per position of the agreement vector that lands in a safe zone,
//! publishes the selection as a mask, and derives the shared secret with
//! SHA3-256 over the extracted bits.
//!
//! # Design principles
//!
//! - **No `unsafe`** -- enforced by `#![deny(unsafe_code)]`.
//! - **Constant time** -- no secret-dependent branches or indices; the
//!   safe-zone sieve is branchless by construction.
//! - **RAII zeroization** of secret material via the `zeroize` crate.
//! - **Zero-cost serialization** -- public key and ciphertext structs are
//!   their own wire format via `zerocopy`.

#![no_std]
#![deny(unsafe_code)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::needless_range_loop
)]

pub mod expand;
pub mod kem;
pub mod params;
pub mod types;

mod hash;

// Re-export the public API surface.
pub use expand::{ElementWise, ExpandMode, RowWise};
pub use kem::{
    decapsulate, encapsulate, encapsulate_derand, keypair, keypair_derand, self_test,
};
pub use lwr_math as math;
pub use params::{Lwr1024, Lwr1280, Lwr1536, Lwr512, Lwr768, ParameterSet};
pub use types::{Ciphertext, PublicKey, SecretKey, SharedSecret};

/// Parsing failures for keys and ciphertexts received as raw bytes.
///
/// The KEM operations themselves are infallible; only the slice constructors
/// report errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input slice has the wrong length for the parameter set.
    InvalidLength { expected: usize, actual: usize },
    /// Ciphertext count field disagrees with its mask population count.
    InvalidCiphertext,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected} bytes, got {actual}")
            }
            Error::InvalidCiphertext => f.write_str("ciphertext count/mask mismatch"),
        }
    }
}

impl core::error::Error for Error {}
