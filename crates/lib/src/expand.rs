//! Just-in-time expansion of public matrix rows and ternary vectors.
//!
//! Rows are regenerated from 32-byte seeds on every use instead of being
//! stored; a full `K * K * N` matrix never exists in memory. The sealed
//! [`ExpandMode`] trait selects between two derivation schemes:
//!
//! - [`RowWise`] squeezes a whole row from one XOF invocation. This is the
//!   canonical scheme and the one the randomized convenience API uses.
//! - [`ElementWise`] derives every coefficient from a fresh XOF whose absorb
//!   ends with the element index, so a peer never needs more than one sample
//!   of scratch. Far slower, and deliberately NOT interoperable with
//!   [`RowWise`]: the extra index byte makes it a different deterministic
//!   stream. Both sides of an exchange must run the same scheme.
//!
//! Either way a stream is a pure function of `(seed, tag, indices)`; no state
//! crosses invocations.

use lwr_math::{sample, N, SEED_BYTES};
use zeroize::Zeroize;

use crate::hash::{self, DOM_MATRIX, DOM_TERNARY};

mod sealed {
    pub trait Sealed {}
}

/// Derivation scheme for matrix and ternary rows. Sealed -- only implemented
/// for [`RowWise`] and [`ElementWise`].
pub trait ExpandMode: sealed::Sealed + 'static {
    /// Fill `out` with the `N` mod-Q coefficients of matrix block
    /// `(row, col)`.
    fn matrix_row(seed: &[u8; SEED_BYTES], row: u8, col: u8, out: &mut [i16; N]);

    /// Fill `out` with the `N` ternary coefficients of vector row `row`.
    fn ternary_row(seed: &[u8; SEED_BYTES], row: u8, out: &mut [i16; N]);
}

/// One XOF invocation per row.
#[derive(Debug, Clone, Copy)]
pub struct RowWise;

/// One XOF invocation per element.
#[derive(Debug, Clone, Copy)]
pub struct ElementWise;

impl sealed::Sealed for RowWise {}

impl ExpandMode for RowWise {
    fn matrix_row(seed: &[u8; SEED_BYTES], row: u8, col: u8, out: &mut [i16; N]) {
        let mut xof = hash::xof(seed, &[DOM_MATRIX, row, col]);
        let mut buf = [0u8; 2 * N];
        xof.squeeze(&mut buf);
        sample::uniform_row(out, &buf);
    }

    fn ternary_row(seed: &[u8; SEED_BYTES], row: u8, out: &mut [i16; N]) {
        let mut xof = hash::xof(seed, &[DOM_TERNARY, row]);
        let mut buf = [0u8; N];
        xof.squeeze(&mut buf);
        sample::ternary_row(out, &buf);
        buf.zeroize();
    }
}

impl sealed::Sealed for ElementWise {}

impl ExpandMode for ElementWise {
    fn matrix_row(seed: &[u8; SEED_BYTES], row: u8, col: u8, out: &mut [i16; N]) {
        for (idx, c) in out.iter_mut().enumerate() {
            *c = matrix_elem(seed, row, col, idx as u8);
        }
    }

    fn ternary_row(seed: &[u8; SEED_BYTES], row: u8, out: &mut [i16; N]) {
        for (idx, c) in out.iter_mut().enumerate() {
            *c = ternary_elem(seed, row, idx as u8);
        }
    }
}

/// Single matrix coefficient under the element-wise scheme.
fn matrix_elem(seed: &[u8; SEED_BYTES], row: u8, col: u8, idx: u8) -> i16 {
    let mut xof = hash::xof(seed, &[DOM_MATRIX, row, col, idx]);
    let mut buf = [0u8; 2];
    xof.squeeze(&mut buf);
    sample::uniform(buf[0], buf[1])
}

/// Single ternary coefficient under the element-wise scheme.
fn ternary_elem(seed: &[u8; SEED_BYTES], row: u8, idx: u8) -> i16 {
    let mut xof = hash::xof(seed, &[DOM_TERNARY, row, idx]);
    let mut buf = [0u8; 1];
    xof.squeeze(&mut buf);
    let coeff = sample::ternary(buf[0]);
    buf.zeroize();
    coeff
}
