//! Key and ciphertext types.
//!
//! Public material is stored in `#[repr(C)]` structs whose in-memory layout
//! IS the wire layout, so byte (de)serialisation is zero-cost via `zerocopy`
//! derives. The secret key holds signed ternary coefficients and is zeroized
//! on drop; it has no wire form at this layer.
//!
//! Parsing constructors validate input: length for both types, plus the
//! `cnt == popcount(mask)` production invariant for ciphertexts.

use lwr_math::{MASK_BYTES, N, SEED_BYTES};
use zerocopy::byteorder::{LittleEndian, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::params::{ParameterSet, SS_BYTES};
use crate::Error;

/// Public key: the matrix seed and the compressed vector `b = A * s`.
///
/// Wire layout: `seed || b`, row-major.
#[derive(Clone, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct PublicKey<P: ParameterSet> {
    pub(crate) seed: [u8; SEED_BYTES],
    pub(crate) b: P::VecArray,
}

impl<P: ParameterSet> TryInto<PublicKey<P>> for &[u8] {
    type Error = Error;

    /// Construct a [`PublicKey`] from its `seed || b` wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless the slice is exactly
    /// `P::PK_BYTES` long. Every byte pattern of that length is a
    /// structurally valid public key.
    fn try_into(self) -> Result<PublicKey<P>, Self::Error> {
        PublicKey::read_from_bytes(self).map_err(|_| Error::InvalidLength {
            expected: P::PK_BYTES,
            actual: self.len(),
        })
    }
}

impl<P: ParameterSet> AsRef<[u8]> for PublicKey<P> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }
}

impl<P: ParameterSet> core::fmt::Debug for PublicKey<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PublicKey")
            .field("len", &self.as_ref().len())
            .finish_non_exhaustive()
    }
}

/// Secret key: the ternary vector `s`, entries in {-1, 0, +1}.
#[derive(Clone)]
pub struct SecretKey<P: ParameterSet> {
    pub(crate) s: P::SecretArray,
}

impl<P: ParameterSet> SecretKey<P> {
    /// Borrow the coefficient array. The core defines no wire encoding for
    /// secret keys; callers that persist them choose their own sign-preserving
    /// encoding over these coefficients.
    #[inline]
    #[must_use]
    pub fn coeffs(&self) -> &[i16] {
        self.s.as_ref()
    }
}

impl<P: ParameterSet> Zeroize for SecretKey<P> {
    fn zeroize(&mut self) {
        self.s.zeroize();
    }
}

impl<P: ParameterSet> Drop for SecretKey<P> {
    fn drop(&mut self) {
        self.s.zeroize();
    }
}

impl<P: ParameterSet> ZeroizeOnDrop for SecretKey<P> {}

impl<P: ParameterSet> core::fmt::Debug for SecretKey<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

/// Ciphertext: the compressed vector `u`, the safe-zone mask, and the count
/// of selected positions.
///
/// Wire layout: `u || mask || cnt` with `cnt` little-endian.
#[derive(Clone, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct Ciphertext<P: ParameterSet> {
    pub(crate) u: P::VecArray,
    pub(crate) mask: [u8; MASK_BYTES],
    pub(crate) cnt: U16<LittleEndian>,
}

impl<P: ParameterSet> Ciphertext<P> {
    /// Number of safe positions selected by the mask.
    #[inline]
    #[must_use]
    pub fn cnt(&self) -> u16 {
        self.cnt.get()
    }
}

impl<P: ParameterSet> TryInto<Ciphertext<P>> for &[u8] {
    type Error = Error;

    /// Construct a [`Ciphertext`] from its `u || mask || cnt` wire form.
    ///
    /// Validates:
    /// 1. Length -- must be exactly `P::CT_BYTES`.
    /// 2. Count consistency -- `cnt` must equal the mask population count
    ///    (and is therefore at most `N`), as every honestly produced
    ///    ciphertext satisfies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] or [`Error::InvalidCiphertext`].
    fn try_into(self) -> Result<Ciphertext<P>, Self::Error> {
        let ct: Ciphertext<P> =
            Ciphertext::read_from_bytes(self).map_err(|_| Error::InvalidLength {
                expected: P::CT_BYTES,
                actual: self.len(),
            })?;

        let popcount: u32 = ct.mask.iter().map(|b| b.count_ones()).sum();
        if u32::from(ct.cnt.get()) != popcount {
            return Err(Error::InvalidCiphertext);
        }

        Ok(ct)
    }
}

impl<P: ParameterSet> AsRef<[u8]> for Ciphertext<P> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }
}

impl<P: ParameterSet> core::fmt::Debug for Ciphertext<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ciphertext")
            .field("cnt", &self.cnt.get())
            .finish_non_exhaustive()
    }
}

/// Derived shared secret (32 bytes). Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    pub(crate) bytes: [u8; SS_BYTES],
}

impl From<&[u8; SS_BYTES]> for SharedSecret {
    #[inline]
    fn from(arr: &[u8; SS_BYTES]) -> Self {
        Self { bytes: *arr }
    }
}

impl AsRef<[u8]> for SharedSecret {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedSecret").finish_non_exhaustive()
    }
}

const _: () = {
    // The ciphertext count field must be able to hold N.
    assert!(N <= u16::MAX as usize);
};
