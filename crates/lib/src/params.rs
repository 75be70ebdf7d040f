//! Parameter definitions.
//!
//! The sealed [`ParameterSet`] trait encodes the module rank `K` and every
//! K-dependent size at the type level, including the associated array types
//! for key and ciphertext storage. Each supported rank gets a marker type
//! named after its effective lattice dimension `K * N`.

pub use lwr_math::{MASK_BYTES, N, Q, Q_MASK, SEED_BYTES, SHIFT};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
use zeroize::Zeroize;

/// Size in bytes of the derived shared secret.
pub const SS_BYTES: usize = 32;

/// Fixed-size byte storage usable as a zero-cost wire field.
pub trait ByteArray:
    AsRef<[u8]>
    + AsMut<[u8]>
    + Clone
    + core::fmt::Debug
    + FromBytes
    + IntoBytes
    + KnownLayout
    + Immutable
    + Unaligned
    + Zeroize
    + Send
    + Sync
    + 'static
{
    const LEN: usize;
    fn zeroed() -> Self;
}

impl<const SIZE: usize> ByteArray for [u8; SIZE] {
    const LEN: usize = SIZE;

    #[inline]
    fn zeroed() -> Self {
        [0u8; SIZE]
    }
}

/// Fixed-size signed coefficient storage for secret vectors.
pub trait CoeffArray:
    AsRef<[i16]> + AsMut<[i16]> + Clone + Zeroize + Send + Sync + 'static
{
    const LEN: usize;
    fn zeroed() -> Self;
}

impl<const SIZE: usize> CoeffArray for [i16; SIZE] {
    const LEN: usize = SIZE;

    #[inline]
    fn zeroed() -> Self {
        [0i16; SIZE]
    }
}

mod sealed {
    pub trait Sealed {}
}

/// LWR parameter set. Sealed -- only implemented for [`Lwr512`], [`Lwr768`],
/// [`Lwr1024`], [`Lwr1280`], [`Lwr1536`].
pub trait ParameterSet: sealed::Sealed + 'static {
    /// Module rank; the effective lattice dimension is `K * N`.
    const K: usize;

    /// `K * N` -- bytes in the compressed vectors `b` and `u`.
    const VEC_BYTES: usize;
    /// Serialized public key: `seed || b`.
    const PK_BYTES: usize;
    /// Serialized ciphertext: `u || mask || cnt`.
    const CT_BYTES: usize;

    type VecArray: ByteArray;
    type SecretArray: CoeffArray;
}

macro_rules! impl_parameter_set {
    ($(#[$doc:meta])* $name:ident, K = $K:literal, VEC_BYTES = $vb:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl ParameterSet for $name {
            const K: usize = $K;
            const VEC_BYTES: usize = $vb;
            const PK_BYTES: usize = SEED_BYTES + $vb;
            const CT_BYTES: usize = $vb + MASK_BYTES + 2;

            type VecArray = [u8; $vb];
            type SecretArray = [i16; $vb];
        }
    };
}

impl_parameter_set!(
    /// K = 2 (effective dimension 512). Smallest and fastest.
    Lwr512, K = 2, VEC_BYTES = 512
);
impl_parameter_set!(
    /// K = 3 (effective dimension 768).
    Lwr768, K = 3, VEC_BYTES = 768
);
impl_parameter_set!(
    /// K = 4 (effective dimension 1024).
    Lwr1024, K = 4, VEC_BYTES = 1024
);
impl_parameter_set!(
    /// K = 5 (effective dimension 1280). The reference security target.
    Lwr1280, K = 5, VEC_BYTES = 1280
);
impl_parameter_set!(
    /// K = 6 (effective dimension 1536). Largest supported rank.
    Lwr1536, K = 6, VEC_BYTES = 1536
);

const _: () = {
    macro_rules! check_params {
        ($t:ty) => {
            assert!(<$t>::VEC_BYTES == <$t>::K * N);
            assert!(<$t>::PK_BYTES == SEED_BYTES + <$t>::VEC_BYTES);
            assert!(<$t>::CT_BYTES == <$t>::VEC_BYTES + MASK_BYTES + 2);
            assert!(<<$t as ParameterSet>::VecArray as ByteArray>::LEN == <$t>::VEC_BYTES);
            assert!(<<$t as ParameterSet>::SecretArray as CoeffArray>::LEN == <$t>::VEC_BYTES);
        };
    }
    check_params!(Lwr512);
    check_params!(Lwr768);
    check_params!(Lwr1024);
    check_params!(Lwr1280);
    check_params!(Lwr1536);

    // One mask bit per vector position.
    assert!(MASK_BYTES * 8 == N);
    // Compressed entries must fit a byte.
    assert!((Q_MASK as usize) >> SHIFT == 255);
};
