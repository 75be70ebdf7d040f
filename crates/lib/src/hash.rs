//! Domain-separated hash adapters.
//!
//! Every deterministic stream in the scheme is a SHAKE-256 XOF over
//! `seed || tag || indices`, and the key derivation is SHA3-256 over
//! `tag || sieve`. The tags are the only thing separating the streams, so
//! they live here, next to the constructions that consume them.

use lwr_hash::{Sha3_256, Shake256};
use lwr_math::SEED_BYTES;

use crate::params::SS_BYTES;

/// Leading tag byte of matrix coefficient streams.
pub(crate) const DOM_MATRIX: u8 = 0x00;
/// Leading tag byte of ternary secret/ephemeral streams.
pub(crate) const DOM_TERNARY: u8 = 0xFF;
/// Tag byte of the key-derivation hash. Identical on both sides of the
/// exchange; agreement depends on it.
pub(crate) const DOM_KDF: u8 = 0x02;

/// SHAKE-256 stream over `seed || params`, finalized and ready to squeeze.
pub(crate) fn xof(seed: &[u8; SEED_BYTES], params: &[u8]) -> Shake256 {
    let mut st = Shake256::init();
    st.absorb(seed);
    st.absorb(params);
    st.finalize();
    st
}

/// Entropy expander: the SHAKE-256 stream all per-call seeds are drawn from.
pub(crate) fn entropy_xof(entropy: &[u8; SEED_BYTES]) -> Shake256 {
    let mut st = Shake256::init();
    st.absorb(entropy);
    st.finalize();
    st
}

/// KDF over the reconciliation sieve: `SHA3-256(DOM_KDF || data)`.
pub(crate) fn kdf(data: &[u8]) -> [u8; SS_BYTES] {
    let mut h = Sha3_256::init();
    h.update(&[DOM_KDF]);
    h.update(data);
    h.finalize()
}
