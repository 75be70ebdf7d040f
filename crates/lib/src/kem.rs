//! The key encapsulation mechanism.
//!
//! Three core operations plus a round-trip self test. All are single atomic
//! computations over caller-provided buffers: no hidden state, no allocation,
//! no recoverable errors. Decapsulating a tampered ciphertext yields an
//! unrelated shared secret rather than a failure (implicit rejection).
//!
//! Every scratch buffer that held secret-dependent data (derived seeds,
//! ternary rows, agreement vectors, the reconciliation sieve) is zeroized
//! before returning; XOF states zeroize themselves on drop.

use lwr_math::{ct, recon, MASK_BYTES, N, Q_MASK, SEED_BYTES, SHIFT};
use rand_core::CryptoRng;
use zerocopy::byteorder::U16;
use zeroize::Zeroize;

use crate::expand::ExpandMode;
use crate::hash;
use crate::params::{ByteArray, CoeffArray, ParameterSet};
use crate::types::{Ciphertext, PublicKey, SecretKey, SharedSecret};

/// View row `idx` of a flat `K * N` coefficient vector.
fn row(v: &[i16], idx: usize) -> &[i16; N] {
    v[idx * N..(idx + 1) * N]
        .try_into()
        .expect("infallible: rows are N coefficients")
}

/// Mutable view of row `idx` of a flat `K * N` coefficient vector.
fn row_mut(v: &mut [i16], idx: usize) -> &mut [i16; N] {
    (&mut v[idx * N..(idx + 1) * N])
        .try_into()
        .expect("infallible: rows are N coefficients")
}

/// Deterministic key generation from 32 bytes of caller entropy.
///
/// The entropy is SHAKE-256-expanded into the public matrix seed and an
/// independent secret seed; the ternary secret `s` is derived from the
/// latter, and `b = A * s` is computed with the matrix regenerated row by
/// row, reduced mod Q and compressed by `SHIFT`.
#[must_use]
pub fn keypair_derand<P: ParameterSet, M: ExpandMode>(
    entropy: &[u8; SEED_BYTES],
) -> (PublicKey<P>, SecretKey<P>) {
    let mut ent = hash::entropy_xof(entropy);
    let mut seed_a = [0u8; SEED_BYTES];
    ent.squeeze(&mut seed_a);
    let mut seed_s = [0u8; SEED_BYTES];
    ent.squeeze(&mut seed_s);

    let mut s = P::SecretArray::zeroed();
    for l in 0..P::K {
        M::ternary_row(&seed_s, l as u8, row_mut(s.as_mut(), l));
    }
    seed_s.zeroize();

    let mut b = P::VecArray::zeroed();
    let mut a_row = [0i16; N];
    let mut acc = [0i32; N];
    for i in 0..P::K {
        acc.fill(0);
        for l in 0..P::K {
            M::matrix_row(&seed_a, i as u8, l as u8, &mut a_row);
            let s_row = row(s.as_ref(), l);
            for j in 0..N {
                let prod = (a_row[j] as i32).wrapping_mul(s_row[j] as i32);
                acc[j] = acc[j].wrapping_add(prod) & Q_MASK;
            }
        }
        let out = &mut b.as_mut()[i * N..(i + 1) * N];
        for j in 0..N {
            out[j] = ((acc[j] & Q_MASK) >> SHIFT) as u8;
        }
    }
    a_row.zeroize();
    acc.zeroize();

    (PublicKey { seed: seed_a, b }, SecretKey { s })
}

/// Randomized key generation.
pub fn keypair<P: ParameterSet, M: ExpandMode>(
    rng: &mut impl CryptoRng,
) -> (PublicKey<P>, SecretKey<P>) {
    let mut entropy = [0u8; SEED_BYTES];
    rng.fill_bytes(&mut entropy);
    let kp = keypair_derand::<P, M>(&entropy);
    entropy.zeroize();
    kp
}

/// Deterministic encapsulation with 32 bytes of caller entropy.
///
/// Derives the ephemeral ternary vector `r`, computes `u = A^T * r`
/// (compressed like `b`), forms the per-position agreement byte
/// `v = <b, r> mod 256` in the compressed domain, records which positions
/// fall in the safe zone, and hashes the extracted quadrant bits into the
/// shared secret.
#[must_use]
pub fn encapsulate_derand<P: ParameterSet, M: ExpandMode>(
    pk: &PublicKey<P>,
    entropy: &[u8; SEED_BYTES],
) -> (Ciphertext<P>, SharedSecret) {
    let mut ent = hash::entropy_xof(entropy);
    let mut r_seed = [0u8; SEED_BYTES];
    ent.squeeze(&mut r_seed);

    // u = A^T * r: the outer index walks matrix columns.
    let mut u = P::VecArray::zeroed();
    let mut a_row = [0i16; N];
    let mut r_row = [0i16; N];
    let mut acc = [0i32; N];
    for i in 0..P::K {
        acc.fill(0);
        for l in 0..P::K {
            M::matrix_row(&pk.seed, l as u8, i as u8, &mut a_row);
            M::ternary_row(&r_seed, l as u8, &mut r_row);
            for j in 0..N {
                let prod = (a_row[j] as i32).wrapping_mul(r_row[j] as i32);
                acc[j] = acc[j].wrapping_add(prod) & Q_MASK;
            }
        }
        let out = &mut u.as_mut()[i * N..(i + 1) * N];
        for j in 0..N {
            out[j] = ((acc[j] & Q_MASK) >> SHIFT) as u8;
        }
    }

    // v = <b, r> mod 256, summed in the 8-bit compressed domain.
    let mut v = [0u8; N];
    for l in 0..P::K {
        M::ternary_row(&r_seed, l as u8, &mut r_row);
        let b_row = &pk.b.as_ref()[l * N..(l + 1) * N];
        for j in 0..N {
            let prod = (b_row[j] as i32).wrapping_mul(r_row[j] as i32);
            v[j] = ((v[j] as i32 + prod) & 0xFF) as u8;
        }
    }
    r_seed.zeroize();
    r_row.zeroize();
    a_row.zeroize();
    acc.zeroize();

    // Safe-zone selection and bit extraction.
    let mut mask = [0u8; MASK_BYTES];
    let mut sieve = [0u8; N];
    let mut widx = 0usize;
    for idx in 0..N {
        let val = v[idx];
        let safe = recon::safe_zone(val);
        ct::bit_set(&mut mask, idx, safe);
        widx = recon::sieve_push(&mut sieve, widx, recon::quadrant_bit(val), safe);
    }

    let key = hash::kdf(&sieve[..widx]);
    v.zeroize();
    sieve.zeroize();

    let ct = Ciphertext {
        u,
        mask,
        cnt: U16::new(widx as u16),
    };
    (ct, SharedSecret { bytes: key })
}

/// Randomized encapsulation.
pub fn encapsulate<P: ParameterSet, M: ExpandMode>(
    pk: &PublicKey<P>,
    rng: &mut impl CryptoRng,
) -> (Ciphertext<P>, SharedSecret) {
    let mut entropy = [0u8; SEED_BYTES];
    rng.fill_bytes(&mut entropy);
    let out = encapsulate_derand::<P, M>(pk, &entropy);
    entropy.zeroize();
    out
}

/// Decapsulation.
///
/// Recomputes the agreement byte `v' = <u, s> mod 256` per position, reads
/// the quadrant bits at the positions the sender marked safe, and derives the
/// shared secret from the identical KDF. Needs no expansion mode: it only
/// touches the ciphertext and the stored secret.
#[must_use]
pub fn decapsulate<P: ParameterSet>(ct: &Ciphertext<P>, sk: &SecretKey<P>) -> SharedSecret {
    let mut vp = [0u8; N];
    let s = sk.coeffs();
    let u = ct.u.as_ref();
    for l in 0..P::K {
        let u_row = &u[l * N..(l + 1) * N];
        let s_row = row(s, l);
        for j in 0..N {
            let prod = (u_row[j] as i32).wrapping_mul(s_row[j] as i32);
            vp[j] = ((vp[j] as i32 + prod) & 0xFF) as u8;
        }
    }

    let mut sieve = [0u8; N];
    let mut widx = 0usize;
    for idx in 0..N {
        let sel = ct::bit_get(&ct.mask, idx);
        widx = recon::sieve_push(&mut sieve, widx, recon::quadrant_bit(vp[idx]), sel);
    }

    let key = hash::kdf(&sieve[..widx]);
    vp.zeroize();
    sieve.zeroize();

    SharedSecret { bytes: key }
}

/// Full round trip on fixed entropy: keygen, encapsulate with a seed derived
/// from the same entropy, decapsulate, and compare the two shared secrets in
/// constant time.
#[must_use]
pub fn self_test<P: ParameterSet, M: ExpandMode>(entropy: &[u8; SEED_BYTES]) -> bool {
    let mut ent = hash::entropy_xof(entropy);
    let mut enc_entropy = [0u8; SEED_BYTES];
    ent.squeeze(&mut enc_entropy);

    let (pk, sk) = keypair_derand::<P, M>(entropy);
    let (ct, k1) = encapsulate_derand::<P, M>(&pk, &enc_entropy);
    let k2 = decapsulate::<P>(&ct, &sk);
    enc_entropy.zeroize();

    ct::verify(k1.as_ref(), k2.as_ref()) == 0
}
