//! Deterministic vector tests for the LWR KEM.
//!
//! Covers:
//! - KEM roundtrip (keygen -> encaps -> decaps => identical shared secret)
//!   for every rank, in both expansion modes
//! - Deterministic reproducibility of the `_derand` variants
//! - Implicit rejection (tampered ciphertext -> different shared secret)
//! - Decapsulation with the wrong secret key
//! - `cnt == popcount(mask)` and the empty-mask boundary case
//! - Wire-format roundtrips and parse validation

use lwr_rs::{
    decapsulate, encapsulate, encapsulate_derand, keypair, keypair_derand, self_test,
    Ciphertext, ElementWise, Error, ExpandMode, Lwr1024, Lwr1280, Lwr1536, Lwr512, Lwr768, RowWise,
    ParameterSet, PublicKey,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const N: usize = lwr_rs::math::N;
const SEED_BYTES: usize = lwr_rs::math::SEED_BYTES;
const MASK_BYTES: usize = lwr_rs::math::MASK_BYTES;

/// The counting entropy pattern `01 02 .. 20`.
fn counting_entropy() -> [u8; SEED_BYTES] {
    core::array::from_fn(|i| (i + 1) as u8)
}

fn fixed_entropy(variant: u8) -> [u8; SEED_BYTES] {
    core::array::from_fn(|i| (i as u8).wrapping_add(variant.wrapping_mul(37)))
}

// ---------------------------------------------------------------------------
// Roundtrip - all ranks, both modes
// ---------------------------------------------------------------------------

fn roundtrip<P: ParameterSet, M: ExpandMode>(variant: u8) {
    let (pk, sk) = keypair_derand::<P, M>(&fixed_entropy(variant));
    let (ct, ss_enc) = encapsulate_derand::<P, M>(&pk, &fixed_entropy(variant.wrapping_add(1)));
    let ss_dec = decapsulate::<P>(&ct, &sk);
    assert_eq!(
        ss_enc.as_ref(),
        ss_dec.as_ref(),
        "roundtrip: shared secrets must match"
    );
}

#[test]
fn roundtrip_lwr512() {
    roundtrip::<Lwr512, RowWise>(0);
}

#[test]
fn roundtrip_lwr768() {
    roundtrip::<Lwr768, RowWise>(1);
}

#[test]
fn roundtrip_lwr1024() {
    roundtrip::<Lwr1024, RowWise>(2);
}

#[test]
fn roundtrip_lwr1280() {
    roundtrip::<Lwr1280, RowWise>(3);
}

#[test]
fn roundtrip_lwr1536() {
    roundtrip::<Lwr1536, RowWise>(4);
}

#[test]
fn roundtrip_elementwise_lwr512() {
    roundtrip::<Lwr512, ElementWise>(5);
}

#[test]
fn roundtrip_elementwise_lwr768() {
    roundtrip::<Lwr768, ElementWise>(6);
}

// ---------------------------------------------------------------------------
// Self test on pinned entropy patterns
// ---------------------------------------------------------------------------

#[test]
fn self_test_counting_entropy_k5() {
    assert!(self_test::<Lwr1280, RowWise>(&counting_entropy()));
}

#[test]
fn self_test_counting_entropy_k2() {
    assert!(self_test::<Lwr512, RowWise>(&counting_entropy()));
}

#[test]
fn self_test_zero_entropy_k3() {
    assert!(self_test::<Lwr768, RowWise>(&[0x00; SEED_BYTES]));
}

#[test]
fn self_test_ones_entropy_k4() {
    assert!(self_test::<Lwr1024, RowWise>(&[0xFF; SEED_BYTES]));
}

/// Frozen known answer for the all-zero-entropy K=3 exchange, replaying the
/// self-test flow: both sides must derive exactly these 32 bytes.
#[test]
fn shared_key_kat_zero_entropy_k3() {
    let entropy = [0x00; SEED_BYTES];

    // The encapsulation entropy the self test uses: SHAKE-256(entropy).
    let mut xof = lwr_hash::Shake256::init();
    xof.absorb(&entropy);
    xof.finalize();
    let mut enc_entropy = [0u8; SEED_BYTES];
    xof.squeeze(&mut enc_entropy);

    let (pk, sk) = keypair_derand::<Lwr768, RowWise>(&entropy);
    let (ct, ss_enc) = encapsulate_derand::<Lwr768, RowWise>(&pk, &enc_entropy);
    let ss_dec = decapsulate::<Lwr768>(&ct, &sk);

    let expected =
        hex::decode("18a45da9a81b3124f07d66c688ae375ccb18be3a5d3892d73103b801be3906a5").unwrap();
    assert_eq!(ss_enc.as_ref(), &expected[..], "encapsulated key diverges from KAT");
    assert_eq!(ss_dec.as_ref(), &expected[..], "decapsulated key diverges from KAT");
    assert_eq!(ct.cnt(), 71);
}

#[test]
fn self_test_elementwise() {
    assert!(self_test::<Lwr512, ElementWise>(&counting_entropy()));
}

// ---------------------------------------------------------------------------
// Deterministic reproducibility
// ---------------------------------------------------------------------------

fn determinism<P: ParameterSet>() {
    let kp_entropy = fixed_entropy(10);
    let enc_entropy = fixed_entropy(11);

    let (pk1, sk1) = keypair_derand::<P, RowWise>(&kp_entropy);
    let (pk2, sk2) = keypair_derand::<P, RowWise>(&kp_entropy);
    assert_eq!(pk1.as_ref(), pk2.as_ref(), "keypair: pk mismatch");
    assert_eq!(sk1.coeffs(), sk2.coeffs(), "keypair: sk mismatch");

    let (ct1, ss1) = encapsulate_derand::<P, RowWise>(&pk1, &enc_entropy);
    let (ct2, ss2) = encapsulate_derand::<P, RowWise>(&pk2, &enc_entropy);
    assert_eq!(ct1.as_ref(), ct2.as_ref(), "encapsulate: ct mismatch");
    assert_eq!(ss1.as_ref(), ss2.as_ref(), "encapsulate: ss mismatch");
}

#[test]
fn determinism_lwr512() {
    determinism::<Lwr512>();
}

#[test]
fn determinism_lwr1280() {
    determinism::<Lwr1280>();
}

#[test]
fn distinct_entropy_gives_distinct_keys() {
    let (pk1, _) = keypair_derand::<Lwr768, RowWise>(&fixed_entropy(20));
    let (pk2, _) = keypair_derand::<Lwr768, RowWise>(&fixed_entropy(21));
    assert_ne!(pk1.as_ref()[..SEED_BYTES], pk2.as_ref()[..SEED_BYTES]);
    assert_ne!(pk1.as_ref()[SEED_BYTES..], pk2.as_ref()[SEED_BYTES..]);
}

// ---------------------------------------------------------------------------
// Implicit rejection
// ---------------------------------------------------------------------------

fn parse_ct<P: ParameterSet>(bytes: &[u8]) -> Ciphertext<P> {
    bytes.try_into().expect("ciphertext bytes must parse")
}

#[test]
fn tampered_u_changes_shared_secret() {
    let (pk, sk) = keypair_derand::<Lwr1280, RowWise>(&counting_entropy());
    let (ct, ss_enc) = encapsulate_derand::<Lwr1280, RowWise>(&pk, &[0xAA; SEED_BYTES]);

    // Low-bit corruption of `u` is absorbed by the reconciliation corridor,
    // so perturb the quadrant-weight bit instead.
    let mut bytes = ct.as_ref().to_vec();
    for b in &mut bytes[..Lwr1280::VEC_BYTES] {
        *b ^= 0x40;
    }
    let forged = parse_ct::<Lwr1280>(&bytes);

    let ss_dec = decapsulate::<Lwr1280>(&forged, &sk);
    assert_ne!(
        ss_enc.as_ref(),
        ss_dec.as_ref(),
        "tampered u must not decapsulate to the agreed secret"
    );
}

#[test]
fn tampered_mask_changes_shared_secret() {
    let (pk, sk) = keypair_derand::<Lwr768, RowWise>(&fixed_entropy(30));
    let (ct, ss_enc) = encapsulate_derand::<Lwr768, RowWise>(&pk, &fixed_entropy(31));

    // Invert the whole selection and re-fix the count so the forgery still
    // parses; the sieve the receiver extracts then has a different length.
    let mut bytes = ct.as_ref().to_vec();
    let mask_off = Lwr768::VEC_BYTES;
    for b in &mut bytes[mask_off..mask_off + MASK_BYTES] {
        *b ^= 0xFF;
    }
    let popcount: u32 = bytes[mask_off..mask_off + MASK_BYTES]
        .iter()
        .map(|b| b.count_ones())
        .sum();
    let cnt_off = Lwr768::CT_BYTES - 2;
    bytes[cnt_off..].copy_from_slice(&(popcount as u16).to_le_bytes());
    let forged = parse_ct::<Lwr768>(&bytes);

    let ss_dec = decapsulate::<Lwr768>(&forged, &sk);
    assert_ne!(ss_enc.as_ref(), ss_dec.as_ref());
}

#[test]
fn wrong_secret_key_disagrees() {
    let (pk, _) = keypair_derand::<Lwr1024, RowWise>(&fixed_entropy(40));
    let (_, other_sk) = keypair_derand::<Lwr1024, RowWise>(&fixed_entropy(41));
    let (ct, ss_enc) = encapsulate_derand::<Lwr1024, RowWise>(&pk, &fixed_entropy(42));

    let ss_dec = decapsulate::<Lwr1024>(&ct, &other_sk);
    assert_ne!(ss_enc.as_ref(), ss_dec.as_ref());
}

#[test]
fn modes_do_not_interoperate() {
    let (pk, sk) = keypair_derand::<Lwr512, RowWise>(&fixed_entropy(50));
    let (ct, ss_enc) = encapsulate_derand::<Lwr512, ElementWise>(&pk, &fixed_entropy(51));
    let ss_dec = decapsulate::<Lwr512>(&ct, &sk);
    assert_ne!(
        ss_enc.as_ref(),
        ss_dec.as_ref(),
        "row-wise and element-wise streams are deliberately distinct"
    );
}

// ---------------------------------------------------------------------------
// Mask invariants and boundary cases
// ---------------------------------------------------------------------------

fn cnt_matches_popcount<P: ParameterSet>() {
    for variant in 0..8u8 {
        let (pk, _) = keypair_derand::<P, RowWise>(&fixed_entropy(variant));
        let (ct, _) = encapsulate_derand::<P, RowWise>(&pk, &fixed_entropy(variant ^ 0x7F));
        let bytes = ct.as_ref();
        let popcount: u32 = bytes[P::VEC_BYTES..P::VEC_BYTES + MASK_BYTES]
            .iter()
            .map(|b| b.count_ones())
            .sum();
        assert_eq!(u32::from(ct.cnt()), popcount, "variant {variant}");
        assert!(usize::from(ct.cnt()) <= N);
    }
}

#[test]
fn cnt_matches_popcount_lwr512() {
    cnt_matches_popcount::<Lwr512>();
}

#[test]
fn cnt_matches_popcount_lwr1536() {
    cnt_matches_popcount::<Lwr1536>();
}

#[test]
fn empty_mask_is_well_defined() {
    // An all-zero mask selects nothing; both sides hash the empty sieve, so
    // any two secret keys agree on the result.
    let (pk, sk1) = keypair_derand::<Lwr512, RowWise>(&fixed_entropy(60));
    let (_, sk2) = keypair_derand::<Lwr512, RowWise>(&fixed_entropy(61));
    let (ct, _) = encapsulate_derand::<Lwr512, RowWise>(&pk, &fixed_entropy(62));

    let mut bytes = ct.as_ref().to_vec();
    bytes[Lwr512::VEC_BYTES..Lwr512::VEC_BYTES + MASK_BYTES].fill(0);
    bytes[Lwr512::CT_BYTES - 2..].fill(0);
    let hollow = parse_ct::<Lwr512>(&bytes);

    let ss1 = decapsulate::<Lwr512>(&hollow, &sk1);
    let ss2 = decapsulate::<Lwr512>(&hollow, &sk2);
    assert_eq!(ss1.as_ref(), ss2.as_ref());
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

fn wire_roundtrip<P: ParameterSet>() {
    let (pk, _) = keypair_derand::<P, RowWise>(&fixed_entropy(70));
    let (ct, _) = encapsulate_derand::<P, RowWise>(&pk, &fixed_entropy(71));

    assert_eq!(pk.as_ref().len(), P::PK_BYTES);
    assert_eq!(ct.as_ref().len(), P::CT_BYTES);

    let pk2: PublicKey<P> = pk.as_ref().try_into().expect("pk bytes must parse");
    assert_eq!(pk.as_ref(), pk2.as_ref());

    let ct2: Ciphertext<P> = ct.as_ref().try_into().expect("ct bytes must parse");
    assert_eq!(ct.as_ref(), ct2.as_ref());
    assert_eq!(ct.cnt(), ct2.cnt());
}

#[test]
fn wire_roundtrip_lwr512() {
    wire_roundtrip::<Lwr512>();
}

#[test]
fn wire_roundtrip_lwr1280() {
    wire_roundtrip::<Lwr1280>();
}

#[test]
fn parse_rejects_bad_lengths() {
    let short = [0u8; 10];
    let pk: Result<PublicKey<Lwr512>, Error> = short.as_slice().try_into();
    assert_eq!(
        pk.unwrap_err(),
        Error::InvalidLength {
            expected: Lwr512::PK_BYTES,
            actual: 10
        }
    );

    let ct: Result<Ciphertext<Lwr512>, Error> = short.as_slice().try_into();
    assert_eq!(
        ct.unwrap_err(),
        Error::InvalidLength {
            expected: Lwr512::CT_BYTES,
            actual: 10
        }
    );
}

#[test]
fn parse_rejects_inconsistent_count() {
    let (pk, _) = keypair_derand::<Lwr512, RowWise>(&fixed_entropy(80));
    let (ct, _) = encapsulate_derand::<Lwr512, RowWise>(&pk, &fixed_entropy(81));

    let mut bytes = ct.as_ref().to_vec();
    let forged_cnt = ct.cnt() + 1; // mask unchanged, count off by one
    bytes[Lwr512::CT_BYTES - 2..].copy_from_slice(&forged_cnt.to_le_bytes());
    let parsed: Result<Ciphertext<Lwr512>, Error> = bytes.as_slice().try_into();
    assert_eq!(parsed.unwrap_err(), Error::InvalidCiphertext);
}

// ---------------------------------------------------------------------------
// Randomized API
// ---------------------------------------------------------------------------

#[test]
fn randomized_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x1708);
    let (pk, sk) = keypair::<Lwr768, RowWise>(&mut rng);
    let (ct, ss_enc) = encapsulate::<Lwr768, RowWise>(&pk, &mut rng);
    let ss_dec = decapsulate::<Lwr768>(&ct, &sk);
    assert_eq!(ss_enc.as_ref(), ss_dec.as_ref());
}
