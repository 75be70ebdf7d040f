//! Scalar Keccak sponge with a byte cursor.
//!
//! The state is the canonical `[u64; 25]` lane array viewed little-endian as
//! 200 bytes. Absorbing XORs bytes in at the cursor and permutes whenever the
//! cursor reaches the rate; squeezing reads bytes out the same way. This keeps
//! the XOF a restartable stream object rather than a pre-materialised buffer,
//! which is what the on-demand expansion of matrix rows relies on.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{SHA3_256_RATE, SHA3_PAD, SHAKE256_RATE, SHAKE_PAD};

const PLEN: usize = 25;

#[inline(always)]
fn xor_byte(state: &mut [u64; PLEN], i: usize, b: u8) {
    state[i / 8] ^= (b as u64) << (8 * (i % 8));
}

#[inline(always)]
fn read_byte(state: &[u64; PLEN], i: usize) -> u8 {
    (state[i / 8] >> (8 * (i % 8))) as u8
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct Sponge {
    state: [u64; PLEN],
    pos: usize,
}

impl Sponge {
    const fn init() -> Self {
        Self {
            state: [0u64; PLEN],
            pos: 0,
        }
    }

    fn absorb(&mut self, rate: usize, data: &[u8]) {
        for &b in data {
            xor_byte(&mut self.state, self.pos, b);
            self.pos += 1;
            if self.pos == rate {
                keccak::f1600(&mut self.state);
                self.pos = 0;
            }
        }
    }

    /// XOR the domain suffix at the cursor and the final padding bit at
    /// `rate - 1`, permute, and reset the cursor for squeezing.
    fn pad(&mut self, rate: usize, suffix: u8) {
        xor_byte(&mut self.state, self.pos, suffix);
        xor_byte(&mut self.state, rate - 1, 0x80);
        keccak::f1600(&mut self.state);
        self.pos = 0;
    }

    fn squeeze(&mut self, rate: usize, out: &mut [u8]) {
        for b in out {
            if self.pos == rate {
                keccak::f1600(&mut self.state);
                self.pos = 0;
            }
            *b = read_byte(&self.state, self.pos);
            self.pos += 1;
        }
    }
}

/// Incremental SHAKE-256 XOF.
///
/// `absorb` any number of times, `finalize` once, then `squeeze` any number
/// of times; the output is a single unbounded stream.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Shake256 {
    sponge: Sponge,
}

impl Shake256 {
    #[must_use]
    pub const fn init() -> Self {
        Self {
            sponge: Sponge::init(),
        }
    }

    pub fn absorb(&mut self, data: &[u8]) {
        self.sponge.absorb(SHAKE256_RATE, data);
    }

    pub fn finalize(&mut self) {
        self.sponge.pad(SHAKE256_RATE, SHAKE_PAD);
    }

    pub fn squeeze(&mut self, out: &mut [u8]) {
        self.sponge.squeeze(SHAKE256_RATE, out);
    }
}

/// Incremental SHA3-256.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Sha3_256 {
    sponge: Sponge,
}

impl Sha3_256 {
    #[must_use]
    pub const fn init() -> Self {
        Self {
            sponge: Sponge::init(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.sponge.absorb(SHA3_256_RATE, data);
    }

    #[must_use]
    pub fn finalize(mut self) -> [u8; 32] {
        self.sponge.pad(SHA3_256_RATE, SHA3_PAD);
        let mut out = [0u8; 32];
        self.sponge.squeeze(SHA3_256_RATE, &mut out);
        out
    }
}

/// One-shot SHA3-256.
#[inline]
#[must_use]
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut h = Sha3_256::init();
    h.update(data);
    h.finalize()
}
