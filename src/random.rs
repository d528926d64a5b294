//! Seeded random stream and per-trial sub-stream derivation.
//!
//! One `u64` seed determines all randomness for a run. Each trial index gets
//! its own independently seeded rng, derived by hashing (seed, index), so
//! that trials never share mutable rng state and any index can be re-derived
//! in isolation. Re-deriving the sub-stream for a given (seed, index) always
//! yields the same values, which is what lets the runner reproduce a failing
//! value without keeping backend output around.

use byteorder::{ByteOrder, LittleEndian};
use crypto_hash::{digest, Algorithm};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generate a fresh seed for runs that did not specify one.
pub fn fresh_seed() -> u64 {
    rand::random()
}

/// The seed for the sub-stream at `index`, derived as the first eight bytes
/// of SHA-256 over the little-endian encoding of (seed, index).
fn substream_seed(seed: u64, index: u32) -> u64 {
    let mut buf = [0u8; 12];
    LittleEndian::write_u64(&mut buf[..8], seed);
    LittleEndian::write_u32(&mut buf[8..], index);
    let hash = digest(Algorithm::SHA256, &buf);
    LittleEndian::read_u64(&hash[..8])
}

/// Derive the reproducible sub-stream for one trial index.
pub fn substream(seed: u64, index: u32) -> StdRng {
    StdRng::seed_from_u64(substream_seed(seed, index))
}
