//! Reusable container fixtures.
//!
//! - [`int_slice`] / [`raw_i32_slice`]: containers pre-filled with `i32`s.
//! - [`seeded_blocks`]: reproducible packed byte blocks from a seed.
//! - [`capped_config`]: a config whose ceiling makes growth failure
//!   deterministic.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sliced_core::{RawSlice, Slice, SliceConfig};

/// A generic slice holding `values`, sized exactly.
pub fn int_slice(values: &[i32]) -> Slice<i32> {
    let mut s = Slice::with_capacity(values.len()).expect("fixture capacity");
    s.append_array(values).expect("fixture append");
    s
}

/// A 4-byte type-erased slice holding `values` in little-endian order.
pub fn raw_i32_slice(values: &[i32]) -> RawSlice {
    let mut s = RawSlice::new(4, values.len() as i64).expect("fixture capacity");
    for v in values {
        s.append(&v.to_le_bytes()).expect("fixture append");
    }
    s
}

/// Decode one little-endian `i32` block.
///
/// # Panics
///
/// Panics if `block` is not exactly 4 bytes.
pub fn read_i32(block: &[u8]) -> i32 {
    i32::from_le_bytes(block.try_into().expect("4-byte block"))
}

/// Decode every block of a 4-byte type-erased slice.
pub fn raw_to_i32s(s: &RawSlice) -> Vec<i32> {
    s.iter().map(read_i32).collect()
}

/// `count` packed blocks of `element_size` random bytes.
///
/// The same `(element_size, count, seed)` always yields the same bytes.
pub fn seeded_blocks(element_size: usize, count: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bytes = vec![0u8; element_size * count];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// A config starting at `initial` slots that refuses to grow past `max`.
pub fn capped_config(initial: usize, max: usize) -> SliceConfig {
    SliceConfig::new(initial).with_max_capacity(max)
}
