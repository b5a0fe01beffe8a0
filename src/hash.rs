//! ## Hash function
//! Maps an arbitrary byte string to a deterministic 32-bit value using MurmurHash3 (x86, 32-bit variant)
//! with a fixed seed.
//!
//! Every sketch ever written depends on this mapping: the low bits select the register and the leading
//! zeros select the rank. Changing the seed or the algorithm changes the stored register format.
//!
//! [MurmurHash3 reference](https://github.com/aappleby/smhasher/blob/master/src/MurmurHash3.cpp)

use std::io::Cursor;

/// Fixed seed used for all sketch hashes
pub const SEED: u32 = 0xa39c_f4b1;

/// Hash `bytes` with the sketch seed
#[inline]
pub fn hash(bytes: &[u8]) -> u32 {
    murmur3_32(bytes, SEED)
}

/// MurmurHash3 x86_32 of `bytes` with the given `seed`
#[inline]
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    murmur3::murmur3_32(&mut Cursor::new(bytes), seed)
        .expect("reading from a byte slice never fails")
}
