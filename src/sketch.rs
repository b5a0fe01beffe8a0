//! ## Sketch
//! Fixed-size HyperLogLog register array, defined with const `B` parameter in [4..16] range
//! which is the number of hash bits used to select a register.
//!
//! For `B = 11` (the default):
//! - `M = 2048` registers, one byte each
//! - rank range `[0..22]` (`32 - B + 1`)
//! - expected error `1.04 / sqrt(2048) = 2.3%`
//!
//! # Data storage format
//! The register array is the whole state and the canonical wire format:
//! - data[0..M]    - register `i` stores the maximum rank observed for bucket `i`
//!
//! Any two sketches with equal bytes are equal, so the array can be stored verbatim
//! and restored with [`Sketch::try_from`].

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use thiserror::Error;

use crate::estimator;
use crate::hash;

/// Errors returned when restoring a `Sketch` from raw registers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    #[error("invalid register array length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("register {index} holds rank {value}, maximum is {max}")]
    InvalidRegister { index: usize, value: u8, max: u8 },
}

/// HyperLogLog sketch with `2^B` registers
#[derive(Clone, PartialEq, Eq)]
pub struct Sketch<const B: usize = 11> {
    registers: Box<[u8]>,
}

impl<const B: usize> Sketch<B> {
    /// Ensure that `B` is in correct range at compile time
    const VALID_PARAMS: () = assert!(B >= 4 && B <= 16);
    /// Number of registers
    pub const M: usize = 1 << B;
    /// Largest rank a register can hold
    pub const MAX_RANK: u8 = (32 - B + 1) as u8;
    /// Bias correction constant of the estimator
    pub const ALPHA: f64 = 0.7213 / (1.0 + 1.079 / Self::M as f64);

    /// Creates new empty `Sketch`
    #[inline]
    pub fn new() -> Self {
        // compile time check of params
        _ = Self::VALID_PARAMS;

        Self {
            registers: vec![0u8; Self::M].into_boxed_slice(),
        }
    }

    /// Add an item's bytes to the sketch.
    ///
    /// Returns the bucket whose register was raised, or `None` if the sketch is unchanged.
    #[inline]
    pub fn add(&mut self, item: &[u8]) -> Option<usize> {
        self.add_hash(hash::hash(item))
    }

    /// Add a precomputed 32-bit hash to the sketch
    #[inline]
    pub fn add_hash(&mut self, hash: u32) -> Option<usize> {
        let (bucket, rank) = Self::decode_hash(hash);
        let register = &mut self.registers[bucket];
        if *register < rank {
            *register = rank;
            Some(bucket)
        } else {
            None
        }
    }

    /// Return bucket index (low `B` bits) and rank (leading zeros + 1, capped at `MAX_RANK`) of a hash
    #[inline]
    fn decode_hash(hash: u32) -> (usize, u8) {
        let bucket = (hash as usize) & (Self::M - 1);
        let rank = (hash.leading_zeros() + 1).min(u32::from(Self::MAX_RANK)) as u8;
        (bucket, rank)
    }

    /// Zero all registers in place
    #[inline]
    pub fn reset(&mut self) {
        self.registers.fill(0);
    }

    /// Merge `rhs` into this sketch by keeping the maximum of every register pair.
    ///
    /// The result equals the sketch of the union of both inputs.
    #[inline]
    pub fn merge(&mut self, rhs: &Self) {
        for (lhs, &rhs) in self.registers.iter_mut().zip(rhs.registers.iter()) {
            *lhs = (*lhs).max(rhs);
        }
    }

    /// Return cardinality estimate
    #[inline]
    pub fn cardinality(&self) -> u64 {
        estimator::estimate::<B>(&self.registers)
    }

    /// Return raw registers, the sketch's wire format
    #[inline]
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Return number of registers set to non-zero rank
    pub fn non_zero(&self) -> usize {
        self.registers.iter().filter(|&&r| r != 0).count()
    }

    /// Return memory size of `Sketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.len()
    }
}

impl<const B: usize> Default for Sketch<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const B: usize> TryFrom<&[u8]> for Sketch<B> {
    type Error = SketchError;

    /// Restore `Sketch` from raw registers, validating length and register ranks
    fn try_from(registers: &[u8]) -> Result<Self, Self::Error> {
        if registers.len() != Self::M {
            return Err(SketchError::InvalidLength {
                expected: Self::M,
                got: registers.len(),
            });
        }
        if let Some((index, &value)) = registers
            .iter()
            .enumerate()
            .find(|&(_, &r)| r > Self::MAX_RANK)
        {
            return Err(SketchError::InvalidRegister {
                index,
                value,
                max: Self::MAX_RANK,
            });
        }

        let mut sketch = Self::new();
        sketch.registers.copy_from_slice(registers);
        Ok(sketch)
    }
}

impl<const B: usize> Debug for Sketch<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ non_zero: {}, estimate: {}, size: {} }}",
            self.non_zero(),
            self.cardinality(),
            self.size_of()
        )
    }
}
