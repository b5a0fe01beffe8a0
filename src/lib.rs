//! `kset` is a Rust crate for approximate distinct counting of sets stored in a key-value database.
//!
//! This library uses a HyperLogLog sketch of 2048 one-byte registers per set, with union estimates computed by
//! merging registers and intersection estimates computed by inclusion-exclusion over unions.
pub mod algebra;
pub mod command;
mod estimator;
pub mod hash;
#[cfg(feature = "with_serde")]
mod serde;
pub mod sketch;
pub mod store;

pub use algebra::{intersection_cardinality, union_cardinality, union_into};
pub use sketch::{Sketch, SketchError};
