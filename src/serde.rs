//! # Serde module for Sketch
//!
//! This module provides serde-based (serialization and deserialization) features for `Sketch`.
//!
//! A `Sketch` is serialized as its raw register bytes, the same fixed-length image returned by
//! [`Sketch::registers`]. During deserialization the bytes go through [`Sketch::try_from`], so
//! arrays of the wrong length or with out-of-range registers are rejected.
//!
//! Refer to the serde documentation for more details on custom serialization and deserialization:
//! - [Serialization](https://serde.rs/impl-serialize.html)
//! - [Deserialization](https://serde.rs/impl-deserialize.html)
use serde::de::Error;
use serde::{Deserialize, Serialize};

use crate::sketch::Sketch;

impl<const B: usize> Serialize for Sketch<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(self.registers())
    }
}

impl<'de, const B: usize> Deserialize<'de> for Sketch<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let registers: Vec<u8> = Deserialize::deserialize(deserializer)?;
        Sketch::try_from(registers.as_slice()).map_err(Error::custom)
    }
}
