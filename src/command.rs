//! ## Command adapter
//! Binds sketch operations to named keys of a host key-value store.
//!
//! The store is reached only through the [`KeySpace`] capability, which answers whether a key is
//! absent, holds another type, or holds a sketch. Key existence, type tagging and persistence stay
//! with the host.
//!
//! | Command                     | Missing key        | Wrong type          |
//! |-----------------------------|--------------------|---------------------|
//! | `ADD key member [...]`      | creates the sketch | `WrongType`         |
//! | `CARD key`                  | `0`                | `WrongType`         |
//! | `UNIONCARD key [key ...]`   | empty set          | `WrongType`         |
//! | `INTERCARD key [key ...]`   | `0`                | `WrongType`         |

use thiserror::Error;
use tracing::debug;

use crate::algebra;
use crate::sketch::Sketch;

/// Largest number of keys accepted by [`inter_card`]
pub const MAX_INTERSECTION_SETS: usize = 16;

/// Command error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("too many sets for intersection: {count} given, at most {max} allowed")]
    TooManySets { count: usize, max: usize },
}

/// Result of looking a key up in a [`KeySpace`]
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Absent,
    WrongType,
    Sketch(&'a Sketch),
}

/// Key-value store capability the commands depend on
pub trait KeySpace {
    /// Look up `key` for reading
    fn lookup(&self, key: &[u8]) -> Lookup<'_>;

    /// Look up `key` for writing, creating an empty sketch when it does not exist.
    /// Returns [`CommandError::WrongType`] when `key` holds another type.
    fn lookup_or_create(&mut self, key: &[u8]) -> Result<&mut Sketch, CommandError>;

    /// Notify the store that `key` was written
    fn signal_modified(&mut self, key: &[u8]);
}

/// `ADD key member [member ...]`
///
/// Returns whether any register of the sketch was raised. The key is signalled as modified either way.
pub fn add<K, I>(ks: &mut K, key: &[u8], members: I) -> Result<bool, CommandError>
where
    K: KeySpace + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let sketch = ks.lookup_or_create(key)?;
    let mut count = 0usize;
    let mut changed = false;
    for member in members {
        changed |= sketch.add(member.as_ref()).is_some();
        count += 1;
    }
    ks.signal_modified(key);

    debug!(key = %String::from_utf8_lossy(key), members = count, changed, "add");
    Ok(changed)
}

/// `CARD key`
pub fn card<K: KeySpace + ?Sized>(ks: &K, key: &[u8]) -> Result<u64, CommandError> {
    let cardinality = match ks.lookup(key) {
        Lookup::Absent => 0,
        Lookup::WrongType => return Err(CommandError::WrongType),
        Lookup::Sketch(sketch) => sketch.cardinality(),
    };

    debug!(key = %String::from_utf8_lossy(key), cardinality, "card");
    Ok(cardinality)
}

/// `UNIONCARD key [key ...]`, missing keys are empty sets
pub fn union_card<K, I>(ks: &K, keys: I) -> Result<u64, CommandError>
where
    K: KeySpace + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut sketches = Vec::new();
    for key in keys {
        match ks.lookup(key.as_ref()) {
            Lookup::Absent => sketches.push(None),
            Lookup::WrongType => return Err(CommandError::WrongType),
            Lookup::Sketch(sketch) => sketches.push(Some(sketch)),
        }
    }

    let cardinality = algebra::union_cardinality(sketches.iter().copied());
    debug!(sets = sketches.len(), cardinality, "unioncard");
    Ok(cardinality)
}

/// `INTERCARD key [key ...]`
///
/// Any missing key yields `0`. A key holding another type is reported as
/// [`CommandError::WrongType`] even when another key is missing.
pub fn inter_card<K, I>(ks: &K, keys: I) -> Result<i64, CommandError>
where
    K: KeySpace + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut sketches = Vec::new();
    for key in keys {
        match ks.lookup(key.as_ref()) {
            Lookup::Absent => sketches.push(None),
            Lookup::WrongType => return Err(CommandError::WrongType),
            Lookup::Sketch(sketch) => sketches.push(Some(sketch)),
        }
    }
    if sketches.len() > MAX_INTERSECTION_SETS {
        return Err(CommandError::TooManySets {
            count: sketches.len(),
            max: MAX_INTERSECTION_SETS,
        });
    }

    let cardinality = algebra::intersection_cardinality(&sketches);
    debug!(sets = sketches.len(), cardinality, "intercard");
    Ok(cardinality)
}
