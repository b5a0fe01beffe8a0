//! ## Memory store
//! In-memory [`KeySpace`] holding typed values, used to run sketch commands without a host store.
//!
//! Values are tagged by their enum variant:
//! - `Kset`    - a [`Sketch`]
//! - `Str`     - a plain byte string

use std::collections::HashMap;
use std::mem::size_of;

use enum_dispatch::enum_dispatch;

use crate::command::{CommandError, KeySpace, Lookup};
use crate::sketch::Sketch;

/// Value types supported by `MemoryStore`
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch]
pub enum Value {
    Kset(Sketch),
    Str(Str),
}

/// Value trait which must be implemented by all value types.
#[enum_dispatch(Value)]
pub trait ValueTrait {
    fn type_name(&self) -> &'static str;
    fn size_of(&self) -> usize;
}

/// Plain byte string value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Str(pub Vec<u8>);

impl ValueTrait for Str {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn size_of(&self) -> usize {
        size_of::<Self>() + self.0.len()
    }
}

impl ValueTrait for Sketch {
    fn type_name(&self) -> &'static str {
        "kset"
    }

    fn size_of(&self) -> usize {
        Sketch::size_of(self)
    }
}

/// In-memory key space
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<Vec<u8>, Value>,
    /// Number of writes since creation
    dirty: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a plain string under `key`, replacing any previous value
    pub fn set(&mut self, key: &[u8], value: impl Into<Vec<u8>>) {
        self.values.insert(key.to_vec(), Value::from(Str(value.into())));
        self.signal_modified(key);
    }

    /// Return the plain string stored under `key`
    pub fn get_str(&self, key: &[u8]) -> Option<&[u8]> {
        match self.values.get(key) {
            Some(Value::Str(s)) => Some(&s.0),
            _ => None,
        }
    }

    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Value> {
        let value = self.values.remove(key);
        if value.is_some() {
            self.signal_modified(key);
        }
        value
    }

    /// Return type name of the value stored under `key`
    pub fn type_of(&self, key: &[u8]) -> Option<&'static str> {
        self.values.get(key).map(|v| v.type_name())
    }

    /// Return memory size of all stored values
    pub fn size_of(&self) -> usize {
        self.values.iter().map(|(k, v)| k.len() + v.size_of()).sum()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of writes since creation
    pub fn dirty(&self) -> u64 {
        self.dirty
    }
}

impl KeySpace for MemoryStore {
    fn lookup(&self, key: &[u8]) -> Lookup<'_> {
        match self.values.get(key) {
            None => Lookup::Absent,
            Some(Value::Kset(sketch)) => Lookup::Sketch(sketch),
            Some(_) => Lookup::WrongType,
        }
    }

    fn lookup_or_create(&mut self, key: &[u8]) -> Result<&mut Sketch, CommandError> {
        match self
            .values
            .entry(key.to_vec())
            .or_insert_with(|| Value::from(Sketch::new()))
        {
            Value::Kset(sketch) => Ok(sketch),
            _ => Err(CommandError::WrongType),
        }
    }

    fn signal_modified(&mut self, _key: &[u8]) {
        self.dirty += 1;
    }
}
