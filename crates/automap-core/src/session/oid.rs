use crate::{schema::ClassName, stmt::Value, Error, Result};

use std::fmt;
use uuid::Uuid;

/// Persistent identity of an object: its class plus its primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    pub class: ClassName,
    pub key: Key,
}

/// Primary key value.
///
/// Database-assigned keys are integers; keys generated by the mapper are
/// random UUIDs stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Uuid(Uuid),
}

/// How keys of a class are produced, which also fixes their column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Assigned by the database on insert
    Database,

    /// Generated by the mapper before insert
    Generated,
}

impl Oid {
    pub fn new(class: impl Into<ClassName>, key: Key) -> Oid {
        Oid {
            class: class.into(),
            key,
        }
    }
}

impl Key {
    pub fn generate() -> Key {
        Key::Uuid(Uuid::new_v4())
    }

    pub fn to_value(self) -> Value {
        match self {
            Key::Int(id) => Value::I64(id),
            Key::Uuid(id) => Value::String(id.to_string()),
        }
    }

    /// Reads a key of the given kind from a column value.
    pub fn from_value(kind: KeyKind, value: &Value) -> Result<Key> {
        match (kind, value) {
            (KeyKind::Database, Value::I64(id)) => Ok(Key::Int(*id)),
            (KeyKind::Generated, Value::String(id)) => Ok(Key::Uuid(Uuid::parse_str(id)?)),
            (KeyKind::Database, _) => Err(Error::type_conversion(value.clone(), "Key::Int")),
            (KeyKind::Generated, _) => Err(Error::type_conversion(value.clone(), "Key::Uuid")),
        }
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Value {
        key.to_value()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(id) => write!(f, "{id}"),
            Key::Uuid(id) => write!(f, "{id}"),
        }
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class, self.key)
    }
}
