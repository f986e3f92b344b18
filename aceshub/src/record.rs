//! Records are the individual entities (members, events, announcements,
//! transactions) held by a collection.

use serde::{ser::SerializeMap, Serialize};

use crate::{Error, Map, Value};

/// A single entity, identified by an integer ID that is unique within its
/// collection.
///
/// The ID is also available as the `id` field.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: u64,
    fields: Map<String, Value>,
}

impl Record {
    /// Constructor. Overwrites any `id` field in `fields` with `id`.
    pub fn new(id: u64, mut fields: Map<String, Value>) -> Self {
        fields.insert("id".to_string(), Value::Unsigned(id));
        Self { id, fields }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Look up a field by name. Nested fields can be addressed with a dotted
    /// path, e.g. `social.github`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.fields.get(first)?;
        for part in parts {
            current = current.as_map()?.get(part)?;
        }
        Some(current)
    }

    /// Convenience accessor for string fields.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let value_type = value.get_type();
        match value {
            Value::Map(fields) => {
                let id = fields
                    .get("id")
                    .and_then(Value::as_unsigned)
                    .ok_or(Error::MissingRecordId)?;
                Ok(Self::new(id, fields))
            }
            _ => Err(Error::RecordNotAnObject(value_type)),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut sm = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            sm.serialize_entry(k, v)?;
        }
        sm.end()
    }
}
