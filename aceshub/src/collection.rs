use std::collections::BTreeSet;

use log::debug;

use crate::{Error, Record, Source, Value};

/// A collection is an ordered group of records of the same shape, e.g. all
/// members or all events.
///
/// It is analogous to a table in a database. Insertion order is preserved and
/// is the order in which unfiltered results are displayed. Collections are
/// immutable once constructed.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    records: Vec<Record>,
}

impl Collection {
    /// Constructor. Fails if two records share the same ID.
    pub fn new<N: AsRef<str>>(name: N, records: Vec<Record>) -> Result<Self, Error> {
        let name = name.as_ref().to_string();
        let mut ids = BTreeSet::new();
        for record in &records {
            if !ids.insert(record.id()) {
                return Err(Error::DuplicateRecordId(name, record.id()));
            }
        }
        Ok(Self { name, records })
    }

    /// Build a collection from a loaded document.
    ///
    /// The document must either be an array of records, or a map with a
    /// `records` array (TOML documents cannot have an array at the top level).
    pub fn from_value<N: AsRef<str>>(name: N, value: Value) -> Result<Self, Error> {
        Self::new(name, records_from_value(value)?)
    }

    /// Load all of the records from the given source, in the order in which
    /// they are produced by the source.
    pub fn load<N: AsRef<str>>(name: N, source: &Source) -> Result<Self, Error> {
        let mut records = Vec::new();
        for value in source.iter()? {
            records.extend(records_from_value(value?)?);
        }
        let collection = Self::new(name, records)?;
        debug!(
            "Loaded {} record(s) into collection {} from {}",
            collection.len(),
            collection.name(),
            source
        );
        Ok(collection)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its ID.
    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn records_from_value(value: Value) -> Result<Vec<Record>, Error> {
    let value_type = value.get_type();
    let items = match value {
        Value::Array(items) => items,
        Value::Map(mut m) => match m.remove("records") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::NotARecordList(value_type)),
        },
        _ => return Err(Error::NotARecordList(value_type)),
    };
    items.into_iter().map(Record::try_from).collect()
}
