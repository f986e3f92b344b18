use std::{collections::BTreeMap, ffi::OsStr, fs, path::Path, str::FromStr};

use serde::{
    de::DeserializeOwned,
    ser::{SerializeMap, SerializeSeq},
    Serialize,
};
use serde_json::{Number as JsonNumber, Value as JsonValue};
use serde_yaml::{Number as YamlNumber, Value as YamlValue};
use toml::{value::Datetime as TomlDateTime, Value as TomlValue};

use crate::{Date, DateTime, Error};

/// We use [`std::collections::BTreeMap`] as our default map structure.
pub type Map<K, V> = BTreeMap<K, V>;

/// Describes the type of a [`Value`], mainly for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// For values whose type cannot be determined (e.g. `null`).
    Unknown,
    Bool,
    Signed,
    Unsigned,
    Float,
    String,
    Date,
    DateTime,
    /// An array whose element type is guessed from its first element.
    Array(Box<ValueType>),
    Map,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Bool => write!(f, "Bool"),
            Self::Signed => write!(f, "Int"),
            Self::Unsigned => write!(f, "Uint"),
            Self::Float => write!(f, "Float"),
            Self::String => write!(f, "String"),
            Self::Date => write!(f, "Date"),
            Self::DateTime => write!(f, "DateTime"),
            Self::Array(t) => write!(f, "Array<{}>", t),
            Self::Map => write!(f, "Map"),
        }
    }
}

/// The supported file formats from which we can load [`Value`] instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportedFormat {
    Json,
    Yaml,
    Toml,
}

impl FromStr for SupportedFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Ok(match lower.as_ref() {
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "toml" => Self::Toml,
            _ => return Err(Error::UnsupportedFileType(s.to_string())),
        })
    }
}

impl SupportedFormat {
    /// Determine the format of the given file from its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::CannotDetermineFileType(path.to_path_buf()))?;
        Self::from_str(ext)
    }

    /// Deserialize a strongly typed structure from content in this format.
    pub fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T, Error> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        })
    }
}

/// A dynamically typed field value, loaded from loosely typed sources like
/// JSON, YAML or TOML files.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Date(Date),
    DateTime(DateTime),
    Array(Vec<Value>),
    Map(Map<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl Value {
    /// Attempts to create a new value by parsing it from a string using the
    /// given format.
    pub fn load_as(fmt: SupportedFormat, content: &str) -> Result<Self, Error> {
        match fmt {
            SupportedFormat::Json => Self::try_from(serde_json::from_str::<JsonValue>(content)?),
            SupportedFormat::Yaml => Self::try_from(serde_yaml::from_str::<YamlValue>(content)?),
            SupportedFormat::Toml => Self::try_from(toml::from_str::<TomlValue>(content)?),
        }
    }

    /// Attempts to create a new value by loading it from the given file.
    /// Automatically detects the file format and parses/converts it
    /// accordingly.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let fmt = SupportedFormat::from_path(path)
            .map_err(|e| Error::LoadFromFile(path.to_path_buf(), Box::new(e)))?;
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("while trying to read from {}", path.display()), e))?;
        Self::load_as(fmt, &content).map_err(|e| Error::LoadFromFile(path.to_path_buf(), Box::new(e)))
    }

    /// Best-effort guess at the type of this value.
    pub fn get_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Unknown,
            Self::Bool(_) => ValueType::Bool,
            Self::Signed(_) => ValueType::Signed,
            Self::Unsigned(_) => ValueType::Unsigned,
            Self::Float(_) => ValueType::Float,
            Self::String(_) => ValueType::String,
            Self::Date(_) => ValueType::Date,
            Self::DateTime(_) => ValueType::DateTime,
            Self::Array(inner) => ValueType::Array(Box::new(
                inner.first().map(Self::get_type).unwrap_or(ValueType::Unknown),
            )),
            Self::Map(_) => ValueType::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self {
            Self::Signed(i) => Some(*i),
            Self::Unsigned(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Unsigned(u) => Some(*u),
            Self::Signed(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Any numeric value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Signed(i) => Some(*i as f64),
            Self::Unsigned(u) => Some(*u as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Interprets this value as a point in time.
    ///
    /// Dates are taken as midnight UTC. Strings are parsed as a date/time
    /// first and then as a plain date, since most of our data sources have no
    /// native date type.
    pub fn as_date_time(&self) -> Option<DateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::Date(d) => Some(d.start_of_day()),
            Self::String(s) => DateTime::from_str(s)
                .ok()
                .or_else(|| Date::from_str(s).ok().map(|d| d.start_of_day())),
            _ => None,
        }
    }

    /// The textual form of a scalar value, as it would be shown to a user.
    /// Returns `None` for null values, arrays and maps.
    pub fn display_string(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Signed(i) => Some(i.to_string()),
            Self::Unsigned(u) => Some(u.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Date(d) => Some(d.to_string()),
            Self::DateTime(dt) => Some(dt.to_string()),
            Self::Null | Self::Array(_) | Self::Map(_) => None,
        }
    }

    /// Whether any scalar inside this value contains `needle` when compared
    /// case-insensitively. `needle` must already be lowercase.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            Self::Array(arr) => arr.iter().any(|v| v.contains_lowercase(needle)),
            Self::Map(m) => m.values().any(|v| v.contains_lowercase(needle)),
            Self::String(s) => s.to_lowercase().contains(needle),
            other => other
                .display_string()
                .map(|s| s.to_lowercase().contains(needle))
                .unwrap_or(false),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Signed(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Unsigned(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime> for Value {
    fn from(dt: DateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Signed(i) => serializer.serialize_i64(*i),
            Value::Unsigned(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => d.serialize(serializer),
            Value::DateTime(dt) => dt.serialize(serializer),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for el in arr {
                    seq.serialize_element(el)?;
                }
                seq.end()
            }
            Value::Map(m) => {
                let mut sm = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    sm.serialize_entry(k, v)?;
                }
                sm.end()
            }
        }
    }
}

impl TryFrom<JsonValue> for Value {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Ok(match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::from(n),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(arr) => Self::Array(
                arr.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<Self>, Error>>()?,
            ),
            JsonValue::Object(obj) => Self::Map(
                obj.into_iter()
                    .map(|(k, v)| Ok((k, v.try_into()?)))
                    .collect::<Result<Map<String, Self>, Error>>()?,
            ),
        })
    }
}

impl From<JsonNumber> for Value {
    fn from(value: JsonNumber) -> Self {
        if let Some(u) = value.as_u64() {
            Self::Unsigned(u)
        } else if let Some(i) = value.as_i64() {
            Self::Signed(i)
        } else {
            Self::Float(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl TryFrom<YamlValue> for Value {
    type Error = Error;

    fn try_from(value: YamlValue) -> Result<Self, Self::Error> {
        Ok(match value {
            YamlValue::Null => Self::Null,
            YamlValue::Bool(b) => Self::Bool(b),
            YamlValue::Number(n) => Self::from(n),
            YamlValue::String(s) => Self::String(s),
            YamlValue::Sequence(seq) => Self::Array(
                seq.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<Self>, Error>>()?,
            ),
            YamlValue::Mapping(m) => Self::Map(
                m.into_iter()
                    .map(|(k, v)| match k {
                        YamlValue::String(k) => Ok((k, v.try_into()?)),
                        _ => Err(Error::ObjectKeysMustBeStrings),
                    })
                    .collect::<Result<Map<String, Self>, Error>>()?,
            ),
        })
    }
}

impl From<YamlNumber> for Value {
    fn from(value: YamlNumber) -> Self {
        if let Some(u) = value.as_u64() {
            Self::Unsigned(u)
        } else if let Some(i) = value.as_i64() {
            Self::Signed(i)
        } else {
            Self::Float(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl TryFrom<TomlValue> for Value {
    type Error = Error;

    fn try_from(value: TomlValue) -> Result<Self, Self::Error> {
        Ok(match value {
            TomlValue::String(s) => Self::String(s),
            TomlValue::Integer(i) => Self::Signed(i),
            TomlValue::Float(f) => Self::Float(f),
            TomlValue::Boolean(b) => Self::Bool(b),
            TomlValue::Datetime(dt) => Self::try_from(dt)?,
            TomlValue::Array(arr) => Self::Array(
                arr.into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<Self>, Error>>()?,
            ),
            TomlValue::Table(t) => Self::Map(
                t.into_iter()
                    .map(|(k, v)| Ok((k, Self::try_from(v)?)))
                    .collect::<Result<Map<String, Self>, Error>>()?,
            ),
        })
    }
}

impl TryFrom<TomlDateTime> for Value {
    type Error = Error;

    fn try_from(value: TomlDateTime) -> Result<Self, Self::Error> {
        let s = value.to_string();
        Ok(match DateTime::from_str(&s) {
            Ok(dt) => Self::DateTime(dt),
            Err(_) => Self::Date(Date::from_str(&s)?),
        })
    }
}
