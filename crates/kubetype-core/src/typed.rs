//! Typed mirror of a manifest
//!
//! A [`TypedObject`] is an instance of a registered type: it remembers its
//! type name and holds only attributes that type declares. Serializing a
//! typed value produces the plain tree the codec expects, so dates are
//! written back exactly as they were read and type names are not emitted.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

/// A `Date` value that keeps the text it was parsed from
///
/// The offset and fractional-second precision of the source survive a
/// round trip; only dates built in code get a normalized rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    value: DateTime<FixedOffset>,
    text: String,
}

impl Timestamp {
    /// Parse an RFC 3339 timestamp, keeping `text` verbatim
    pub fn parse(text: &str) -> std::result::Result<Self, chrono::ParseError> {
        let value = DateTime::parse_from_rfc3339(text.trim())?;
        Ok(Self {
            value,
            text: text.to_string(),
        })
    }

    /// The instant, in the offset it was written with
    pub fn value(&self) -> &DateTime<FixedOffset> {
        &self.value
    }

    /// The instant in UTC
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.value.with_timezone(&Utc)
    }

    /// Text written back on serialization
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self {
            text: value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            value,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        value.fixed_offset().into()
    }
}

/// A converted value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Instance of a registered type
    Object(TypedObject),
    /// `Array<T>` elements, in input order
    Array(Vec<TypedValue>),
    /// `{ [key: string]: V; }` entries, in input order
    Map(IndexMap<String, TypedValue>),
    /// Parsed `Date` scalar
    Date(Timestamp),
    /// Pass-through scalar (or `null`)
    Scalar(JsonValue),
}

impl TypedValue {
    /// The object, if this value is one
    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Consume into the object, if this value is one
    pub fn into_object(self) -> Option<TypedObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The elements, if this value is an array
    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this value is a map
    pub fn as_map(&self) -> Option<&IndexMap<String, TypedValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// The timestamp, if this value is a date
    pub fn as_date(&self) -> Option<&Timestamp> {
        match self {
            Self::Date(date) => Some(date),
            _ => None,
        }
    }

    /// The raw scalar, if this value is one
    pub fn as_scalar(&self) -> Option<&JsonValue> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The string, if this value is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(JsonValue::as_str)
    }

    /// Registered type name of this value, if it is an object
    pub fn type_name(&self) -> Option<&str> {
        self.as_object().map(TypedObject::type_name)
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Object(obj) => obj.serialize(serializer),
            Self::Array(items) => items.serialize(serializer),
            Self::Map(entries) => entries.serialize(serializer),
            Self::Date(date) => serializer.serialize_str(date.as_str()),
            Self::Scalar(value) => value.serialize(serializer),
        }
    }
}

/// Instance of a registered type
#[derive(Debug, Clone, PartialEq)]
pub struct TypedObject {
    type_name: String,
    fields: IndexMap<String, TypedValue>,
}

impl TypedObject {
    /// Empty instance of `type_name`
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Registered type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Get an attribute
    pub fn get(&self, attribute: &str) -> Option<&TypedValue> {
        self.fields.get(attribute)
    }

    /// Follow a dotted attribute path through nested objects and maps
    ///
    /// ```
    /// use kubetype_core::{TypedObject, TypedValue};
    ///
    /// let mut meta = TypedObject::new("V1ObjectMeta");
    /// meta.set("name", TypedValue::Scalar("web".into()));
    /// let mut pod = TypedObject::new("V1Pod");
    /// pod.set("metadata", TypedValue::Object(meta));
    ///
    /// assert_eq!(pod.get_path("metadata.name").and_then(TypedValue::as_str), Some("web"));
    /// ```
    pub fn get_path(&self, path: &str) -> Option<&TypedValue> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = match current {
                TypedValue::Object(obj) => obj.get(part)?,
                TypedValue::Map(entries) => entries.get(part)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Assign an attribute, replacing any previous value
    pub fn set(&mut self, attribute: impl Into<String>, value: TypedValue) {
        self.fields.insert(attribute.into(), value);
    }

    /// Attributes in assignment order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of assigned attributes
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no attribute is assigned
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for TypedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
