//! Schema registry interface
//!
//! A registry is a catalog of type names, each with an attribute-name to
//! field-type map. Field types arrive as strings in the Kubernetes client
//! notation (`string`, `V1ObjectMeta`, `Array<V1Container>`,
//! `{ [key: string]: string; }`) and are parsed once into [`FieldType`].

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{KubetypeError, Result};

static MAP_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\s*\[key:\s*\w+\]:\s*(.+?);?\s*\}$").expect("map type pattern is valid")
});

/// Declared type of one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Pass-through value (`string`, `number`, `boolean`, `Date`, `any`, ...)
    Scalar(String),
    /// Another registered type
    Object(String),
    /// `Array<T>`
    Array(Box<FieldType>),
    /// `{ [key: string]: V; }`
    Map(Box<FieldType>),
}

impl FieldType {
    /// Parse a field type string
    ///
    /// `is_registered` decides whether a bare name refers to a registered
    /// type or to a scalar. Registered names win over container syntax, the
    /// same precedence the registry lookup has at conversion time.
    pub fn parse(raw: &str, is_registered: &dyn Fn(&str) -> bool) -> Result<Self> {
        let raw = raw.trim();

        if is_registered(raw) {
            return Ok(Self::Object(raw.to_string()));
        }

        // Classify by the outer shape; the element type may itself be a container
        if raw.starts_with("Array") {
            let inner = raw
                .strip_prefix("Array<")
                .and_then(|rest| rest.strip_suffix('>'))
                .filter(|inner| !inner.trim().is_empty())
                .ok_or_else(|| KubetypeError::MalformedType {
                    type_name: raw.to_string(),
                })?;
            return Ok(Self::Array(Box::new(Self::parse(inner, is_registered)?)));
        }

        if raw.starts_with('{') {
            let inner = MAP_TYPE
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .ok_or_else(|| KubetypeError::MalformedType {
                    type_name: raw.to_string(),
                })?;
            return Ok(Self::Map(Box::new(Self::parse(inner, is_registered)?)));
        }

        Ok(Self::Scalar(raw.to_string()))
    }

    /// Whether this is the `Date` scalar
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Scalar(name) if name.eq_ignore_ascii_case("date"))
    }

    /// Name of the registered type this field ultimately holds, if any
    pub fn object_name(&self) -> Option<&str> {
        match self {
            Self::Object(name) => Some(name.as_str()),
            Self::Array(inner) | Self::Map(inner) => inner.object_name(),
            Self::Scalar(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) | Self::Object(name) => write!(f, "{}", name),
            Self::Array(inner) => write!(f, "Array<{}>", inner),
            Self::Map(inner) => write!(f, "{{ [key: string]: {}; }}", inner),
        }
    }
}

/// A registered type and its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Exact registry key (e.g. `V1Pod`)
    pub name: String,
    /// Attribute name to declared type, in declaration order
    pub fields: IndexMap<String, FieldType>,
}

impl TypeDescriptor {
    /// Declared type of an attribute
    pub fn field(&self, attribute: &str) -> Option<&FieldType> {
        self.fields.get(attribute)
    }

    /// Attribute names in declaration order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Read-only access to a catalog of registered types
///
/// Implementations must be immutable once constructed; resolvers cache
/// data derived from [`SchemaRegistry::type_names`].
pub trait SchemaRegistry: Send + Sync {
    /// Look up a type by exact name
    fn descriptor(&self, name: &str) -> Option<&TypeDescriptor>;

    /// Every registered type name
    fn type_names(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Whether `name` is a registered type
    fn has_type(&self, name: &str) -> bool {
        self.descriptor(name).is_some()
    }

    /// Attribute map of a registered type
    fn attribute_type_map(&self, name: &str) -> Option<&IndexMap<String, FieldType>> {
        self.descriptor(name).map(|d| &d.fields)
    }

    /// Parse a type string against this registry
    fn field_type(&self, raw: &str) -> Result<FieldType> {
        FieldType::parse(raw, &|name: &str| self.has_type(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(name: &str) -> bool {
        matches!(name, "V1Container" | "V1ObjectMeta")
    }

    #[test]
    fn test_parse_scalar_and_object() {
        assert_eq!(
            FieldType::parse("string", &registered).unwrap(),
            FieldType::Scalar("string".to_string())
        );
        assert_eq!(
            FieldType::parse("V1ObjectMeta", &registered).unwrap(),
            FieldType::Object("V1ObjectMeta".to_string())
        );
    }

    #[test]
    fn test_parse_array() {
        let parsed = FieldType::parse("Array<V1Container>", &registered).unwrap();
        assert_eq!(
            parsed,
            FieldType::Array(Box::new(FieldType::Object("V1Container".to_string())))
        );
        assert_eq!(parsed.object_name(), Some("V1Container"));
    }

    #[test]
    fn test_parse_nested_array() {
        let parsed = FieldType::parse("Array<Array<string>>", &registered).unwrap();
        assert_eq!(parsed.to_string(), "Array<Array<string>>");
    }

    #[test]
    fn test_parse_map() {
        let parsed = FieldType::parse("{ [key: string]: string; }", &registered).unwrap();
        assert_eq!(
            parsed,
            FieldType::Map(Box::new(FieldType::Scalar("string".to_string())))
        );

        let parsed = FieldType::parse("{ [key: string]: Array<V1Container>; }", &registered).unwrap();
        assert_eq!(parsed.object_name(), Some("V1Container"));
    }

    #[test]
    fn test_parse_map_of_arrays() {
        let parsed = FieldType::parse("{ [key: string]: Array<string>; }", &registered).unwrap();
        assert_eq!(
            parsed,
            FieldType::Map(Box::new(FieldType::Array(Box::new(FieldType::Scalar(
                "string".to_string()
            )))))
        );
        assert_eq!(parsed.to_string(), "{ [key: string]: Array<string>; }");
    }

    #[test]
    fn test_parse_array_of_maps() {
        let parsed = FieldType::parse("Array<{ [key: string]: V1ObjectMeta; }>", &registered).unwrap();
        assert_eq!(
            parsed,
            FieldType::Array(Box::new(FieldType::Map(Box::new(FieldType::Object(
                "V1ObjectMeta".to_string()
            )))))
        );
    }

    #[test]
    fn test_parse_nested_map() {
        let raw = "{ [key: string]: { [key: string]: number; }; }";
        let parsed = FieldType::parse(raw, &registered).unwrap();
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn test_parse_malformed() {
        for raw in ["Array<V1Container", "Array", "Array<>", "{ key: string }"] {
            let err = FieldType::parse(raw, &registered).unwrap_err();
            assert!(
                matches!(err, KubetypeError::MalformedType { ref type_name } if type_name == raw),
                "{raw} should be malformed"
            );
        }
    }

    #[test]
    fn test_is_date() {
        assert!(FieldType::Scalar("Date".to_string()).is_date());
        assert!(FieldType::Scalar("date".to_string()).is_date());
        assert!(!FieldType::Scalar("string".to_string()).is_date());
        assert!(!FieldType::Object("Date".to_string()).is_date());
    }
}
