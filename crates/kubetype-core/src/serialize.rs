//! Text codec and typed-to-plain serialization
//!
//! Flattening a typed value goes through the codec's text form: the value
//! is dumped, then parsed back. The result holds nothing but plain
//! scalars, sequences and mappings, formatted the way the codec formats them.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::error::{KubetypeError, Result};

/// Text format used to parse and emit documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Yaml,
    Json,
    /// Indented JSON
    #[serde(rename = "json-pretty")]
    JsonPretty,
}

impl Codec {
    /// Parse text into a plain tree
    ///
    /// YAML is a superset of JSON, so the YAML codec accepts both.
    pub fn parse(&self, text: &str) -> Result<JsonValue> {
        match self {
            Self::Yaml => Ok(serde_yaml::from_str(text)?),
            Self::Json | Self::JsonPretty => Ok(serde_json::from_str(text)?),
        }
    }

    /// Emit a typed value or plain tree as text
    pub fn dump<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        match self {
            Self::Yaml => Ok(serde_yaml::to_string(value)?),
            Self::Json => Ok(serde_json::to_string(value)?),
            Self::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
        }
    }
}

impl FromStr for Codec {
    type Err = KubetypeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "json-pretty" => Ok(Self::JsonPretty),
            other => Err(KubetypeError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Flattens typed values through a codec
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer {
    codec: Codec,
}

impl Serializer {
    pub fn new(codec: Codec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Plain data tree with no typed wrappers left
    pub fn to_plain_data<T: Serialize + ?Sized>(&self, value: &T) -> Result<JsonValue> {
        let text = self.to_text(value)?;
        self.codec.parse(&text)
    }

    /// Text representation
    pub fn to_text<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        self.codec.dump(value)
    }
}
