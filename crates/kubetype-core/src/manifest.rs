//! Manifest conversion entry points
//!
//! Ties header resolution and conversion together: a raw document is
//! checked for `apiVersion` and `kind`, its header is resolved to a
//! registered type name, and the whole document is converted against that
//! type.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::convert::Converter;
use crate::error::{KubetypeError, Result};
use crate::registry::SchemaRegistry;
use crate::resolver::{CandidatePattern, TypeNameResolver};
use crate::serialize::{Codec, Serializer};
use crate::typed::TypedObject;

/// Field used when `apiVersion` is absent (API discovery documents)
const GROUP_VERSION_FIELD: &str = "groupVersion";

/// Anything a manifest can be built from
#[derive(Debug, Clone)]
pub enum ManifestInput {
    /// YAML or JSON text
    Text(String),
    /// Already-parsed plain tree
    Plain(JsonValue),
    /// Already converted; returned unchanged
    Typed(TypedObject),
}

impl From<&str> for ManifestInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ManifestInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<JsonValue> for ManifestInput {
    fn from(value: JsonValue) -> Self {
        Self::Plain(value)
    }
}

impl From<TypedObject> for ManifestInput {
    fn from(obj: TypedObject) -> Self {
        Self::Typed(obj)
    }
}

/// Converts manifests into typed objects and back
///
/// Cheap to share across threads behind an `Arc`; the kind index is built
/// once on first use.
///
/// ```
/// use std::sync::Arc;
/// use kubetype_core::{Catalog, ManifestConverter};
///
/// let converter = ManifestConverter::new(Arc::new(Catalog::builtin().unwrap()));
/// let pod = converter
///     .convert_input("apiVersion: v1\nkind: pod\nmetadata:\n  name: web\n")
///     .unwrap();
/// assert_eq!(pod.type_name(), "V1Pod");
/// ```
pub struct ManifestConverter {
    resolver: TypeNameResolver,
    converter: Converter,
    serializer: Serializer,
}

impl ManifestConverter {
    /// Converter with the default candidate order and YAML codec
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self::with_options(registry, CandidatePattern::defaults(), Codec::Yaml)
    }

    /// Converter with custom candidate patterns and codec
    pub fn with_options(
        registry: Arc<dyn SchemaRegistry>,
        patterns: Vec<CandidatePattern>,
        codec: Codec,
    ) -> Self {
        Self {
            resolver: TypeNameResolver::with_patterns(registry.clone(), patterns),
            converter: Converter::new(registry),
            serializer: Serializer::new(codec),
        }
    }

    /// Convert text, a plain tree, or pass through an already typed object
    pub fn convert_input(&self, input: impl Into<ManifestInput>) -> Result<TypedObject> {
        match input.into() {
            ManifestInput::Typed(obj) => Ok(obj),
            ManifestInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(KubetypeError::MissingConfiguration);
                }
                let value = self.serializer.codec().parse(&text)?;
                self.convert_value(value)
            }
            ManifestInput::Plain(value) => self.convert_value(value),
        }
    }

    /// Convert an already-parsed document
    pub fn convert_value(&self, mut value: JsonValue) -> Result<TypedObject> {
        let doc = match value.as_object_mut() {
            Some(doc) if !doc.is_empty() => doc,
            _ => return Err(KubetypeError::MissingConfiguration),
        };

        if !has_text(doc.get("apiVersion")) {
            match doc.get(GROUP_VERSION_FIELD).filter(|v| has_text(Some(*v))).cloned() {
                Some(group_version) => {
                    doc.insert("apiVersion".to_string(), group_version);
                }
                None => return Err(KubetypeError::MissingApiVersion),
            }
        }
        if !has_text(doc.get("kind")) {
            return Err(KubetypeError::MissingKind);
        }

        let api_version = doc.get("apiVersion").and_then(JsonValue::as_str).unwrap_or_default();
        let kind = doc.get("kind").and_then(JsonValue::as_str).unwrap_or_default();
        let type_name = self.resolver.resolve(api_version, kind)?;

        tracing::debug!(api_version, kind, type_name = %type_name, "converting manifest");
        self.converter.convert_object(&type_name, value)
    }

    /// Convert every document of a multi-document YAML stream
    ///
    /// Empty documents (a bare `---`) are skipped. Conversion stops at the
    /// first failing document.
    pub fn convert_multi_document(&self, text: &str) -> Result<Vec<TypedObject>> {
        parse_documents(text)?
            .into_iter()
            .map(|value| self.convert_value(value))
            .collect()
    }

    /// Resolve a manifest header to its registered type name
    pub fn resolve_type_name(&self, api_version: &str, kind: &str) -> Result<String> {
        self.resolver.resolve(api_version, kind)
    }

    /// Plain data tree for a typed object
    pub fn to_plain_data(&self, obj: &TypedObject) -> Result<JsonValue> {
        self.serializer.to_plain_data(obj)
    }

    /// Text for a typed object, in the configured codec
    pub fn to_text(&self, obj: &TypedObject) -> Result<String> {
        self.serializer.to_text(obj)
    }

    pub fn resolver(&self) -> &TypeNameResolver {
        &self.resolver
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }
}

/// Split a YAML stream into its non-empty documents
///
/// A syntax error anywhere in the stream fails the whole split.
pub fn parse_documents(text: &str) -> Result<Vec<JsonValue>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = JsonValue::deserialize(document)?;
        if !is_empty_document(&value) {
            documents.push(value);
        }
    }
    Ok(documents)
}

fn has_text(value: Option<&JsonValue>) -> bool {
    value.and_then(JsonValue::as_str).is_some_and(|s| !s.is_empty())
}

fn is_empty_document(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}
