//! Type-directed conversion
//!
//! Walks an untyped value tree alongside the registry's declared field
//! types and produces the typed mirror:
//!
//! - registered type: every input attribute must be declared by the type
//! - `Array<T>`: each element converted against `T`, order preserved
//! - `{ [key: string]: V; }`: same keys, each value converted against `V`
//! - `Date`: RFC 3339 strings become timestamps
//! - anything else: passed through untouched
//!
//! `null` is preserved as `null` whatever the declared type.

use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use crate::error::{KubetypeError, Result};
use crate::registry::{FieldType, SchemaRegistry};
use crate::suggestions::suggest_attribute;
use crate::typed::{Timestamp, TypedObject, TypedValue};

/// Location of a value inside the document being converted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Field(String),
    Index(usize),
}

impl FieldPath {
    fn push_field(&mut self, name: &str) {
        self.segments.push(PathSegment::Field(name.to_string()));
    }

    fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                // Map keys such as `app.kubernetes.io/name` contain dots
                PathSegment::Field(name) if name.contains('.') => write!(f, "[{:?}]", name)?,
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

/// Converts untyped values into registry-typed values
#[derive(Clone)]
pub struct Converter {
    registry: Arc<dyn SchemaRegistry>,
}

impl Converter {
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Convert `value` against a type string
    ///
    /// `type_name` may be a registered type, a container type string or a
    /// scalar name; container strings are parsed against the registry.
    pub fn convert(&self, type_name: &str, value: JsonValue) -> Result<TypedValue> {
        let field_type = self.registry.field_type(type_name)?;
        self.convert_field(&field_type, value, &mut FieldPath::default())
    }

    /// Convert `value` into an instance of a registered type
    pub fn convert_object(&self, type_name: &str, value: JsonValue) -> Result<TypedObject> {
        let field_type = FieldType::Object(type_name.to_string());
        let mut path = FieldPath::default();
        match self.convert_field(&field_type, value, &mut path)? {
            TypedValue::Object(obj) => Ok(obj),
            // Only a null document lands here
            _ => Err(KubetypeError::MissingConfiguration),
        }
    }

    fn convert_field(
        &self,
        field_type: &FieldType,
        value: JsonValue,
        path: &mut FieldPath,
    ) -> Result<TypedValue> {
        if value.is_null() {
            return Ok(TypedValue::Scalar(value));
        }

        match field_type {
            FieldType::Object(type_name) => self.convert_registered(type_name, value, path),
            FieldType::Array(element) => match value {
                JsonValue::Array(items) => {
                    let mut converted = Vec::with_capacity(items.len());
                    for (idx, item) in items.into_iter().enumerate() {
                        path.push_index(idx);
                        converted.push(self.convert_field(element, item, path)?);
                        path.pop();
                    }
                    Ok(TypedValue::Array(converted))
                }
                other => Err(mismatch(field_type, "a sequence", &other, path)),
            },
            FieldType::Map(entry) => match value {
                JsonValue::Object(map) => {
                    let mut converted = indexmap::IndexMap::with_capacity(map.len());
                    for (key, item) in map {
                        path.push_field(&key);
                        let item = self.convert_field(entry, item, path)?;
                        path.pop();
                        converted.insert(key, item);
                    }
                    Ok(TypedValue::Map(converted))
                }
                other => Err(mismatch(field_type, "a mapping", &other, path)),
            },
            FieldType::Scalar(_) if field_type.is_date() => Ok(convert_date(value, path)),
            FieldType::Scalar(_) => Ok(TypedValue::Scalar(value)),
        }
    }

    fn convert_registered(
        &self,
        type_name: &str,
        value: JsonValue,
        path: &mut FieldPath,
    ) -> Result<TypedValue> {
        let descriptor =
            self.registry
                .descriptor(type_name)
                .ok_or_else(|| KubetypeError::InvalidCatalog {
                    message: format!("type {} is referenced but not registered", type_name),
                })?;

        let map = match value {
            JsonValue::Object(map) => map,
            other => {
                return Err(mismatch(
                    &FieldType::Object(type_name.to_string()),
                    "a mapping",
                    &other,
                    path,
                ));
            }
        };

        let mut object = TypedObject::new(type_name);
        for (attribute, item) in map {
            let field_type =
                descriptor
                    .field(&attribute)
                    .ok_or_else(|| KubetypeError::UnknownAttribute {
                        suggestion: suggest_attribute(
                            &attribute,
                            type_name,
                            descriptor.attribute_names(),
                        ),
                        attribute: attribute.clone(),
                        type_name: type_name.to_string(),
                        path: path.to_string(),
                    })?;

            path.push_field(&attribute);
            let converted = self.convert_field(field_type, item, path)?;
            path.pop();
            object.set(attribute, converted);
        }

        Ok(TypedValue::Object(object))
    }
}

fn convert_date(value: JsonValue, path: &FieldPath) -> TypedValue {
    if let Some(text) = value.as_str().filter(|s| !s.trim().is_empty()) {
        match Timestamp::parse(text) {
            Ok(date) => return TypedValue::Date(date),
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "date left as scalar");
            }
        }
    }
    TypedValue::Scalar(value)
}

fn mismatch(
    field_type: &FieldType,
    expected: &'static str,
    found: &JsonValue,
    path: &FieldPath,
) -> KubetypeError {
    KubetypeError::TypeMismatch {
        type_name: field_type.to_string(),
        expected,
        found: describe(found),
        path: path.to_string(),
    }
}

fn describe(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a sequence",
        JsonValue::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn converter() -> Converter {
        Converter::new(Arc::new(Catalog::builtin().unwrap()))
    }

    #[test]
    fn test_convert_registered_object() {
        let obj = converter()
            .convert_object(
                "V1Pod",
                json!({"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "x"}}),
            )
            .unwrap();

        assert_eq!(obj.type_name(), "V1Pod");
        assert_eq!(obj.get("metadata").and_then(TypedValue::type_name), Some("V1ObjectMeta"));
        assert_eq!(obj.get_path("metadata.name").and_then(TypedValue::as_str), Some("x"));
    }

    #[test]
    fn test_convert_array_of_objects() {
        let spec = converter()
            .convert_object(
                "V1PodSpec",
                json!({"containers": [
                    {"name": "web", "image": "nginx", "ports": [{"containerPort": 80}]},
                    {"name": "sidecar", "image": "envoy"}
                ]}),
            )
            .unwrap();

        let containers = spec.get("containers").and_then(TypedValue::as_array).unwrap();
        assert_eq!(containers.len(), 2);
        assert!(containers.iter().all(|c| c.type_name() == Some("V1Container")));

        let first = containers[0].as_object().unwrap();
        assert_eq!(first.get("name").and_then(TypedValue::as_str), Some("web"));
        let ports = first.get("ports").and_then(TypedValue::as_array).unwrap();
        assert_eq!(ports[0].type_name(), Some("V1ContainerPort"));
        assert_eq!(
            ports[0].as_object().unwrap().get("containerPort"),
            Some(&TypedValue::Scalar(json!(80)))
        );
    }

    #[test]
    fn test_convert_string_map() {
        let value = converter()
            .convert("{ [key: string]: string; }", json!({"app": "web", "tier": "frontend"}))
            .unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["app"], TypedValue::Scalar(json!("web")));
        assert_eq!(map["tier"], TypedValue::Scalar(json!("frontend")));
    }

    #[test]
    fn test_convert_container_type_string() {
        let value = converter()
            .convert("Array<V1EnvVar>", json!([{"name": "A", "value": "1"}]))
            .unwrap();
        assert_eq!(value.as_array().unwrap()[0].type_name(), Some("V1EnvVar"));
    }

    #[test]
    fn test_scalars_pass_through() {
        let conv = converter();
        assert_eq!(conv.convert("string", json!(42)).unwrap(), TypedValue::Scalar(json!(42)));
        assert_eq!(conv.convert("number", json!("3")).unwrap(), TypedValue::Scalar(json!("3")));
        assert_eq!(
            conv.convert("IntOrString", json!("50%")).unwrap(),
            TypedValue::Scalar(json!("50%"))
        );
    }

    #[test]
    fn test_convert_date() {
        let meta = converter()
            .convert_object(
                "V1ObjectMeta",
                json!({"creationTimestamp": "2024-03-01T12:00:00Z", "deletionTimestamp": ""}),
            )
            .unwrap();

        assert_eq!(
            meta.get("creationTimestamp")
                .and_then(TypedValue::as_date)
                .map(Timestamp::to_utc),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(meta.get("deletionTimestamp"), Some(&TypedValue::Scalar(json!(""))));
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        let value = converter().convert("Date", json!("yesterday")).unwrap();
        assert_eq!(value, TypedValue::Scalar(json!("yesterday")));
    }

    #[test]
    fn test_null_preserved() {
        let meta = converter()
            .convert_object("V1ObjectMeta", json!({"creationTimestamp": null, "labels": null}))
            .unwrap();
        assert_eq!(meta.get("creationTimestamp"), Some(&TypedValue::Scalar(JsonValue::Null)));
        assert_eq!(meta.get("labels"), Some(&TypedValue::Scalar(JsonValue::Null)));
    }

    #[test]
    fn test_unknown_attribute() {
        let err = converter()
            .convert_object("V1Pod", json!({"kind": "Pod", "spec": {"containres": []}}))
            .unwrap_err();

        match err {
            KubetypeError::UnknownAttribute {
                attribute,
                type_name,
                path,
                suggestion,
            } => {
                assert_eq!(attribute, "containres");
                assert_eq!(type_name, "V1PodSpec");
                assert_eq!(path, "spec");
                assert_eq!(suggestion.as_deref(), Some("Did you mean `containers`?"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatch_reports_path() {
        let err = converter()
            .convert_object(
                "V1PodSpec",
                json!({"containers": [{"name": "a"}, {"name": "b", "ports": "80"}]}),
            )
            .unwrap_err();

        match err {
            KubetypeError::TypeMismatch { type_name, expected, found, path } => {
                assert_eq!(type_name, "Array<V1ContainerPort>");
                assert_eq!(expected, "a sequence");
                assert_eq!(found, "a string");
                assert_eq!(path, "containers[1].ports");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_map_key_path_with_dots() {
        let err = converter()
            .convert("{ [key: string]: V1KeyToPath; }", json!({"app.kubernetes.io/name": "x"}))
            .unwrap_err();
        match err {
            KubetypeError::TypeMismatch { path, .. } => {
                assert_eq!(path, r#"["app.kubernetes.io/name"]"#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_type_string() {
        let err = converter().convert("Array<V1Container", json!([])).unwrap_err();
        assert!(matches!(err, KubetypeError::MalformedType { .. }));
    }

    #[test]
    fn test_input_order_preserved() {
        let obj = converter()
            .convert_object("V1ConfigMap", json!({"metadata": {}, "kind": "ConfigMap", "apiVersion": "v1"}))
            .unwrap();
        let names: Vec<&str> = obj.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["metadata", "kind", "apiVersion"]);
    }
}
