//! Runtime-loaded schema catalog
//!
//! The catalog format is a mapping of type name to attribute map, where each
//! attribute maps to a field type string:
//!
//! ```yaml
//! V1Pod:
//!   apiVersion: string
//!   kind: string
//!   metadata: V1ObjectMeta
//!   spec: V1PodSpec
//! V1PodSpec:
//!   containers: Array<V1Container>
//!   nodeSelector: "{ [key: string]: string; }"
//! ```
//!
//! A bundled catalog covering the common Kubernetes workload types is
//! available through [`Catalog::builtin`].

use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{KubetypeError, Result};
use crate::registry::{FieldType, SchemaRegistry, TypeDescriptor};

const BUILTIN_CATALOG: &str = include_str!("../catalog/kubernetes.yaml");

/// Raw catalog as written on disk
type RawCatalog = IndexMap<String, Option<IndexMap<String, String>>>;

/// Schema registry backed by an in-memory table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: IndexMap<String, TypeDescriptor>,
}

impl Catalog {
    /// Load the bundled Kubernetes catalog
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Load a catalog from a file, JSON when the extension is `.json`, YAML otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse a catalog from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawCatalog = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw)
    }

    /// Parse a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Build a catalog from `(type name, [(attribute, field type string)])` entries
    pub fn from_entries<I, A, N, F>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, A)>,
        A: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: Into<String>,
    {
        let raw: RawCatalog = entries
            .into_iter()
            .map(|(name, attrs)| {
                let attrs = attrs
                    .into_iter()
                    .map(|(attr, ty)| (attr.into(), ty.into()))
                    .collect();
                (name.into(), Some(attrs))
            })
            .collect();
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawCatalog) -> Result<Self> {
        // Every name must be known before bare field types can be classified
        let names: HashSet<String> = raw.keys().map(|k| k.trim().to_string()).collect();
        let is_registered = |name: &str| names.contains(name);

        let mut types = IndexMap::with_capacity(raw.len());
        for (name, attrs) in &raw {
            let name = name.trim();
            if name.is_empty() {
                return Err(KubetypeError::InvalidCatalog {
                    message: "type names must not be empty".to_string(),
                });
            }

            let mut fields = IndexMap::new();
            for (attribute, raw_type) in attrs.iter().flatten() {
                if raw_type.trim().is_empty() {
                    return Err(KubetypeError::InvalidCatalog {
                        message: format!("attribute `{}` of {} has no type", attribute, name),
                    });
                }
                fields.insert(
                    attribute.clone(),
                    FieldType::parse(raw_type, &is_registered)?,
                );
            }

            types.insert(
                name.to_string(),
                TypeDescriptor {
                    name: name.to_string(),
                    fields,
                },
            );
        }

        tracing::debug!(types = types.len(), "loaded schema catalog");
        Ok(Self { types })
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog has no types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl SchemaRegistry for Catalog {
    fn descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    fn type_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.types.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_yaml_classifies_objects() {
        let catalog = Catalog::from_yaml(
            r#"
V1Pod:
  metadata: V1ObjectMeta
  spec: V1PodSpec
V1ObjectMeta:
  name: string
  labels: "{ [key: string]: string; }"
"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let pod = catalog.descriptor("V1Pod").unwrap();
        assert_eq!(
            pod.field("metadata"),
            Some(&FieldType::Object("V1ObjectMeta".to_string()))
        );
        // Not registered, so treated as a pass-through scalar
        assert_eq!(
            pod.field("spec"),
            Some(&FieldType::Scalar("V1PodSpec".to_string()))
        );
    }

    #[test]
    fn test_type_without_attributes() {
        let catalog = Catalog::from_yaml("V1Status:\nV1Empty: {}\n").unwrap();
        assert!(catalog.has_type("V1Status"));
        assert!(catalog.attribute_type_map("V1Empty").unwrap().is_empty());
    }

    #[test]
    fn test_from_json() {
        let catalog =
            Catalog::from_json(r#"{"V1ConfigMap": {"data": "{ [key: string]: string; }"}}"#)
                .unwrap();
        assert!(catalog.has_type("V1ConfigMap"));
    }

    #[test]
    fn test_from_entries() {
        let catalog = Catalog::from_entries([
            ("V1Pod", vec![("spec", "V1PodSpec")]),
            ("V1PodSpec", vec![("containers", "Array<string>")]),
        ])
        .unwrap();
        assert_eq!(
            catalog.descriptor("V1Pod").unwrap().field("spec"),
            Some(&FieldType::Object("V1PodSpec".to_string()))
        );
    }

    #[test]
    fn test_map_of_arrays_field_type() {
        let catalog =
            Catalog::from_yaml("V1Thing:\n  groups: \"{ [key: string]: Array<string>; }\"\n").unwrap();
        let groups = catalog.descriptor("V1Thing").and_then(|d| d.field("groups")).unwrap();
        assert!(matches!(groups, FieldType::Map(inner) if matches!(**inner, FieldType::Array(_))));
    }

    #[test]
    fn test_malformed_field_type() {
        let err = Catalog::from_yaml("V1Pod:\n  containers: Array<V1Container\n").unwrap_err();
        assert!(matches!(err, KubetypeError::MalformedType { .. }));
    }

    #[test]
    fn test_empty_field_type() {
        let err = Catalog::from_yaml("V1Pod:\n  name: ''\n").unwrap_err();
        assert!(matches!(err, KubetypeError::InvalidCatalog { .. }));
    }

    #[test]
    fn test_not_a_mapping() {
        let err = Catalog::from_yaml("- V1Pod\n- V1Service\n").unwrap_err();
        assert!(matches!(err, KubetypeError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"V1Namespace": {{"kind": "string"}}}}"#).unwrap();
        let catalog = Catalog::from_file(file.path()).unwrap();
        assert!(catalog.has_type("V1Namespace"));
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.has_type("V1Pod"));
        assert!(catalog.has_type("CoreV1Event"));
        assert!(catalog.has_type("EventsV1Event"));

        // Anything not registered must be one of the known scalar names
        let scalars = ["string", "number", "boolean", "Date", "IntOrString", "any"];
        for name in catalog.type_names() {
            for field in catalog.attribute_type_map(name).unwrap().values() {
                let mut leaf = field;
                while let FieldType::Array(inner) | FieldType::Map(inner) = leaf {
                    leaf = inner.as_ref();
                }
                if let FieldType::Scalar(scalar) = leaf {
                    assert!(scalars.contains(&scalar.as_str()), "{name} has unknown type {scalar}");
                }
            }
        }
    }
}
