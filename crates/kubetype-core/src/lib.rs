//! Kubetype Core - typed Kubernetes manifests from untyped documents
//!
//! This crate turns YAML/JSON manifests into objects typed against a schema
//! registry, and flattens typed objects back to plain data:
//! - `Catalog`: a runtime-loaded schema registry (bundled Kubernetes catalog included)
//! - `KindResolver`: case-insensitive kind lookup, cached per resolver
//! - `TypeNameResolver`: `(apiVersion, kind)` to registered type name
//! - `Converter`: recursive type-directed conversion
//! - `Serializer`: typed objects back to plain data and text
//! - `ManifestConverter`: the whole pipeline behind one entry point

pub mod catalog;
pub mod convert;
pub mod error;
pub mod kind;
pub mod manifest;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod serialize;
pub mod suggestions;
pub mod typed;
pub mod version;

pub use catalog::Catalog;
pub use convert::{Converter, FieldPath};
pub use error::{KubetypeError, Result};
pub use kind::{KindIndex, KindResolver};
pub use manifest::{ManifestConverter, ManifestInput, parse_documents};
pub use registry::{FieldType, SchemaRegistry, TypeDescriptor};
pub use resolver::{CandidatePattern, TypeNameResolver};
pub use serialize::{Codec, Serializer};
pub use typed::{Timestamp, TypedObject, TypedValue};
pub use version::{group_prefix, version_token};
