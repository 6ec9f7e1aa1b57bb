//! Core error types

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while resolving and converting manifests
#[derive(Error, Debug, Diagnostic)]
pub enum KubetypeError {
    #[error("The manifest must be defined")]
    #[diagnostic(
        code(kubetype::missing_configuration),
        help("Supply a YAML/JSON document with at least `apiVersion` and `kind`")
    )]
    MissingConfiguration,

    #[error("The api version needs to be set to be considered a valid k8s manifest")]
    #[diagnostic(code(kubetype::missing_api_version), help("Add a field such as `apiVersion: v1`"))]
    MissingApiVersion,

    #[error("The kind needs to be set to be considered a valid k8s manifest")]
    #[diagnostic(code(kubetype::missing_kind), help("Add a field such as `kind: Pod`"))]
    MissingKind,

    #[error("The kind {kind} wasn't found in the schema registry")]
    #[diagnostic(code(kubetype::unknown_kind))]
    UnknownKind {
        kind: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("The kind {kind} ({api_version}) couldn't be mapped to a registered type, tried: {}", .candidates.join(", "))]
    #[diagnostic(
        code(kubetype::unresolvable_type),
        help("Check the apiVersion, or configure additional candidate patterns")
    )]
    UnresolvableType {
        kind: String,
        api_version: String,
        candidates: Vec<String>,
    },

    #[error("The attribute `{attribute}` wasn't found in the attribute map of type {type_name}{}", at_path(.path))]
    #[diagnostic(code(kubetype::unknown_attribute))]
    UnknownAttribute {
        attribute: String,
        type_name: String,
        path: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("Could not extract the element type from `{type_name}`")]
    #[diagnostic(code(kubetype::malformed_type))]
    MalformedType { type_name: String },

    #[error("Expected {expected} for type {type_name}, found {found}{}", at_path(.path))]
    #[diagnostic(code(kubetype::type_mismatch))]
    TypeMismatch {
        type_name: String,
        expected: &'static str,
        found: &'static str,
        path: String,
    },

    #[error("Invalid schema catalog: {message}")]
    #[diagnostic(code(kubetype::invalid_catalog))]
    InvalidCatalog { message: String },

    #[error("Unknown output format `{format}`")]
    #[diagnostic(code(kubetype::unknown_format), help("Use one of: yaml, json, json-pretty"))]
    UnknownFormat { format: String },

    #[error("Failed to parse YAML: {0}")]
    #[diagnostic(code(kubetype::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    #[diagnostic(code(kubetype::json))]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(kubetype::io))]
    Io(#[from] std::io::Error),
}

impl KubetypeError {
    /// Short machine-readable name of the error kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MissingConfiguration => "missing_configuration",
            Self::MissingApiVersion => "missing_api_version",
            Self::MissingKind => "missing_kind",
            Self::UnknownKind { .. } => "unknown_kind",
            Self::UnresolvableType { .. } => "unresolvable_type",
            Self::UnknownAttribute { .. } => "unknown_attribute",
            Self::MalformedType { .. } => "malformed_type",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::InvalidCatalog { .. } => "invalid_catalog",
            Self::UnknownFormat { .. } => "unknown_format",
            Self::Yaml(_) => "yaml",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
        }
    }
}

fn at_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at `{}`", path)
    }
}

pub type Result<T> = std::result::Result<T, KubetypeError>;
