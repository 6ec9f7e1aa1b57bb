//! CLI error types with exit code handling
//!
//! Every command returns [`CliError`], which knows the exit code the
//! process should end with.

use kubetype_core::KubetypeError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Configuration file unreadable or malformed
    #[error("Configuration error: {message}")]
    #[diagnostic(code(kubetype::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Schema catalog could not be loaded
    #[error("Registry error: {message}")]
    #[diagnostic(code(kubetype::cli::registry))]
    Registry {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// One or more documents failed validation
    #[error("Validation failed for {failed} of {total} document(s)")]
    #[diagnostic(code(kubetype::cli::validation))]
    ValidationFailed { failed: usize, total: usize },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kubetype::cli::io))]
    Io { message: String },

    /// Resolution or conversion failure from the core
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] KubetypeError),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::ERROR,
            CliError::Registry { .. } => exit_codes::REGISTRY_ERROR,
            CliError::ValidationFailed { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Core(KubetypeError::Io(_)) => exit_codes::IO_ERROR,
            CliError::Core(KubetypeError::InvalidCatalog { .. }) => exit_codes::REGISTRY_ERROR,
            CliError::Core(_) => exit_codes::ERROR,
        }
    }

    /// Create a configuration error with help text
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a registry error from a catalog load failure
    pub fn registry(path: &std::path::Path, err: KubetypeError) -> Self {
        Self::Registry {
            message: format!("failed to load {}: {}", path.display(), err),
            help: Some("A catalog maps type names to attribute maps, e.g. `V1Pod: {kind: string}`".to_string()),
        }
    }

    /// Create an IO error for a path
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), err),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_exit_codes() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(CliError::io(Path::new("a.yaml"), missing).exit_code(), exit_codes::IO_ERROR);
        assert_eq!(
            CliError::ValidationFailed { failed: 1, total: 3 }.exit_code(),
            exit_codes::VALIDATION_ERROR
        );
        assert_eq!(CliError::from(KubetypeError::MissingKind).exit_code(), exit_codes::ERROR);
        assert_eq!(
            CliError::from(KubetypeError::InvalidCatalog { message: "x".into() }).exit_code(),
            exit_codes::REGISTRY_ERROR
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err = CliError::from(KubetypeError::MissingApiVersion);
        assert_eq!(err.to_string(), KubetypeError::MissingApiVersion.to_string());
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("kubetype::missing_api_version".to_string())
        );
    }
}
