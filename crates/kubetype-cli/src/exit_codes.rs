//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - every document converted or validated
pub const SUCCESS: i32 = 0;

/// General error - conversion failed or unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - at least one document failed validation
pub const VALIDATION_ERROR: i32 = 2;

/// Registry error - the schema catalog could not be loaded
pub const REGISTRY_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
