//! CLI commands

pub mod convert;
pub mod kinds;
pub mod resolve;
pub mod validate;

use kubetype_core::{Catalog, Codec, ManifestConverter, SchemaRegistry};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{CliError, Result};

/// Load the registry named by `--registry`, the config, or the bundled catalog
pub fn load_registry(
    override_path: Option<&Path>,
    config: &Config,
) -> Result<Arc<dyn SchemaRegistry>> {
    let catalog = match override_path.or(config.registry.as_deref()) {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "catalog file not found"),
                ));
            }
            Catalog::from_file(path).map_err(|e| CliError::registry(path, e))?
        }
        None => Catalog::builtin()?,
    };

    tracing::debug!(types = catalog.len(), "registry ready");
    Ok(Arc::new(catalog))
}

/// Build a converter from the configuration, with an optional codec override
pub fn manifest_converter(
    registry: Arc<dyn SchemaRegistry>,
    config: &Config,
    codec: Option<Codec>,
) -> ManifestConverter {
    ManifestConverter::with_options(
        registry,
        config.candidates.clone(),
        codec.unwrap_or(config.output),
    )
}

/// Read a manifest file, or standard input for `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))
}
