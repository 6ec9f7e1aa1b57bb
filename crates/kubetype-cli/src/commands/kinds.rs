//! Kinds command - list the kinds the registry knows

use kubetype_core::ManifestConverter;

use crate::error::Result;

pub fn run(converter: &ManifestConverter) -> Result<()> {
    for kind in converter.resolver().kind_resolver().kinds() {
        println!("{}", kind);
    }
    Ok(())
}
