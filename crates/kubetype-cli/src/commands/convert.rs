//! Convert command - type every document and emit it again

use kubetype_core::{Codec, ManifestConverter};
use std::path::Path;

use crate::commands::read_input;
use crate::error::Result;

pub fn run(converter: &ManifestConverter, input: &Path) -> Result<()> {
    let text = read_input(input)?;
    let objects = converter.convert_multi_document(&text)?;
    tracing::debug!(documents = objects.len(), "converted manifest stream");

    let output = match (converter.serializer().codec(), objects.as_slice()) {
        (Codec::Yaml, objects) => {
            let mut documents = Vec::with_capacity(objects.len());
            for obj in objects {
                documents.push(converter.to_text(obj)?);
            }
            documents.join("---\n")
        }
        (_, [single]) => converter.to_text(single)?,
        (_, objects) => converter.serializer().to_text(objects)?,
    };

    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}
