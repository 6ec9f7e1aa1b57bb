//! Validate command - check that every document converts

use console::style;
use kubetype_core::{ManifestConverter, parse_documents};
use std::path::PathBuf;

use crate::commands::read_input;
use crate::display::ValidationReport;
use crate::error::{CliError, Result};

pub fn run(converter: &ManifestConverter, files: &[PathBuf], json_output: bool) -> Result<()> {
    let mut report = ValidationReport::new();

    for path in files {
        let name = path.display().to_string();
        if !json_output {
            println!("{} Validating {}", style("→").blue(), name);
        }

        let text = read_input(path)?;
        match parse_documents(&text) {
            Ok(documents) => {
                for (index, document) in documents.into_iter().enumerate() {
                    match converter.convert_value(document) {
                        Ok(obj) => report.add_valid(&name, index + 1, obj.type_name()),
                        Err(err) => report.add_error(&name, index + 1, &err),
                    }
                }
            }
            Err(err) => report.add_error(&name, 1, &err),
        }
    }

    if json_output {
        let output = serde_json::to_string_pretty(&report.to_json())
            .map_err(kubetype_core::KubetypeError::from)?;
        println!("{}", output);
    } else {
        report.display();
        println!();
        report.print_summary();
    }

    let (failed, total) = report.summary();
    if failed > 0 {
        return Err(CliError::ValidationFailed { failed, total });
    }
    Ok(())
}
