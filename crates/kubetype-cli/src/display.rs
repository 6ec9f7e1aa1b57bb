//! Display formatting for CLI output
//!
//! Validation results are grouped by file, one line per document.

use console::style;
use kubetype_core::KubetypeError;
use miette::Diagnostic;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of converting a single document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum DocumentOutcome {
    #[serde(rename_all = "camelCase")]
    Valid {
        type_name: String,
    },
    Invalid {
        error: &'static str,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
}

/// A document and where it came from
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub file: String,
    /// 1-based position among the non-empty documents of the file
    pub document: usize,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

/// Per-document results for a validation run
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub results: Vec<DocumentResult>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a converted document
    pub fn add_valid(&mut self, file: &str, document: usize, type_name: &str) {
        self.results.push(DocumentResult {
            file: file.to_string(),
            document,
            outcome: DocumentOutcome::Valid {
                type_name: type_name.to_string(),
            },
        });
    }

    /// Record a document that failed, keeping the diagnostic's help as a hint
    pub fn add_error(&mut self, file: &str, document: usize, err: &KubetypeError) {
        self.results.push(DocumentResult {
            file: file.to_string(),
            document,
            outcome: DocumentOutcome::Invalid {
                error: err.kind_name(),
                message: err.to_string(),
                hint: err.help().map(|h| h.to_string()),
            },
        });
    }

    /// Display results grouped by file
    pub fn display(&self) {
        let mut by_file: BTreeMap<&str, Vec<&DocumentResult>> = BTreeMap::new();
        for result in &self.results {
            by_file.entry(&result.file).or_default().push(result);
        }

        for (file, results) in by_file {
            println!();
            println!("{}", style(file).cyan().bold());

            for result in results {
                let position = style(format!("document {}", result.document)).dim();
                match &result.outcome {
                    DocumentOutcome::Valid { type_name } => {
                        println!("  {} {} {}", style("✓").green(), position, type_name);
                    }
                    DocumentOutcome::Invalid { message, hint, .. } => {
                        println!("  {} {} {}", style("✗").red(), position, message);
                        if let Some(hint) = hint {
                            println!("    {} {}", style("hint:").blue(), hint);
                        }
                    }
                }
            }
        }
    }

    /// Number of failed documents and total documents
    pub fn summary(&self) -> (usize, usize) {
        let failed = self
            .results
            .iter()
            .filter(|r| matches!(r.outcome, DocumentOutcome::Invalid { .. }))
            .count();
        (failed, self.results.len())
    }

    /// Print summary line
    pub fn print_summary(&self) {
        let (failed, total) = self.summary();
        if failed > 0 {
            println!(
                "{} Validation failed: {} of {} document(s) invalid",
                style("✗").red().bold(),
                failed,
                total
            );
        } else {
            println!(
                "{} Validation passed! {} document(s) typed",
                style("✓").green().bold(),
                total
            );
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary().0 > 0
    }

    /// Machine-readable report
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "valid": !self.has_errors(),
            "documents": self.results,
        })
    }
}
