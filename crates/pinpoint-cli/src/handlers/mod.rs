//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions returning data instead of printing
//! - Tests

pub mod config;
pub mod evaluate;
pub mod inspect;
pub mod refine;

use pinpoint::prelude::{Document, ElementRef};
use std::path::Path;

use crate::error::{CliError, CliResult};

pub use config::execute_config;
pub use evaluate::{evaluate_expression, execute_evaluate, Evaluation};
pub use inspect::{execute_inspect, inspect_file};
pub use refine::{build_request, execute_refine, execute_refine_request};

/// Read and parse an HTML document.
pub fn load_document(path: &Path) -> CliResult<Document> {
    let source = std::fs::read_to_string(path).map_err(|e| CliError::input_file(path, e))?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "parsed document");
    Ok(Document::parse(&source))
}

/// First element selected by a CSS or XPath target.
pub fn resolve_target<'a>(doc: &'a Document, target: &str) -> CliResult<ElementRef<'a>> {
    doc.resolve(target)?
        .ok_or_else(|| CliError::target_not_found(target))
}
