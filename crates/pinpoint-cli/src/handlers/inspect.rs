//! Inspect command handler

use pinpoint::{Inspection, LocatorEngine};
use std::path::Path;

use super::{load_document, resolve_target};
use crate::commands::{InspectArgs, OutputFormat};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_best, render_inspection, render_structured, warning};

/// Inspect the first element `target` selects in `file`.
pub fn inspect_file(
    engine: &LocatorEngine,
    file: &Path,
    target: &str,
    pool: &[String],
) -> CliResult<Inspection> {
    let doc = load_document(file)?;
    let element = resolve_target(&doc, target)?;
    Ok(engine.inspect_with_pool(&doc, Some(element), pool))
}

/// Execute the inspect command
pub fn execute_inspect(config: &CliConfig, args: &InspectArgs) -> CliResult<()> {
    let engine = config.engine()?;
    let inspection = inspect_file(&engine, &args.file, &args.target, &args.pool)?;
    let use_color = config.use_color();

    if inspection.best().is_some_and(pinpoint::BestLocator::is_fallback) {
        warning(
            "no candidate is unique; showing the fallback locator",
            use_color,
            config.verbosity.is_quiet(),
        );
    }

    let rendered = match (args.format, args.best_only) {
        (OutputFormat::Text, false) => render_inspection(&inspection, use_color),
        (OutputFormat::Text, true) => inspection
            .best()
            .map_or_else(|| "none".to_string(), |best| render_best(best, use_color)),
        (format, false) => render_structured(&inspection, format)?,
        (format, true) => render_structured(&inspection.best(), format)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
