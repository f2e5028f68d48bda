//! Refinement command handlers

use pinpoint::{Document, LocatorEngine, RefinementRequest};
use std::path::Path;

use super::{load_document, resolve_target};
use crate::commands::{RefineArgs, RefineRequestArgs};
use crate::config::CliConfig;
use crate::error::CliResult;

/// Load `file` and build the refinement request for `target`.
pub fn build_request(
    engine: &LocatorEngine,
    file: &Path,
    target: &str,
) -> CliResult<(Document, RefinementRequest)> {
    let doc = load_document(file)?;
    let request = {
        let element = resolve_target(&doc, target)?;
        let candidates = engine.synthesizer().synthesize(&doc, Some(element));
        RefinementRequest::new(
            &candidates,
            Some(element),
            engine.config().context_html_length,
        )
    };
    Ok((doc, request))
}

/// Execute the refine-request command
pub fn execute_refine_request(config: &CliConfig, args: &RefineRequestArgs) -> CliResult<()> {
    let engine = config.engine()?;
    let (_, request) = build_request(&engine, &args.file, &args.target)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        println!("{}", request.prompt()?.trim_end());
    }
    Ok(())
}

/// Execute the refine command
#[cfg(feature = "llm")]
pub fn execute_refine(config: &CliConfig, args: &RefineArgs) -> CliResult<()> {
    use crate::commands::OutputFormat;
    use crate::error::CliError;
    use crate::output::{render_checks, render_structured};
    use pinpoint::RefinementClient;

    let engine = config.engine()?;
    let (doc, request) = build_request(&engine, &args.file, &args.target)?;

    let mut client = RefinementClient::new(args.endpoint.as_str(), args.model.as_str());
    if let Some(key) = &args.api_key {
        client = client.with_api_key(key.as_str());
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::refinement(format!("failed to create async runtime: {e}")))?;
    let refined = rt.block_on(client.refine(&request))?;
    let checks = refined.validate(&doc);

    let rendered = match args.format {
        OutputFormat::Text => render_checks(&checks, config.use_color()),
        format => render_structured(&checks, format)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Execute the refine command
#[cfg(not(feature = "llm"))]
pub fn execute_refine(_config: &CliConfig, _args: &RefineArgs) -> CliResult<()> {
    Err(crate::error::CliError::refinement(
        "LLM support not enabled. Rebuild with --features llm",
    ))
}
