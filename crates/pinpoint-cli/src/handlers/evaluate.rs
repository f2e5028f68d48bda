//! Evaluate command handler

use pinpoint::dom::looks_like_xpath;
use pinpoint::{absolute_xpath, Document};
use serde::{Deserialize, Serialize};

use super::load_document;
use crate::commands::{EvaluateArgs, OutputFormat};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_evaluation, render_structured};

/// Elements selected by one expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub expression: String,
    /// "css" or "xpath"
    pub language: String,
    pub match_count: usize,
    /// Absolute XPath of each match, in document order
    pub matches: Vec<String>,
}

/// Evaluate a CSS or XPath expression against a document.
pub fn evaluate_expression(doc: &Document, expression: &str) -> CliResult<Evaluation> {
    let is_xpath = looks_like_xpath(expression);
    let elements = if is_xpath {
        doc.evaluate_xpath(expression)?
    } else {
        doc.query_all(expression)?
    };
    let matches: Vec<String> = elements.into_iter().map(absolute_xpath).collect();
    Ok(Evaluation {
        expression: expression.to_string(),
        language: if is_xpath { "xpath" } else { "css" }.to_string(),
        match_count: matches.len(),
        matches,
    })
}

/// Execute the evaluate command
pub fn execute_evaluate(config: &CliConfig, args: &EvaluateArgs) -> CliResult<()> {
    let doc = load_document(&args.file)?;
    let evaluation = evaluate_expression(&doc, &args.expression)?;
    let rendered = match args.format {
        OutputFormat::Text => {
            render_evaluation(&evaluation.expression, &evaluation.matches, config.use_color())
        }
        format => render_structured(&evaluation, format)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body><ul><li>a</li><li class=\"x\">b</li></ul></body></html>";

    #[test]
    fn test_evaluate_xpath() {
        let doc = Document::parse(PAGE);
        let evaluation = evaluate_expression(&doc, "//li").unwrap();
        assert_eq!(evaluation.language, "xpath");
        assert_eq!(evaluation.match_count, 2);
        assert_eq!(
            evaluation.matches,
            vec![
                "/html[1]/body[1]/ul[1]/li[1]".to_string(),
                "/html[1]/body[1]/ul[1]/li[2]".to_string()
            ]
        );
    }

    #[test]
    fn test_evaluate_css() {
        let doc = Document::parse(PAGE);
        let evaluation = evaluate_expression(&doc, "li.x").unwrap();
        assert_eq!(evaluation.language, "css");
        assert_eq!(evaluation.matches, vec!["/html[1]/body[1]/ul[1]/li[2]".to_string()]);
    }

    #[test]
    fn test_evaluate_no_matches() {
        let doc = Document::parse(PAGE);
        let evaluation = evaluate_expression(&doc, "//table").unwrap();
        assert_eq!(evaluation.match_count, 0);
        assert!(evaluation.matches.is_empty());
    }

    #[test]
    fn test_evaluate_invalid_expression() {
        let doc = Document::parse(PAGE);
        assert!(evaluate_expression(&doc, "li[").is_err());
        assert!(evaluate_expression(&doc, "//li[").is_err());
    }
}
