//! Output formatting

use console::{style, Style};
use pinpoint::{BestLocator, Inspection, RefinedCheck};
use serde::Serialize;
use std::fmt::Write;

use crate::commands::OutputFormat;
use crate::error::{CliError, CliResult};

/// Serialize a value for the machine-readable formats.
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(value)?),
        OutputFormat::Text => Err(CliError::invalid_argument(
            "text output has no structured rendering",
        )),
    }
}

fn paint(text: &str, style: &Style, use_color: bool) -> String {
    if use_color {
        style.apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

/// Filled and empty stars for a 1-5 rating
#[must_use]
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// One-line summary of the recommended locator.
#[must_use]
pub fn render_best(best: &BestLocator, use_color: bool) -> String {
    let score = best
        .score
        .map_or_else(|| "fallback".to_string(), |score| format!("score {score:.2}"));
    format!(
        "{} {} = {}  {} ({score})",
        paint("Best:", &Style::new().bold(), use_color),
        best.kind,
        paint(&best.value, &Style::new().cyan(), use_color),
        paint(&stars(best.stars), &Style::new().yellow(), use_color),
    )
}

/// Candidates, scores and the decision as a text report.
#[must_use]
pub fn render_inspection(inspection: &Inspection, use_color: bool) -> String {
    let mut out = String::new();
    let tag = inspection
        .candidates
        .metadata
        .as_ref()
        .map_or("none", |meta| meta.tag.as_str());
    let _ = writeln!(
        out,
        "{} <{tag}>",
        paint("Element:", &Style::new().bold(), use_color)
    );

    let _ = writeln!(out, "{}", paint("Candidates:", &Style::new().bold(), use_color));
    for (strategy, value) in inspection.candidates.iter() {
        let _ = writeln!(out, "  {strategy:<24} {value}");
    }

    let _ = writeln!(out, "{}", paint("Scored:", &Style::new().bold(), use_color));
    for candidate in &inspection.ranking.scored {
        let matches = if candidate.is_unique {
            paint("unique", &Style::new().green(), use_color)
        } else {
            paint(
                &format!("{} matches", candidate.match_count),
                &Style::new().red(),
                use_color,
            )
        };
        let _ = writeln!(
            out,
            "  {:<26} {:>6.2}  {matches:<10}  {}",
            candidate.kind.label(),
            candidate.score,
            candidate.selector
        );
    }

    match inspection.best() {
        Some(best) => {
            let _ = writeln!(out, "{}", render_best(best, use_color));
        }
        None => {
            let _ = writeln!(out, "{} none", paint("Best:", &Style::new().bold(), use_color));
        }
    }
    out
}

/// Match count and absolute paths for an evaluated expression.
#[must_use]
pub fn render_evaluation(expression: &str, paths: &[String], use_color: bool) -> String {
    let mut out = String::new();
    let count = match paths.len() {
        1 => paint("1 match", &Style::new().green(), use_color),
        n => paint(&format!("{n} matches"), &Style::new().yellow(), use_color),
    };
    let _ = writeln!(out, "{expression}: {count}");
    for path in paths {
        let _ = writeln!(out, "  {path}");
    }
    out
}

/// Re-validated refined locators.
#[must_use]
pub fn render_checks(checks: &[RefinedCheck], use_color: bool) -> String {
    let mut out = String::new();
    for check in checks {
        let status = match check.match_count {
            None => paint("invalid", &Style::new().red(), use_color),
            Some(1) => paint("unique", &Style::new().green(), use_color),
            Some(n) => paint(&format!("{n} matches"), &Style::new().yellow(), use_color),
        };
        let _ = writeln!(out, "  {:<24} {status:<10}  {}", check.key, check.selector);
    }
    out
}

/// Print a warning to stderr unless quiet.
pub fn warning(message: &str, use_color: bool, quiet: bool) {
    if quiet {
        return;
    }
    let prefix = if use_color {
        style("warning:").yellow().bold().to_string()
    } else {
        "warning:".to_string()
    };
    eprintln!("{prefix} {message}");
}
