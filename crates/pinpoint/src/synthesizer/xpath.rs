//! XPath strategies.

use scraper::ElementRef;
use tracing::trace;

use crate::config::EngineConfig;
use crate::dom::{
    has_same_tag_siblings, parent_element, same_tag_index, tag_name, Document,
};
use crate::escape::{css_escape_ident, xpath_literal};

/// Positional path from the document root: `/html[1]/body[1]/div[2]`.
pub fn absolute_xpath(element: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element);
    while let Some(node) = current {
        segments.push(format!("{}[{}]", tag_name(node), same_tag_index(node)));
        current = parent_element(node);
    }
    segments.reverse();
    format!("/{}", segments.join("/"))
}

/// Attribute-anchored XPath, else a path up to the nearest id or `html`.
pub(crate) fn relative_xpath(
    doc: &Document,
    element: ElementRef<'_>,
    config: &EngineConfig,
) -> String {
    let tag = tag_name(element);
    let value = element.value();

    if let Some(id) = value.id().filter(|id| !id.is_empty()) {
        if doc.is_unique_css(&format!("#{}", css_escape_ident(id))) {
            return format!("//*[@id={}]", xpath_literal(id));
        }
    }

    for attribute in &config.stable_attributes {
        let Some(attr_value) = value.attr(attribute).filter(|v| !v.is_empty()) else {
            continue;
        };
        let expr = format!("//{tag}[@{attribute}={}]", xpath_literal(attr_value));
        if resolves_to_only(doc, &expr, element) {
            return expr;
        }
    }

    hierarchical_xpath(doc, element)
}

fn resolves_to_only(doc: &Document, expr: &str, element: ElementRef<'_>) -> bool {
    match doc.evaluate_xpath(expr) {
        Ok(found) => found.len() == 1 && found[0] == element,
        Err(e) => {
            trace!(target: "pinpoint", %expr, error = %e, "xpath evaluation failed");
            false
        }
    }
}

fn hierarchical_xpath(doc: &Document, element: ElementRef<'_>) -> String {
    let mut segments = vec![step(element)];
    let mut current = parent_element(element);

    while let Some(ancestor) = current {
        if let Some(id) = ancestor.value().id().filter(|id| !id.is_empty()) {
            let anchor = format!("//*[@id={}]", xpath_literal(id));
            let anchor = indexed_if_needed(doc, &anchor, ancestor);
            return format!("{anchor}/{}", join_steps(&segments));
        }
        if tag_name(ancestor) == "html" {
            return format!("/html/{}", join_steps(&segments));
        }
        segments.push(step(ancestor));
        current = parent_element(ancestor);
    }

    format!("/{}", join_steps(&segments))
}

fn step(element: ElementRef<'_>) -> String {
    let tag = tag_name(element);
    if has_same_tag_siblings(element) {
        format!("{tag}[{}]", same_tag_index(element))
    } else {
        tag
    }
}

fn join_steps(segments: &[String]) -> String {
    segments
        .iter()
        .rev()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/")
}

/// Wrap `expr` as `(expr)[n]` when it matches several elements.
///
/// `n` is the 1-based position of `element` in the document-ordered
/// result. Expressions that match at most one element, fail to evaluate,
/// or do not match `element` at all are returned unchanged.
///
/// ```
/// use pinpoint::dom::Document;
/// use pinpoint::synthesizer::indexed_if_needed;
///
/// let doc = Document::parse("<ul><li>a</li><li>b</li></ul>");
/// let second = doc.query_all("li").unwrap()[1];
/// assert_eq!(indexed_if_needed(&doc, "//li", second), "(//li)[2]");
/// assert_eq!(indexed_if_needed(&doc, "//ul", second), "//ul");
/// ```
#[must_use]
pub fn indexed_if_needed(doc: &Document, expr: &str, element: ElementRef<'_>) -> String {
    let found = match doc.evaluate_xpath(expr) {
        Ok(found) => found,
        Err(e) => {
            trace!(target: "pinpoint", %expr, error = %e, "xpath evaluation failed");
            return expr.to_string();
        }
    };
    if found.len() <= 1 {
        return expr.to_string();
    }
    match found.iter().position(|candidate| *candidate == element) {
        Some(index) => format!("({expr})[{}]", index + 1),
        None => expr.to_string(),
    }
}

/// `//tag[text()='...']` for short, non-empty text.
pub(crate) fn text_xpath(
    doc: &Document,
    element: ElementRef<'_>,
    text: &str,
    config: &EngineConfig,
) -> Option<String> {
    if text.is_empty() || text.chars().count() > config.max_text_length {
        return None;
    }
    let expr = format!("//{}[text()={}]", tag_name(element), xpath_literal(text));
    Some(indexed_if_needed(doc, &expr, element))
}

/// Exact and partial link-text XPaths for anchors with text.
pub(crate) fn link_text_xpaths(
    doc: &Document,
    element: ElementRef<'_>,
    text: &str,
    config: &EngineConfig,
) -> Option<(String, String)> {
    if tag_name(element) != "a" || text.is_empty() {
        return None;
    }
    let exact = format!("//a[text()={}]", xpath_literal(text));
    let prefix: String = text.chars().take(config.partial_link_text_length).collect();
    let partial = format!("//a[contains(text(),{})]", xpath_literal(&prefix));
    Some((
        indexed_if_needed(doc, &exact, element),
        indexed_if_needed(doc, &partial, element),
    ))
}

/// `//tag[@class='...']` using the raw attribute string.
pub(crate) fn class_xpath(doc: &Document, element: ElementRef<'_>) -> Option<String> {
    let class = element
        .value()
        .attr("class")
        .filter(|class| !class.trim().is_empty())?;
    let expr = format!("//{}[@class={}]", tag_name(element), xpath_literal(class));
    Some(indexed_if_needed(doc, &expr, element))
}

/// `//tag`, indexed when the tag repeats.
pub(crate) fn tag_xpath(doc: &Document, element: ElementRef<'_>) -> String {
    indexed_if_needed(doc, &format!("//{}", tag_name(element)), element)
}
