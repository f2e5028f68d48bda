//! CSS selector strategy.

use scraper::ElementRef;
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::dom::{parent_element, same_tag_index, tag_name, Document};
use crate::escape::{css_attr_selector, css_escape_ident};

/// Shortest unique CSS selector for `element`.
///
/// Tries id, bare tag, stable attributes, remaining `data-*` attributes and
/// classes before building an ancestor path. Returns the path even when
/// the ancestor cap stops it short of uniqueness.
pub(crate) fn css_selector(
    doc: &Document,
    element: ElementRef<'_>,
    config: &EngineConfig,
) -> Option<String> {
    let tag = css_escape_ident(&tag_name(element));
    let value = element.value();

    if let Some(id) = value.id().filter(|id| !id.is_empty()) {
        let selector = format!("#{}", css_escape_ident(id));
        if doc.is_unique_css(&selector) {
            return Some(selector);
        }
        trace!(target: "pinpoint", %selector, "id selector not unique");
    }

    if doc.is_unique_css(&tag) {
        return Some(tag);
    }

    for attribute in &config.stable_attributes {
        if let Some(selector) = attribute_selector(doc, &tag, attribute, value.attr(attribute)) {
            return Some(selector);
        }
    }

    let other_data = value.attrs().filter(|(name, _)| {
        name.starts_with("data-") && !config.stable_attributes.iter().any(|s| s == name)
    });
    for (name, attr_value) in other_data {
        if let Some(selector) = attribute_selector(doc, &tag, name, Some(attr_value)) {
            return Some(selector);
        }
    }

    let classes = usable_classes(element, config);
    for class in &classes {
        let selector = format!("{tag}.{}", css_escape_ident(class));
        if doc.is_unique_css(&selector) {
            return Some(selector);
        }
    }
    if classes.len() > 1 {
        let selector = classes.iter().fold(tag.clone(), |mut acc, class| {
            acc.push('.');
            acc.push_str(&css_escape_ident(class));
            acc
        });
        if doc.is_unique_css(&selector) {
            return Some(selector);
        }
    }

    debug!(target: "pinpoint", %tag, "no direct css selector, building dom path");
    Some(dom_path(doc, element, config))
}

fn attribute_selector(
    doc: &Document,
    tag: &str,
    name: &str,
    value: Option<&str>,
) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    let selector = css_attr_selector(name, value);
    if doc.is_unique_css(&selector) {
        return Some(selector);
    }
    let qualified = format!("{tag}{selector}");
    doc.is_unique_css(&qualified).then_some(qualified)
}

/// Classes from the raw attribute, in source order, minus ignored ones.
fn usable_classes<'a>(element: ElementRef<'a>, config: &EngineConfig) -> Vec<&'a str> {
    let raw = element.value().attr("class").unwrap_or_default();
    config.ignored_classes.usable(raw.split_ascii_whitespace())
}

/// Ancestor path, checked for uniqueness after every added level.
fn dom_path(doc: &Document, element: ElementRef<'_>, config: &EngineConfig) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = Some(element);
    let mut depth = 0;

    while let Some(node) = current {
        if depth > config.max_ancestor_depth {
            break;
        }

        let id = node.value().id().filter(|id| !id.is_empty());
        let segment = if let Some(id) = id {
            format!("#{}", css_escape_ident(id))
        } else {
            let tag = css_escape_ident(&tag_name(node));
            match usable_classes(node, config).first() {
                Some(class) => format!("{tag}.{}", css_escape_ident(class)),
                None => format!("{tag}:nth-of-type({})", same_tag_index(node)),
            }
        };
        segments.push(segment);

        let path = join_path(&segments);
        if doc.is_unique_css(&path) || id.is_some() {
            return path;
        }

        current = parent_element(node);
        depth += 1;
    }

    join_path(&segments)
}

fn join_path(segments: &[String]) -> String {
    segments
        .iter()
        .rev()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
