//! Read-only document model the locator engine runs against.
//!
//! Wraps a parsed [`scraper::Html`] tree and exposes exactly the queries the
//! engine needs: CSS selector-list matching, XPath evaluation, and the
//! element facts (tag, siblings, text) that locator synthesis reads.

use ego_tree::{NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector as CssSelector};

use crate::result::{LocatorError, LocatorResult};
use crate::xpath::XPath;

/// Elements whose text never renders.
const NON_RENDERED_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// A parsed HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document.
    ///
    /// The HTML parser always produces `html`, `head` and `body`, so every
    /// element has an ancestor chain ending at `html`.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self::from_html(Html::parse_document(source))
    }

    /// Wrap an already-parsed tree.
    ///
    /// The tree is copied top-down from its children lists. Parser error
    /// recovery can move children to a new parent without updating every
    /// moved node's parent link; the copy makes parent, sibling and child
    /// links agree again.
    #[must_use]
    pub fn from_html(mut html: Html) -> Self {
        html.tree = relink(&html.tree);
        Self { html }
    }

    /// The underlying parsed tree
    #[must_use]
    pub const fn html(&self) -> &Html {
        &self.html
    }

    /// The document node (parent of `<html>`).
    #[must_use]
    pub fn root(&self) -> NodeRef<'_, Node> {
        self.html.tree.root()
    }

    /// The `<html>` element
    #[must_use]
    pub fn root_element(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Whether `element` is a node of this document.
    #[must_use]
    pub fn contains(&self, element: ElementRef<'_>) -> bool {
        self.html
            .tree
            .get(element.id())
            .is_some_and(|node| node == *element)
    }

    /// All elements matching a CSS selector list, in document order.
    pub fn query_all(&self, css: &str) -> LocatorResult<Vec<ElementRef<'_>>> {
        let selector = parse_css(css)?;
        Ok(self
            .elements()
            .filter(|element| selector.matches(element))
            .collect())
    }

    /// Number of elements matching a CSS selector list.
    pub fn query_count(&self, css: &str) -> LocatorResult<usize> {
        let selector = parse_css(css)?;
        Ok(self.html.select(&selector).count())
    }

    /// True when the selector parses and matches exactly one element.
    #[must_use]
    pub fn is_unique_css(&self, css: &str) -> bool {
        matches!(self.query_count(css), Ok(1))
    }

    /// Evaluate an XPath expression as an ordered node snapshot.
    ///
    /// Only element nodes are returned; duplicates are removed and the
    /// result is in document order.
    pub fn evaluate_xpath(&self, expression: &str) -> LocatorResult<Vec<ElementRef<'_>>> {
        XPath::parse(expression)?.evaluate(self)
    }

    /// Number of elements an XPath expression selects.
    pub fn xpath_count(&self, expression: &str) -> LocatorResult<usize> {
        self.evaluate_xpath(expression).map(|nodes| nodes.len())
    }

    /// Resolve a CSS or XPath expression to its first match.
    ///
    /// Expressions starting with `/`, `(` or `./` are treated as XPath.
    pub fn resolve(&self, target: &str) -> LocatorResult<Option<ElementRef<'_>>> {
        let matches = if looks_like_xpath(target) {
            self.evaluate_xpath(target)?
        } else {
            self.query_all(target)?
        };
        Ok(matches.into_iter().next())
    }

    /// Number of elements a CSS or XPath expression selects.
    pub fn count(&self, expression: &str) -> LocatorResult<usize> {
        if looks_like_xpath(expression) {
            self.xpath_count(expression)
        } else {
            self.query_count(expression)
        }
    }
}

fn relink(source: &Tree<Node>) -> Tree<Node> {
    let mut tree = Tree::new(source.root().value().clone());
    let mut pending = vec![(source.root(), tree.root().id())];
    while let Some((node, id)) = pending.pop() {
        for child in node.children() {
            if let Some(mut parent) = tree.get_mut(id) {
                let child_id = parent.append(child.value().clone()).id();
                pending.push((child, child_id));
            }
        }
    }
    tree
}

/// Whether an expression should be evaluated as XPath rather than CSS.
#[must_use]
pub fn looks_like_xpath(expression: &str) -> bool {
    let trimmed = expression.trim_start();
    trimmed.starts_with('/') || trimmed.starts_with('(') || trimmed.starts_with("./")
}

fn parse_css(css: &str) -> LocatorResult<CssSelector> {
    CssSelector::parse(css).map_err(|e| LocatorError::invalid_selector(css, e.to_string()))
}

/// Lower-cased tag name.
#[must_use]
pub fn tag_name(element: ElementRef<'_>) -> String {
    element.value().name().to_ascii_lowercase()
}

/// Parent element, if the parent is an element (not the document node).
#[must_use]
pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// 1-based position among element siblings with the same tag name.
#[must_use]
pub fn same_tag_index(element: ElementRef<'_>) -> usize {
    let name = element.value().name();
    element
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|sibling| sibling.value().name() == name)
        .count()
        + 1
}

/// Whether any element sibling (before or after) shares the tag name.
#[must_use]
pub fn has_same_tag_siblings(element: ElementRef<'_>) -> bool {
    let name = element.value().name();
    let same = |node: NodeRef<'_, Node>| {
        ElementRef::wrap(node).is_some_and(|sibling| sibling.value().name() == name)
    };
    element.prev_siblings().any(same) || element.next_siblings().any(same)
}

/// Rendered text of an element: descendant text outside script/style.
#[must_use]
pub fn text_content(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(*element, &mut out);
    out
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if !NON_RENDERED_TAGS.contains(&element.name()) => {
                collect_text(child, out);
            }
            _ => {}
        }
    }
}

/// Rendered text with surrounding whitespace removed.
#[must_use]
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    text_content(element).trim().to_string()
}

/// Truncate to at most `max` characters, marking the cut with `...`.
#[must_use]
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max).collect();
    out.push_str("...");
    out
}
