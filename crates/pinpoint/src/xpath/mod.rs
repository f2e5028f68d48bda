//! XPath 1.0 subset for locator evaluation.
//!
//! The browser gives extensions `document.evaluate`; this module is the
//! Rust stand-in. It covers what UI-test locators are written in:
//!
//! - absolute and `//` descendant paths, name tests and `*`
//! - the `child`, `descendant(-or-self)`, `self`, `parent`, `ancestor(-or-self)`,
//!   `following-sibling`, `preceding-sibling` and `attribute` axes
//! - positional predicates (per step, relative to each parent) and
//!   `(expr)[n]` filters over a whole result set
//! - `=`, `!=`, `<`, `<=`, `>`, `>=`, `and`, `or`, `|`
//! - `text()`, `node()`, `position()`, `last()`, `count()`, `contains()`,
//!   `starts-with()`, `normalize-space()`, `concat()`, `not()`, `string()`,
//!   `string-length()`, `name()`, `true()`, `false()`
//!
//! Results are ordered node snapshots: document order, no duplicates.

mod eval;
mod parser;

use scraper::ElementRef;

use crate::dom::Document;
use crate::result::{LocatorError, LocatorResult};

use eval::Evaluator;
use parser::Expr;

/// A compiled XPath expression.
#[derive(Debug, Clone, PartialEq)]
pub struct XPath {
    source: String,
    expr: Expr,
}

impl XPath {
    /// Compile an expression.
    pub fn parse(source: &str) -> LocatorResult<Self> {
        Ok(Self {
            source: source.to_string(),
            expr: parser::parse(source)?,
        })
    }

    /// The expression text as given
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate against a document, returning the selected elements.
    ///
    /// Text and attribute nodes in the result are dropped. An expression
    /// that yields a string, number or boolean is an error.
    pub fn evaluate<'a>(&self, document: &'a Document) -> LocatorResult<Vec<ElementRef<'a>>> {
        let evaluator = Evaluator::new(document.root());
        let items = evaluator.select(&self.expr).ok_or_else(|| {
            LocatorError::invalid_xpath(&self.source, 0, "expression does not select nodes")
        })?;
        Ok(items
            .iter()
            .filter_map(|item| item.as_node())
            .filter_map(ElementRef::wrap)
            .collect())
    }
}

impl std::fmt::Display for XPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests;
