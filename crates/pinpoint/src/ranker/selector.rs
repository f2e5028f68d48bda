//! Resolvable locator expressions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dom::{looks_like_xpath, Document};
use crate::result::LocatorResult;

/// A CSS or XPath expression the ranker resolves against the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "expression", rename_all = "lowercase")]
pub enum Selector {
    /// CSS selector list (e.g., `#email`, `[data-testid="x"]`)
    Css(String),
    /// XPath expression
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Classify an expression by shape: leading `/`, `(` or `./` is XPath.
    #[must_use]
    pub fn detect(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        if looks_like_xpath(&expression) {
            Self::XPath(expression)
        } else {
            Self::Css(expression)
        }
    }

    /// The expression text
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// Whether this is an XPath expression
    #[must_use]
    pub const fn is_xpath(&self) -> bool {
        matches!(self, Self::XPath(_))
    }

    /// Number of elements this selector matches in `doc`.
    pub fn count(&self, doc: &Document) -> LocatorResult<usize> {
        match self {
            Self::Css(s) => doc.query_count(s),
            Self::XPath(s) => doc.xpath_count(s),
        }
    }

    /// Browser-side expression resolving the first match
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue")
            }
        }
    }

    /// Browser-side expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength")
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
