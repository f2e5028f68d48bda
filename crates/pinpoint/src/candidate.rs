//! Candidate set: one nullable locator per strategy plus element metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Locator synthesis strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Shortest unique CSS selector
    CssSelector,
    /// Positional path from the document root
    #[serde(rename = "absoluteXPath")]
    AbsoluteXPath,
    /// Attribute- or anchor-based XPath
    #[serde(rename = "relativeXPath")]
    RelativeXPath,
    /// `//tag[text()='...']`
    #[serde(rename = "xpathByText")]
    XPathByText,
    /// `//a[text()='...']`
    #[serde(rename = "xpathByLinkText")]
    XPathByLinkText,
    /// `//a[contains(text(),'...')]`
    #[serde(rename = "xpathByPartialLinkText")]
    XPathByPartialLinkText,
    /// `//tag[@class='...']`
    #[serde(rename = "xpathByClassName")]
    XPathByClassName,
    /// `//tag`
    #[serde(rename = "xpathByTagName")]
    XPathByTagName,
    /// `id` attribute
    Id,
    /// `data-testid` / `data-test-id` attribute
    DataTestId,
    /// `aria-label` attribute
    AriaLabel,
    /// `name` attribute
    Name,
    /// `role` attribute
    Role,
}

impl Strategy {
    /// Every strategy, in candidate-set field order.
    pub const ALL: [Self; 13] = [
        Self::CssSelector,
        Self::AbsoluteXPath,
        Self::RelativeXPath,
        Self::XPathByText,
        Self::XPathByLinkText,
        Self::XPathByPartialLinkText,
        Self::XPathByClassName,
        Self::XPathByTagName,
        Self::Id,
        Self::DataTestId,
        Self::AriaLabel,
        Self::Name,
        Self::Role,
    ];

    /// Key used in serialized candidate sets
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CssSelector => "cssSelector",
            Self::AbsoluteXPath => "absoluteXPath",
            Self::RelativeXPath => "relativeXPath",
            Self::XPathByText => "xpathByText",
            Self::XPathByLinkText => "xpathByLinkText",
            Self::XPathByPartialLinkText => "xpathByPartialLinkText",
            Self::XPathByClassName => "xpathByClassName",
            Self::XPathByTagName => "xpathByTagName",
            Self::Id => "id",
            Self::DataTestId => "dataTestId",
            Self::AriaLabel => "ariaLabel",
            Self::Name => "name",
            Self::Role => "role",
        }
    }

    /// Whether the candidate value is an XPath expression.
    ///
    /// The attribute strategies hold raw attribute values, not expressions.
    #[must_use]
    pub const fn is_xpath(self) -> bool {
        matches!(
            self,
            Self::AbsoluteXPath
                | Self::RelativeXPath
                | Self::XPathByText
                | Self::XPathByLinkText
                | Self::XPathByPartialLinkText
                | Self::XPathByClassName
                | Self::XPathByTagName
        )
    }

    /// Whether the candidate value is a raw attribute value.
    #[must_use]
    pub const fn is_attribute(self) -> bool {
        matches!(
            self,
            Self::Id | Self::DataTestId | Self::AriaLabel | Self::Name | Self::Role
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Descriptive facts about the inspected element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMetadata {
    /// Lower-cased tag name
    pub tag: String,
    pub id: Option<String>,
    /// Raw `class` attribute
    pub class: Option<String>,
    pub name: Option<String>,
    /// First of `data-testid` / `data-test-id`
    pub test_id: Option<String>,
    pub aria_label: Option<String>,
    pub role: Option<String>,
    pub placeholder: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub href: Option<String>,
    /// Trimmed text, truncated for display
    pub text: Option<String>,
    /// Outer HTML, truncated for display
    pub outer_html: Option<String>,
}

/// Locator candidates for one element.
///
/// Every strategy is always present; `None` means the strategy does not
/// apply to this element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    #[serde(rename = "cssSelector")]
    pub css_selector: Option<String>,
    #[serde(rename = "absoluteXPath")]
    pub absolute_xpath: Option<String>,
    #[serde(rename = "relativeXPath")]
    pub relative_xpath: Option<String>,
    #[serde(rename = "xpathByText")]
    pub xpath_by_text: Option<String>,
    #[serde(rename = "xpathByLinkText")]
    pub xpath_by_link_text: Option<String>,
    #[serde(rename = "xpathByPartialLinkText")]
    pub xpath_by_partial_link_text: Option<String>,
    #[serde(rename = "xpathByClassName")]
    pub xpath_by_class_name: Option<String>,
    #[serde(rename = "xpathByTagName")]
    pub xpath_by_tag_name: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "dataTestId")]
    pub data_test_id: Option<String>,
    #[serde(rename = "ariaLabel")]
    pub aria_label: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<ElementMetadata>,
}

impl CandidateSet {
    /// The empty set returned for missing or foreign elements
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Value for a strategy
    #[must_use]
    pub fn get(&self, strategy: Strategy) -> Option<&str> {
        self.slot(strategy).as_deref()
    }

    /// Replace the value for a strategy.
    pub fn set(&mut self, strategy: Strategy, value: Option<String>) {
        *self.slot_mut(strategy) = value;
    }

    /// Builder form of [`Self::set`]
    #[must_use]
    pub fn with(mut self, strategy: Strategy, value: impl Into<String>) -> Self {
        self.set(strategy, Some(value.into()));
        self
    }

    /// Non-null candidates in strategy order.
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, &str)> + '_ {
        Strategy::ALL
            .into_iter()
            .filter_map(move |strategy| self.get(strategy).map(|value| (strategy, value)))
    }

    /// Number of non-null candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when no strategy produced a value and there is no metadata.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.iter().next().is_none()
    }

    /// Plain key to locator mapping.
    #[must_use]
    pub fn to_locator_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(strategy, value)| (strategy.as_str().to_string(), value.to_string()))
            .collect()
    }

    const fn slot(&self, strategy: Strategy) -> &Option<String> {
        match strategy {
            Strategy::CssSelector => &self.css_selector,
            Strategy::AbsoluteXPath => &self.absolute_xpath,
            Strategy::RelativeXPath => &self.relative_xpath,
            Strategy::XPathByText => &self.xpath_by_text,
            Strategy::XPathByLinkText => &self.xpath_by_link_text,
            Strategy::XPathByPartialLinkText => &self.xpath_by_partial_link_text,
            Strategy::XPathByClassName => &self.xpath_by_class_name,
            Strategy::XPathByTagName => &self.xpath_by_tag_name,
            Strategy::Id => &self.id,
            Strategy::DataTestId => &self.data_test_id,
            Strategy::AriaLabel => &self.aria_label,
            Strategy::Name => &self.name,
            Strategy::Role => &self.role,
        }
    }

    fn slot_mut(&mut self, strategy: Strategy) -> &mut Option<String> {
        match strategy {
            Strategy::CssSelector => &mut self.css_selector,
            Strategy::AbsoluteXPath => &mut self.absolute_xpath,
            Strategy::RelativeXPath => &mut self.relative_xpath,
            Strategy::XPathByText => &mut self.xpath_by_text,
            Strategy::XPathByLinkText => &mut self.xpath_by_link_text,
            Strategy::XPathByPartialLinkText => &mut self.xpath_by_partial_link_text,
            Strategy::XPathByClassName => &mut self.xpath_by_class_name,
            Strategy::XPathByTagName => &mut self.xpath_by_tag_name,
            Strategy::Id => &mut self.id,
            Strategy::DataTestId => &mut self.data_test_id,
            Strategy::AriaLabel => &mut self.aria_label,
            Strategy::Name => &mut self.name,
            Strategy::Role => &mut self.role,
        }
    }
}
