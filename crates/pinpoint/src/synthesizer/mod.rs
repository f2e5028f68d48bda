//! Locator synthesis.
//!
//! Turns one element into a [`CandidateSet`]: a CSS selector, several XPath
//! variants and the raw identifying attributes, plus display metadata.
//! Every strategy is computed independently; a strategy that does not
//! apply, or whose probe expression fails to evaluate, leaves its slot
//! `None` without affecting the others.

mod css;
mod xpath;

use scraper::ElementRef;
use tracing::debug;

use crate::candidate::{CandidateSet, ElementMetadata, Strategy};
use crate::config::EngineConfig;
use crate::dom::{tag_name, trimmed_text, truncate_chars, Document};

pub use xpath::{absolute_xpath, indexed_if_needed};

/// Produces locator candidates for elements of a document.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: EngineConfig,
}

impl Synthesizer {
    /// Create a synthesizer with the given configuration
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Synthesize candidates for `element`.
    ///
    /// Returns an empty set when `element` is `None` or belongs to another
    /// document.
    #[must_use]
    pub fn synthesize(&self, doc: &Document, element: Option<ElementRef<'_>>) -> CandidateSet {
        let Some(element) = element else {
            return CandidateSet::empty();
        };
        if !doc.contains(element) {
            debug!(target: "pinpoint", "element is not part of the document");
            return CandidateSet::empty();
        }

        let config = &self.config;
        let text = trimmed_text(element);
        let mut set = CandidateSet::empty();

        set.css_selector = css::css_selector(doc, element, config);
        set.absolute_xpath = Some(xpath::absolute_xpath(element));
        set.relative_xpath = Some(xpath::relative_xpath(doc, element, config));
        set.xpath_by_text = xpath::text_xpath(doc, element, &text, config);
        if let Some((exact, partial)) = xpath::link_text_xpaths(doc, element, &text, config) {
            set.xpath_by_link_text = Some(exact);
            set.xpath_by_partial_link_text = Some(partial);
        }
        set.xpath_by_class_name = xpath::class_xpath(doc, element);
        set.xpath_by_tag_name = Some(xpath::tag_xpath(doc, element));

        let value = element.value();
        let attr = |name: &str| {
            value
                .attr(name)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        set.id = attr("id");
        set.data_test_id = attr("data-testid").or_else(|| attr("data-test-id"));
        set.aria_label = attr("aria-label");
        set.name = attr("name");
        set.role = attr("role");

        set.metadata = Some(ElementMetadata {
            tag: tag_name(element),
            id: set.id.clone(),
            class: value.attr("class").map(str::to_string),
            name: set.name.clone(),
            test_id: set.data_test_id.clone(),
            aria_label: set.aria_label.clone(),
            role: set.role.clone(),
            placeholder: attr("placeholder"),
            input_type: attr("type"),
            href: attr("href"),
            text: (!text.is_empty()).then(|| truncate_chars(&text, config.display_text_length)),
            outer_html: Some(truncate_chars(&element.html(), config.context_html_length)),
        });

        for strategy in Strategy::ALL {
            debug!(
                target: "pinpoint",
                %strategy,
                value = set.get(strategy).unwrap_or("<none>"),
                "candidate"
            );
        }
        set
    }
}

#[cfg(test)]
mod tests;
