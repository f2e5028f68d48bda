//! Refinement payloads for an external locator-improvement model.
//!
//! The model sees the candidate locators as a flat key to string object
//! plus the surrounding markup, and answers with an object of the same
//! shape. Refined locators are re-resolved against the document so they
//! can be shown next to the native candidates.

#[cfg(feature = "llm")]
mod client;

#[cfg(feature = "llm")]
pub use client::RefinementClient;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::candidate::CandidateSet;
use crate::dom::{parent_element, truncate_chars, Document};
use crate::ranker::Selector;
use crate::result::{LocatorError, LocatorResult};

const INSTRUCTIONS: &str = "You are a test automation expert. Improve the locators below so \
each one uniquely identifies the same element and survives styling and layout changes. \
Prefer test ids, accessible names and stable attributes over positions and generated class \
names. Reply with only a JSON object that uses the same keys and maps each key to one \
improved CSS selector or XPath string.";

/// What the refinement model is asked to improve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementRequest {
    pub locators: BTreeMap<String, String>,
    /// Outer HTML of the element's parent, truncated
    pub context_html: String,
    pub tag: String,
}

impl RefinementRequest {
    /// Build from a candidate set and the inspected element.
    #[must_use]
    pub fn new(set: &CandidateSet, element: Option<ElementRef<'_>>, context_length: usize) -> Self {
        let context_html = element
            .map(|element| parent_element(element).unwrap_or(element).html())
            .map(|html| truncate_chars(&html, context_length))
            .unwrap_or_default();
        Self {
            locators: set.to_locator_map(),
            context_html,
            tag: set
                .metadata
                .as_ref()
                .map(|meta| meta.tag.clone())
                .unwrap_or_default(),
        }
    }

    /// Whether there is anything to refine
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    /// Prompt text: instructions, locator JSON and context markup.
    pub fn prompt(&self) -> LocatorResult<String> {
        let locators = serde_json::to_string_pretty(&self.locators)?;
        Ok(format!(
            "{INSTRUCTIONS}\n\nElement: <{}>\n\nLocators:\n{locators}\n\nContext HTML:\n{}\n",
            self.tag, self.context_html
        ))
    }
}

/// Locators returned by the refinement model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefinedLocators(BTreeMap<String, String>);

/// A refined locator re-resolved against the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedCheck {
    pub key: String,
    pub selector: Selector,
    /// `None` when the expression does not parse
    pub match_count: Option<usize>,
    pub is_unique: bool,
}

impl RefinedLocators {
    /// Locator for a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain mapping
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    /// Resolve every refined locator against `doc`.
    #[must_use]
    pub fn validate(&self, doc: &Document) -> Vec<RefinedCheck> {
        self.iter()
            .map(|(key, value)| {
                let selector = Selector::detect(value);
                let match_count = selector.count(doc).ok();
                RefinedCheck {
                    key: key.to_string(),
                    is_unique: match_count == Some(1),
                    selector,
                    match_count,
                }
            })
            .collect()
    }
}

/// Extract the locator object from a model reply.
///
/// Accepts bare JSON, fenced code blocks and prose around the object.
/// Numbers and booleans are stringified and nulls skipped; nested arrays
/// or objects are rejected.
///
/// ```
/// use pinpoint::refine::parse_refinement_response;
///
/// let reply = "Here you go:\n```json\n{\"id\": \"#email\", \"rank\": 1}\n```";
/// let refined = parse_refinement_response(reply).unwrap();
/// assert_eq!(refined.get("id"), Some("#email"));
/// assert_eq!(refined.get("rank"), Some("1"));
/// ```
pub fn parse_refinement_response(text: &str) -> LocatorResult<RefinedLocators> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(LocatorError::refinement("reply contains no JSON object"));
    };
    if end < start {
        return Err(LocatorError::refinement("reply contains no JSON object"));
    }

    let value: Value = serde_json::from_str(&text[start..=end])?;
    let Value::Object(object) = value else {
        return Err(LocatorError::refinement("reply is not a JSON object"));
    };

    let mut locators = BTreeMap::new();
    for (key, value) in object {
        let locator = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(LocatorError::refinement(format!(
                    "nested value for key {key:?}"
                )));
            }
        };
        if !locator.trim().is_empty() {
            locators.insert(key, locator);
        }
    }

    if locators.is_empty() {
        return Err(LocatorError::refinement("reply contains no locators"));
    }
    debug!(target: "pinpoint", count = locators.len(), "parsed refined locators");
    Ok(RefinedLocators(locators))
}
