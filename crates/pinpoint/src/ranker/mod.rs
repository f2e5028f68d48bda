//! Locator ranking.
//!
//! Re-resolves every candidate against the document, scores it, and picks
//! one best locator. Scoring weights:
//!
//! | Locator | Unique | Non-unique |
//! |---|---|---|
//! | id | 100 | discarded |
//! | data-testid | 95 | discarded |
//! | aria-label | 90 | discarded |
//! | name | 85 | discarded |
//! | CSS | 80 if shorter than the length cap, else 0 | discarded |
//! | XPath by name | 75 | `45/m + max(0, 25 - len/10)` |
//! | link text (anchors) | 70 | `40/m + max(0, 20 - len/10)` |
//! | partial link text (anchors) | 65 | `35/m + max(0, 15 - len/10)` |
//! | relative XPath | 60 | `30/m + max(0, 20 - len/15)` |
//! | pool entry `i < 3` | `55 - 5i + max(0, 20 - len/15)` | discarded |
//!
//! `m` is the match count; candidates matching nothing are discarded.

mod selector;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::candidate::{CandidateSet, Strategy};
use crate::config::{EngineConfig, DEFAULT_MAX_CSS_LENGTH};
use crate::dom::Document;
use crate::escape::{css_attr_selector, css_attr_value, css_escape_ident, xpath_literal};

pub use selector::Selector;

/// Pool entries considered for scoring
const POOL_SIZE: usize = 3;

/// Display category of a scored locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorKind {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "Data-TestId")]
    DataTestId,
    #[serde(rename = "Aria-Label")]
    AriaLabel,
    #[serde(rename = "Name")]
    Name,
    #[serde(rename = "CSS")]
    Css,
    #[serde(rename = "XPath (Name)")]
    XPathByName,
    #[serde(rename = "XPath (Link Text)")]
    LinkText,
    #[serde(rename = "XPath (Partial Link Text)")]
    PartialLinkText,
    #[serde(rename = "Relative XPath")]
    RelativeXPath,
    /// Entry from a caller-supplied XPath pool
    #[serde(rename = "XPath")]
    XPath,
    #[serde(rename = "Absolute XPath")]
    AbsoluteXPath,
}

impl LocatorKind {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::DataTestId => "Data-TestId",
            Self::AriaLabel => "Aria-Label",
            Self::Name => "Name",
            Self::Css => "CSS",
            Self::XPathByName => "XPath (Name)",
            Self::LinkText => "XPath (Link Text)",
            Self::PartialLinkText => "XPath (Partial Link Text)",
            Self::RelativeXPath => "Relative XPath",
            Self::XPath => "XPath",
            Self::AbsoluteXPath => "Absolute XPath",
        }
    }
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A candidate after re-validation against the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub kind: LocatorKind,
    /// Value shown to the user (raw attribute value or expression)
    pub value: String,
    /// Expression that was resolved
    pub selector: Selector,
    pub is_unique: bool,
    pub match_count: usize,
    /// Length of the resolved expression
    pub complexity: usize,
    pub score: f64,
}

/// The recommended locator for an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestLocator {
    #[serde(rename = "type")]
    pub kind: LocatorKind,
    pub value: String,
    pub selector: Selector,
    /// `None` when chosen by the fallback priority list
    pub score: Option<f64>,
    pub stars: u8,
    pub match_count: Option<usize>,
}

impl BestLocator {
    /// Whether this came from the unscored fallback list
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.score.is_none()
    }
}

impl From<&ScoredCandidate> for BestLocator {
    fn from(candidate: &ScoredCandidate) -> Self {
        Self {
            kind: candidate.kind,
            value: candidate.value.clone(),
            selector: candidate.selector.clone(),
            score: Some(candidate.score),
            stars: star_rating(candidate.score),
            match_count: Some(candidate.match_count),
        }
    }
}

/// Scored candidates, best first, plus the decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub scored: Vec<ScoredCandidate>,
    pub best: Option<BestLocator>,
}

/// Star rating (1-5) for a score.
///
/// ```
/// use pinpoint::ranker::star_rating;
/// assert_eq!(star_rating(100.0), 5);
/// assert_eq!(star_rating(75.0), 4);
/// assert_eq!(star_rating(12.5), 1);
/// ```
#[must_use]
pub fn star_rating(score: f64) -> u8 {
    if score >= 90.0 {
        5
    } else if score >= 70.0 {
        4
    } else if score >= 50.0 {
        3
    } else if score >= 30.0 {
        2
    } else {
        1
    }
}

/// Near-miss score for a non-unique XPath.
fn near_miss(match_count: usize, weight: f64, bonus: f64, divisor: f64, length: usize) -> f64 {
    weight / match_count as f64 + (bonus - length as f64 / divisor).max(0.0)
}

/// Scores candidate sets against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    max_css_length: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CSS_LENGTH)
    }
}

impl Ranker {
    /// Create a ranker with a CSS length cap
    #[must_use]
    pub const fn new(max_css_length: usize) -> Self {
        Self { max_css_length }
    }

    /// Create a ranker from engine configuration
    #[must_use]
    pub const fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_css_length)
    }

    /// Rank a candidate set without an XPath pool.
    #[must_use]
    pub fn rank(&self, set: &CandidateSet, doc: &Document) -> Ranking {
        self.rank_with_pool(set, doc, &[])
    }

    /// Rank a candidate set; the first three pool XPaths are scored too.
    #[must_use]
    pub fn rank_with_pool(&self, set: &CandidateSet, doc: &Document, pool: &[String]) -> Ranking {
        let mut scored = Vec::new();
        let tag = set.metadata.as_ref().map(|meta| meta.tag.as_str());
        let is_anchor = tag == Some("a");

        let mut push = |candidate: Option<ScoredCandidate>| {
            if let Some(candidate) = candidate {
                trace!(
                    target: "pinpoint",
                    kind = %candidate.kind,
                    matches = candidate.match_count,
                    score = candidate.score,
                    "scored"
                );
                scored.push(candidate);
            }
        };

        for (strategy, kind, weight) in [
            (Strategy::Id, LocatorKind::Id, 100.0),
            (Strategy::DataTestId, LocatorKind::DataTestId, 95.0),
            (Strategy::AriaLabel, LocatorKind::AriaLabel, 90.0),
            (Strategy::Name, LocatorKind::Name, 85.0),
        ] {
            if let Some(value) = set.get(strategy) {
                let selector = attribute_selector(kind, value, tag);
                push(unique_only(doc, kind, value, selector, |_| weight));
            }
        }

        if let Some(css) = set.css_selector.as_deref() {
            let cap = self.max_css_length;
            let score = |len: usize| if len < cap { 80.0 } else { 0.0 };
            push(unique_only(doc, LocatorKind::Css, css, Selector::css(css), score));
        }

        if let Some(name) = set.name.as_deref() {
            let selector = attribute_selector(LocatorKind::XPathByName, name, tag);
            let value = selector.as_str().to_string();
            push(with_near_miss(doc, LocatorKind::XPathByName, &value, selector, 75.0, |m, len| {
                near_miss(m, 45.0, 25.0, 10.0, len)
            }));
        }

        if is_anchor {
            if let Some(link) = set.xpath_by_link_text.as_deref() {
                let selector = Selector::xpath(link);
                push(with_near_miss(doc, LocatorKind::LinkText, link, selector, 70.0, |m, len| {
                    near_miss(m, 40.0, 20.0, 10.0, len)
                }));
            }
            if let Some(partial) = set.xpath_by_partial_link_text.as_deref() {
                let selector = Selector::xpath(partial);
                let kind = LocatorKind::PartialLinkText;
                push(with_near_miss(doc, kind, partial, selector, 65.0, |m, len| {
                    near_miss(m, 35.0, 15.0, 10.0, len)
                }));
            }
        }

        if let Some(relative) = set.relative_xpath.as_deref() {
            let selector = Selector::xpath(relative);
            let kind = LocatorKind::RelativeXPath;
            push(with_near_miss(doc, kind, relative, selector, 60.0, |m, len| {
                near_miss(m, 30.0, 20.0, 15.0, len)
            }));
        }

        for (index, expression) in pool.iter().take(POOL_SIZE).enumerate() {
            let base = 55.0 - 5.0 * index as f64;
            let selector = Selector::detect(expression.as_str());
            push(unique_only(doc, LocatorKind::XPath, expression, selector, |len| {
                base + (20.0 - len as f64 / 15.0).max(0.0)
            }));
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let best = if scored.iter().any(|c| c.is_unique) {
            self.select(&scored)
        } else {
            fallback(set, tag)
        };
        if let Some(best) = &best {
            debug!(
                target: "pinpoint",
                kind = %best.kind,
                value = %best.value,
                stars = best.stars,
                "best locator"
            );
        }

        Ranking { scored, best }
    }

    /// Pick the best of an already sorted list.
    ///
    /// A top CSS selector at or beyond the length cap yields to the
    /// runner-up.
    #[must_use]
    pub fn select(&self, scored: &[ScoredCandidate]) -> Option<BestLocator> {
        let top = scored.first()?;
        let chosen = match scored.get(1) {
            Some(second)
                if top.kind == LocatorKind::Css && top.complexity >= self.max_css_length =>
            {
                second
            }
            _ => top,
        };
        Some(BestLocator::from(chosen))
    }
}

/// Match count, with evaluation failures counted as zero.
fn resolve(doc: &Document, selector: &Selector) -> usize {
    selector.count(doc).unwrap_or_else(|e| {
        trace!(target: "pinpoint", %selector, error = %e, "treating as zero matches");
        0
    })
}

fn unique_only(
    doc: &Document,
    kind: LocatorKind,
    value: &str,
    selector: Selector,
    score: impl FnOnce(usize) -> f64,
) -> Option<ScoredCandidate> {
    let match_count = resolve(doc, &selector);
    if match_count != 1 {
        return None;
    }
    let complexity = selector.as_str().chars().count();
    Some(ScoredCandidate {
        kind,
        value: value.to_string(),
        selector,
        is_unique: true,
        match_count,
        complexity,
        score: score(complexity),
    })
}

fn with_near_miss(
    doc: &Document,
    kind: LocatorKind,
    value: &str,
    selector: Selector,
    unique_score: f64,
    near: impl FnOnce(usize, usize) -> f64,
) -> Option<ScoredCandidate> {
    let match_count = resolve(doc, &selector);
    if match_count == 0 {
        return None;
    }
    let complexity = selector.as_str().chars().count();
    let is_unique = match_count == 1;
    Some(ScoredCandidate {
        kind,
        value: value.to_string(),
        selector,
        is_unique,
        match_count,
        complexity,
        score: if is_unique {
            unique_score
        } else {
            near(match_count, complexity)
        },
    })
}

/// Expression used to resolve an attribute-valued locator.
fn attribute_selector(kind: LocatorKind, value: &str, tag: Option<&str>) -> Selector {
    match kind {
        LocatorKind::Id => Selector::css(format!("#{}", css_escape_ident(value))),
        LocatorKind::DataTestId => {
            let quoted = css_attr_value(value);
            Selector::css(format!("[data-testid={quoted}], [data-test-id={quoted}]"))
        }
        LocatorKind::AriaLabel => Selector::css(css_attr_selector("aria-label", value)),
        LocatorKind::XPathByName => Selector::xpath(format!(
            "//{}[@name={}]",
            tag.unwrap_or("*"),
            xpath_literal(value)
        )),
        _ => Selector::css(css_attr_selector("name", value)),
    }
}

/// First available locator in fixed priority order, unscored.
fn fallback(set: &CandidateSet, tag: Option<&str>) -> Option<BestLocator> {
    let attribute = |kind: LocatorKind, value: &str| {
        let selector = attribute_selector(kind, value, tag);
        let shown = if kind == LocatorKind::XPathByName {
            selector.as_str().to_string()
        } else {
            value.to_string()
        };
        (kind, shown, selector)
    };
    let expression =
        |kind: LocatorKind, value: &str| (kind, value.to_string(), Selector::detect(value));

    let ordered = [
        (Strategy::Id, LocatorKind::Id),
        (Strategy::DataTestId, LocatorKind::DataTestId),
        (Strategy::AriaLabel, LocatorKind::AriaLabel),
        (Strategy::CssSelector, LocatorKind::Css),
        (Strategy::Name, LocatorKind::XPathByName),
        (Strategy::XPathByLinkText, LocatorKind::LinkText),
        (Strategy::XPathByPartialLinkText, LocatorKind::PartialLinkText),
        (Strategy::RelativeXPath, LocatorKind::RelativeXPath),
        (Strategy::AbsoluteXPath, LocatorKind::AbsoluteXPath),
    ];

    let (kind, value, selector) = ordered.into_iter().find_map(|(strategy, kind)| {
        let value = set.get(strategy)?;
        Some(match kind {
            LocatorKind::Css => (kind, value.to_string(), Selector::css(value)),
            _ if strategy.is_attribute() => attribute(kind, value),
            _ => expression(kind, value),
        })
    })?;

    Some(BestLocator {
        kind,
        value,
        selector,
        score: None,
        stars: 1,
        match_count: None,
    })
}
