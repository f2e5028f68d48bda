//! Pinpoint: locator synthesis and ranking for UI test automation
//!
//! Given an element of an HTML document, Pinpoint produces independent
//! CSS and XPath locator candidates, re-validates each one against the
//! document, scores them for uniqueness and robustness, and recommends a
//! single best locator with a 1-5 star rating.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PINPOINT Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌─────────────┐          │
//! │   │ Document   │    │ Synthesizer │    │ Ranker      │          │
//! │   │ (HTML +    │───►│ element ->  │───►│ score, pick │───► Best │
//! │   │  XPath)    │    │ candidates  │    │ best        │          │
//! │   └────────────┘    └─────────────┘    └─────────────┘          │
//! │                            │                                    │
//! │                            ▼                                    │
//! │                     ┌─────────────┐                             │
//! │                     │ Refinement  │  (optional, `llm` feature)  │
//! │                     │ payloads    │                             │
//! │                     └─────────────┘                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pinpoint::prelude::*;
//!
//! let doc = Document::parse(r#"<ul><li><a>Learn more</a></li><li><a>Learn more</a></li></ul>"#);
//! let target = doc.resolve("li:nth-of-type(2) > a").unwrap();
//!
//! let inspection = LocatorEngine::default().inspect(&doc, target);
//! let best = inspection.best().unwrap();
//! assert_eq!(best.match_count, Some(1));
//! assert_eq!(doc.resolve(best.selector.as_str()).unwrap(), target);
//! ```

#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod candidate;
pub mod config;
pub mod dom;
pub mod engine;
pub mod escape;
#[allow(clippy::cast_precision_loss)]
pub mod ranker;
pub mod refine;
mod result;
pub mod synthesizer;
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
pub mod xpath;

#[cfg(test)]
mod proptest_tests;

pub use candidate::{CandidateSet, ElementMetadata, Strategy};
pub use config::{ClassPolicy, EngineConfig};
pub use dom::Document;
pub use engine::{Inspection, LocatorEngine};
pub use ranker::{star_rating, BestLocator, LocatorKind, Ranker, Ranking, ScoredCandidate, Selector};
pub use refine::{parse_refinement_response, RefinedCheck, RefinedLocators, RefinementRequest};
pub use result::{LocatorError, LocatorResult};
pub use synthesizer::{absolute_xpath, indexed_if_needed, Synthesizer};
pub use xpath::XPath;

#[cfg(feature = "llm")]
pub use refine::RefinementClient;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::candidate::{CandidateSet, ElementMetadata, Strategy};
    pub use super::config::{ClassPolicy, EngineConfig};
    pub use super::dom::Document;
    pub use super::engine::{Inspection, LocatorEngine};
    pub use super::ranker::{BestLocator, LocatorKind, Ranker, Ranking, ScoredCandidate, Selector};
    pub use super::refine::{parse_refinement_response, RefinedLocators, RefinementRequest};
    pub use super::result::{LocatorError, LocatorResult};
    pub use super::synthesizer::Synthesizer;
    pub use scraper::ElementRef;
}
