//! One synthesis and ranking cycle per inspected element.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::candidate::CandidateSet;
use crate::config::EngineConfig;
use crate::dom::Document;
use crate::ranker::{BestLocator, Ranker, Ranking};
use crate::result::LocatorResult;
use crate::synthesizer::Synthesizer;

/// Candidates and ranking for one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub candidates: CandidateSet,
    pub ranking: Ranking,
}

impl Inspection {
    /// The recommended locator, if any
    #[must_use]
    pub const fn best(&self) -> Option<&BestLocator> {
        self.ranking.best.as_ref()
    }

    /// Serialize for the messaging layer
    pub fn to_json(&self) -> LocatorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Synthesizer and ranker sharing one configuration.
///
/// # Example
///
/// ```
/// use pinpoint::prelude::*;
///
/// let doc = Document::parse(r#"<form><input id="email"><input id="pw"></form>"#);
/// let engine = LocatorEngine::default();
/// let inspection = engine.inspect(&doc, doc.resolve("#email").unwrap());
/// let best = inspection.best().unwrap();
/// assert_eq!(best.kind, LocatorKind::Id);
/// assert_eq!(best.stars, 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocatorEngine {
    synthesizer: Synthesizer,
    ranker: Ranker,
}

impl LocatorEngine {
    /// Create an engine from configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let ranker = Ranker::from_config(&config);
        Self {
            synthesizer: Synthesizer::new(config),
            ranker,
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        self.synthesizer.config()
    }

    /// The synthesizer
    #[must_use]
    pub const fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// The ranker
    #[must_use]
    pub const fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Synthesize and rank. The text, class and tag XPaths form the pool.
    #[must_use]
    pub fn inspect(&self, doc: &Document, element: Option<ElementRef<'_>>) -> Inspection {
        let span = debug_span!(target: "pinpoint", "inspect");
        let _enter = span.enter();

        let candidates = self.synthesizer.synthesize(doc, element);
        let pool = xpath_pool(&candidates);
        let ranking = self.ranker.rank_with_pool(&candidates, doc, &pool);
        Inspection {
            candidates,
            ranking,
        }
    }

    /// Like [`Self::inspect`] with extra pool XPaths appended.
    #[must_use]
    pub fn inspect_with_pool(
        &self,
        doc: &Document,
        element: Option<ElementRef<'_>>,
        extra: &[String],
    ) -> Inspection {
        let span = debug_span!(target: "pinpoint", "inspect", extra = extra.len());
        let _enter = span.enter();

        let candidates = self.synthesizer.synthesize(doc, element);
        let mut pool = xpath_pool(&candidates);
        pool.extend(extra.iter().cloned());
        let ranking = self.ranker.rank_with_pool(&candidates, doc, &pool);
        Inspection {
            candidates,
            ranking,
        }
    }
}

fn xpath_pool(candidates: &CandidateSet) -> Vec<String> {
    [
        &candidates.xpath_by_text,
        &candidates.xpath_by_class_name,
        &candidates.xpath_by_tag_name,
    ]
    .into_iter()
    .flatten()
    .cloned()
    .collect()
}
