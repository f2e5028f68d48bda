//! Engine configuration.
//!
//! Defaults reproduce the tuned constants of the synthesis heuristics; a
//! YAML or JSON file can override any subset of them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::{LocatorError, LocatorResult};

/// Attributes test authors use as identifiers, in priority order.
pub const DEFAULT_STABLE_ATTRIBUTES: &[&str] = &[
    "data-testid",
    "data-test-id",
    "data-test",
    "data-qa",
    "data-automation",
    "name",
    "aria-label",
    "placeholder",
    "title",
    "role",
    "for",
    "href",
    "src",
];

/// Class-name patterns treated as generated or state-dependent.
pub const DEFAULT_IGNORED_CLASS_PATTERNS: &[&str] = &[
    // purely numeric / punctuation
    r"^[\d_-]+$",
    // emotion, styled-components, styled-jsx
    r"^css-[A-Za-z0-9_-]+$",
    r"^sc-[A-Za-z0-9_-]+$",
    r"^jsx-\d+$",
    r"^emotion-\d+$",
    r"^styled-[A-Za-z0-9_-]+$",
    // svelte / astro scoping hashes
    r"^svelte-[A-Za-z0-9]+$",
    r"^astro-[A-Za-z0-9]+$",
    r"^tw-[a-z0-9]{6,}$",
    // JSS / Material UI makeStyles
    r"^(makeStyles|jss)[A-Za-z-]*\d+$",
    // CSS modules
    r"^_[A-Za-z0-9_-]{5,}$",
    r"^[A-Za-z][A-Za-z0-9-]*_[A-Za-z0-9-]+__[A-Za-z0-9_-]{5}$",
    // Angular state classes
    r"^ng-",
    // interaction state
    r"^(is-)?(active|focus|focused|hover|hovered|selected)$",
];

/// Default cap on ancestors walked by the CSS path fallback
pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 15;

/// Longest text used for a text XPath
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 60;

/// Characters of link text used by the partial-link-text XPath
pub const DEFAULT_PARTIAL_LINK_TEXT_LENGTH: usize = 20;

/// CSS selectors at or beyond this length score zero and lose tie-breaks
pub const DEFAULT_MAX_CSS_LENGTH: usize = 100;

/// Policy deciding which class names are usable in selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ClassPolicy {
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl ClassPolicy {
    /// Compile a policy from regex patterns.
    pub fn new<I, S>(patterns: I) -> LocatorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let compiled = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    LocatorError::config(format!("invalid class pattern {pattern:?}: {e}"))
                })
            })
            .collect::<LocatorResult<Vec<_>>>()?;
        Ok(Self { patterns, compiled })
    }

    /// A policy that only rejects empty class names
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            patterns: Vec::new(),
            compiled: Vec::new(),
        }
    }

    /// Source patterns
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether a class name must not appear in a generated selector.
    #[must_use]
    pub fn is_ignored(&self, class: &str) -> bool {
        let class = class.trim();
        class.is_empty() || self.compiled.iter().any(|re| re.is_match(class))
    }

    /// Classes that survive the policy, in their original order.
    pub fn usable<'c>(&self, classes: impl IntoIterator<Item = &'c str>) -> Vec<&'c str> {
        classes
            .into_iter()
            .filter(|class| !self.is_ignored(class))
            .collect()
    }
}

impl Default for ClassPolicy {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_IGNORED_CLASS_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            compiled: DEFAULT_IGNORED_CLASS_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }
}

impl TryFrom<Vec<String>> for ClassPolicy {
    type Error = LocatorError;

    fn try_from(patterns: Vec<String>) -> LocatorResult<Self> {
        Self::new(patterns)
    }
}

impl From<ClassPolicy> for Vec<String> {
    fn from(policy: ClassPolicy) -> Self {
        policy.patterns
    }
}

impl PartialEq for ClassPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
    }
}

/// Configuration for locator synthesis and ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stable attributes tried by the CSS and relative-XPath strategies
    pub stable_attributes: Vec<String>,
    /// Generated-class blocklist
    pub ignored_classes: ClassPolicy,
    /// Ancestors walked by the CSS path fallback
    pub max_ancestor_depth: usize,
    /// Longest trimmed text used by the text XPath
    pub max_text_length: usize,
    /// Prefix length for the partial-link-text XPath
    pub partial_link_text_length: usize,
    /// CSS length penalty threshold
    pub max_css_length: usize,
    /// Truncation for metadata text
    pub display_text_length: usize,
    /// Truncation for refinement context markup
    pub context_html_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stable_attributes: DEFAULT_STABLE_ATTRIBUTES
                .iter()
                .map(|a| (*a).to_string())
                .collect(),
            ignored_classes: ClassPolicy::default(),
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            partial_link_text_length: DEFAULT_PARTIAL_LINK_TEXT_LENGTH,
            max_css_length: DEFAULT_MAX_CSS_LENGTH,
            display_text_length: 100,
            context_html_length: 2000,
        }
    }
}

impl EngineConfig {
    /// Create a default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stable attribute list
    #[must_use]
    pub fn with_stable_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stable_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the class policy
    #[must_use]
    pub fn with_class_policy(mut self, policy: ClassPolicy) -> Self {
        self.ignored_classes = policy;
        self
    }

    /// Set the ancestor cap for the CSS path fallback
    #[must_use]
    pub const fn with_max_ancestor_depth(mut self, depth: usize) -> Self {
        self.max_ancestor_depth = depth;
        self
    }

    /// Set the text length limit for text XPaths
    #[must_use]
    pub const fn with_max_text_length(mut self, length: usize) -> Self {
        self.max_text_length = length;
        self
    }

    /// Set the CSS length penalty threshold
    #[must_use]
    pub const fn with_max_css_length(mut self, length: usize) -> Self {
        self.max_css_length = length;
        self
    }

    /// Reject settings that would disable core strategies.
    pub fn validate(&self) -> LocatorResult<()> {
        if self.max_ancestor_depth == 0 {
            return Err(LocatorError::config("max_ancestor_depth must be at least 1"));
        }
        if self.partial_link_text_length == 0 {
            return Err(LocatorError::config(
                "partial_link_text_length must be at least 1",
            ));
        }
        if self.max_css_length == 0 {
            return Err(LocatorError::config("max_css_length must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(source: &str) -> LocatorResult<Self> {
        let config: Self = serde_yaml_ng::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn from_json_str(source: &str) -> LocatorResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is read as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> LocatorResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
    }

    /// Serialize as YAML
    pub fn to_yaml(&self) -> LocatorResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
