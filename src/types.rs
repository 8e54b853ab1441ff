//! Core types for criteria_align
//!
//! This module defines the fundamental data structures used throughout the
//! library: extracted concepts (topics), relationships between them, the
//! per-text extraction result, and the scoring configuration.

use crate::errors::{AlignError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Word Category
// ============================================================================

/// Grammatical category of a topic, as tagged by the extraction collaborator.
///
/// Only the four open word classes can be resolved against the lexical
/// taxonomy; anything else is treated as `Unknown` and matched literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
    #[default]
    Unknown,
}

impl WordCategory {
    /// Check if this category can be looked up in the lexical taxonomy
    pub fn is_lexical(&self) -> bool {
        !matches!(self, WordCategory::Unknown)
    }

    /// Parse from an extraction tag such as "NOUN", "Verb" or "adj".
    ///
    /// Empty or unrecognized tags map to `Unknown`, which forces literal
    /// treatment of the topic's words.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "noun" | "n" | "propn" => WordCategory::Noun,
            "verb" | "v" => WordCategory::Verb,
            "adjective" | "adj" | "a" => WordCategory::Adjective,
            "adverb" | "adv" | "r" => WordCategory::Adverb,
            _ => WordCategory::Unknown,
        }
    }

    /// Get the tag string for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            WordCategory::Noun => "noun",
            WordCategory::Verb => "verb",
            WordCategory::Adjective => "adjective",
            WordCategory::Adverb => "adverb",
            WordCategory::Unknown => "unknown",
        }
    }
}

// ============================================================================
// Topic
// ============================================================================

/// An extracted concept phrase with a grammatical category and character
/// offsets local to the exact text it was extracted from.
///
/// Topics are created once by the extraction collaborator and never mutated.
/// Equality (and hashing) is defined by the surface string only, so the same
/// phrase extracted at two positions compares equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// The surface string (non-empty)
    text: String,
    /// Grammatical category of the phrase
    category: WordCategory,
    /// Start character offset in the source text
    start: usize,
    /// End character offset in the source text (start <= end)
    end: usize,
}

impl Topic {
    /// Create a new topic.
    ///
    /// Returns an error for an empty surface string or inverted offsets.
    pub fn new(
        text: impl Into<String>,
        category: WordCategory,
        start: usize,
        end: usize,
    ) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(AlignError::invalid_config("topic surface must be non-empty"));
        }
        if start > end {
            return Err(AlignError::invalid_config(format!(
                "topic offsets inverted: start {} > end {}",
                start, end
            )));
        }
        Ok(Self {
            text,
            category,
            start,
            end,
        })
    }

    /// The surface string
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The grammatical category
    pub fn category(&self) -> WordCategory {
        self.category
    }

    /// Start character offset in the source text
    pub fn start(&self) -> usize {
        self.start
    }

    /// End character offset in the source text
    pub fn end(&self) -> usize {
        self.end
    }

    /// Recorded width of the phrase in characters (`end - start`)
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// A copy of this topic with both offsets shifted right by `delta`.
    ///
    /// Used by the engine to relocate goal-local offsets into the full
    /// user-story text; the topic itself stays immutable.
    pub fn shifted(&self, delta: usize) -> Topic {
        Topic {
            text: self.text.clone(),
            category: self.category,
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Split the surface string into its constituent whitespace-separated
    /// words, each inheriting the topic's own category.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Topic {}

impl std::hash::Hash for Topic {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

// ============================================================================
// Relationship
// ============================================================================

/// An ordered pair of topics plus a relation label.
///
/// Relationships are carried through for display only; scoring never consumes
/// them. Equality ignores the label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// The left-hand (subject) topic
    pub left: Topic,
    /// The right-hand (object) topic
    pub right: Topic,
    /// The relation label, e.g. "wants" or "contains"
    pub label: String,
}

impl Relationship {
    /// Create a new relationship
    pub fn new(left: Topic, right: Topic, label: impl Into<String>) -> Self {
        Self {
            left,
            right,
            label: label.into(),
        }
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for Relationship {}

// ============================================================================
// Extraction Result
// ============================================================================

/// The concepts and relationships extracted from one text.
///
/// Produced once per document per side (user-story goal, acceptance-criteria
/// text) and never mutated afterwards. Topic offsets are local to the text
/// the result was extracted from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    topics: Vec<Topic>,
    relationships: Vec<Relationship>,
}

impl ExtractionResult {
    /// Create a new extraction result
    pub fn new(topics: Vec<Topic>, relationships: Vec<Relationship>) -> Self {
        Self {
            topics,
            relationships,
        }
    }

    /// The extracted topics, in extraction order
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// The extracted relationships
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Check if no topics were extracted
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// A copy of this result with every topic offset shifted right by
    /// `delta`. Relationships are shifted alongside their topics.
    pub fn shifted(&self, delta: usize) -> ExtractionResult {
        ExtractionResult {
            topics: self.topics.iter().map(|t| t.shifted(delta)).collect(),
            relationships: self
                .relationships
                .iter()
                .map(|r| {
                    Relationship::new(
                        r.left.shifted(delta),
                        r.right.shifted(delta),
                        r.label.clone(),
                    )
                })
                .collect(),
        }
    }
}

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Aggregation mode for the completeness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Single pooled ratio over all source words
    #[default]
    Unified,
    /// Alpha-weighted combination of the semantic and literal ratios
    Weighted,
}

/// Configuration for one completeness calculation.
///
/// Deserialized from the `params` object of a batch request; field names on
/// the wire are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationParams {
    /// Maximum taxonomic chain depth; two senses are related when a hypernym
    /// chain strictly shorter than this connects them. Must be >= 1.
    pub threshold_depth: usize,
    /// Scoring mode
    #[serde(default)]
    pub mode: ScoringMode,
    /// Weight of the semantic ratio, in [0, 1]. Required iff mode is
    /// `weighted`; ignored in `unified` mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl Default for CalculationParams {
    fn default() -> Self {
        Self {
            threshold_depth: 3,
            mode: ScoringMode::Unified,
            alpha: None,
        }
    }
}

impl CalculationParams {
    /// Create params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.threshold_depth == 0 {
            return Err(AlignError::invalid_config("thresholdDepth must be >= 1"));
        }

        match (self.mode, self.alpha) {
            (ScoringMode::Weighted, None) => Err(AlignError::invalid_config(
                "alpha is required in weighted mode",
            )),
            (ScoringMode::Weighted, Some(alpha)) if !(0.0..=1.0).contains(&alpha) => {
                Err(AlignError::invalid_config(format!(
                    "alpha must be between 0 and 1, got {}",
                    alpha
                )))
            }
            _ => Ok(()),
        }
    }

    /// Builder method: set the relatedness depth threshold
    pub fn with_threshold_depth(mut self, depth: usize) -> Self {
        self.threshold_depth = depth;
        self
    }

    /// Builder method: select unified scoring
    pub fn unified(mut self) -> Self {
        self.mode = ScoringMode::Unified;
        self.alpha = None;
        self
    }

    /// Builder method: select weighted scoring with the given alpha
    pub fn weighted(mut self, alpha: f64) -> Self {
        self.mode = ScoringMode::Weighted;
        self.alpha = Some(alpha);
        self
    }
}
