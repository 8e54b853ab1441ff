//! Concept matching between two extraction results.
//!
//! Topics are decomposed into whitespace-separated words, each tagged with
//! its owning topic's category. Words that resolve against the lexical
//! taxonomy form the *resolved* pool; the rest form the *literal* pool.
//! A [`MatchPolicy`] then produces a one-to-one-per-source matching over the
//! pools, with per-pool totals and found counts for the scorer.
//!
//! ## Submodules
//!
//! - [`greedy`] — first-candidate policy (default)
//! - [`optimal`] — maximum bipartite assignment via augmenting paths

pub mod greedy;
pub mod optimal;

use crate::lexicon::{LexicalCache, LexicalEntry, LexicalTaxonomy};
use crate::types::{ExtractionResult, Topic};
use rustc_hash::FxHashMap;
use tracing::debug;

pub use greedy::GreedyMatcher;
pub use optimal::OptimalMatcher;

// ============================================================================
// Word pools
// ============================================================================

/// One word of a topic, carried with the index of its owning topic.
#[derive(Debug, Clone)]
pub struct PoolWord {
    /// The word itself
    pub word: String,
    /// Index of the owning topic in the side's topic list
    pub topic_idx: usize,
    /// The resolved sense; `None` for words in the literal pool
    pub entry: Option<LexicalEntry>,
}

/// The per-side decomposition of topics into resolved and literal words,
/// in extraction order.
#[derive(Debug, Clone, Default)]
pub struct WordPools {
    /// Words with a resolved taxonomy sense
    pub resolved: Vec<PoolWord>,
    /// Words treated literally (no sense, unknown category, or degraded
    /// after a taxonomy failure)
    pub literal: Vec<PoolWord>,
}

impl WordPools {
    /// Decompose one side's topics into word pools.
    ///
    /// Every topic surface is split on whitespace; each word inherits the
    /// topic's category and is resolved through the per-document `cache`.
    /// A taxonomy failure demotes the affected word to the literal pool
    /// instead of aborting the document.
    pub fn build<T: LexicalTaxonomy + ?Sized>(
        result: &ExtractionResult,
        taxonomy: &T,
        cache: &mut LexicalCache,
    ) -> WordPools {
        let mut pools = WordPools::default();

        for (topic_idx, topic) in result.topics().iter().enumerate() {
            for word in topic.words() {
                match cache.resolve(taxonomy, word, topic.category()) {
                    Ok(Some(entry)) => pools.resolved.push(PoolWord {
                        word: word.to_string(),
                        topic_idx,
                        entry: Some(entry),
                    }),
                    Ok(None) => pools.literal.push(PoolWord {
                        word: word.to_string(),
                        topic_idx,
                        entry: None,
                    }),
                    Err(err) => {
                        debug!(word, %err, "lexical lookup failed, treating word as literal");
                        pools.literal.push(PoolWord {
                            word: word.to_string(),
                            topic_idx,
                            entry: None,
                        });
                    }
                }
            }
        }

        pools
    }

    /// Total number of words across both pools
    pub fn len(&self) -> usize {
        self.resolved.len() + self.literal.len()
    }

    /// Check if both pools are empty
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.literal.is_empty()
    }
}

// ============================================================================
// Match outcome
// ============================================================================

/// How a source unit was matched to its target unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-sensitive exact string equality
    Literal,
    /// Bounded-depth taxonomic relation; `depth` is the hypernym-chain length
    Semantic { depth: usize },
}

/// One matched pair of topics, tagged with the kind of evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMatch {
    /// The source-side topic
    pub source: Topic,
    /// The target-side topic it was matched to
    pub target: Topic,
    /// The evidence kind
    pub kind: MatchKind,
}

/// The matching map plus the four pool counts the scorer aggregates.
///
/// The map is keyed by the source topic's surface string (topic equality is
/// surface-only). When multiple words of one multi-word topic each produce a
/// match, the later write wins — this is an explicit contract, not an
/// iteration-order accident.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    matches: FxHashMap<String, TopicMatch>,
    /// Source words in the literal pool
    pub literal_total: usize,
    /// Literal-pool source words for which a match was recorded
    pub literal_found: usize,
    /// Source words in the resolved pool
    pub semantic_total: usize,
    /// Resolved-pool source words for which a match was recorded
    pub semantic_found: usize,
}

impl MatchOutcome {
    /// Record a match for the owning source topic. Last writer wins.
    pub fn record(&mut self, source: &Topic, target: &Topic, kind: MatchKind) {
        self.matches.insert(
            source.text().to_string(),
            TopicMatch {
                source: source.clone(),
                target: target.clone(),
                kind,
            },
        );
    }

    /// The match recorded for a source topic, if any
    pub fn match_for(&self, source: &Topic) -> Option<&TopicMatch> {
        self.matches.get(source.text())
    }

    /// Iterate over all recorded matches (unordered)
    pub fn matches(&self) -> impl Iterator<Item = &TopicMatch> {
        self.matches.values()
    }

    /// Number of source topics with a recorded match
    pub fn matched_topic_count(&self) -> usize {
        self.matches.len()
    }
}

// ============================================================================
// Policy seam
// ============================================================================

/// Everything a matching policy needs for one document pair.
pub struct MatchContext<'a> {
    /// Source-side (user-story goal) word pools
    pub source: &'a WordPools,
    /// Target-side (acceptance-criteria) word pools
    pub target: &'a WordPools,
    /// Source-side topic list, indexed by `PoolWord::topic_idx`
    pub source_topics: &'a [Topic],
    /// Target-side topic list, indexed by `PoolWord::topic_idx`
    pub target_topics: &'a [Topic],
    /// The taxonomy used for relatedness checks
    pub taxonomy: &'a dyn LexicalTaxonomy,
    /// Maximum chain depth (exclusive) for semantic matches
    pub threshold_depth: usize,
}

/// Pluggable matching policy.
///
/// The default [`GreedyMatcher`] scans target words in extraction order and
/// takes the first qualifying candidate; [`OptimalMatcher`] solves a maximum
/// bipartite assignment instead. Both honor the same pool decomposition and
/// produce the same counts shape.
pub trait MatchPolicy {
    /// Match source words against target words, producing the matching map
    /// and counts
    fn match_pools(&self, ctx: &MatchContext<'_>) -> MatchOutcome;
}
