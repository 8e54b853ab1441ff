//! # criteria_align
//!
//! A library for scoring how completely a set of acceptance criteria covers
//! the intent of its user story, with span-level alignment for display.
//!
//! The pipeline per document:
//!
//! 1. **Section** the raw text into its user-story and acceptance-criteria
//!    parts ([`story::split_sections`]) and parse the story's role, goal and
//!    reason ([`story::UserStory`]).
//! 2. **Extract** topics from the goal and the criteria through the
//!    [`extraction::TopicExtractor`] seam.
//! 3. **Decompose** topics into words and partition them into resolved and
//!    literal pools against a [`lexicon::LexicalTaxonomy`]
//!    ([`matcher::WordPools`]).
//! 4. **Match** the pools under a pluggable [`matcher::MatchPolicy`]
//!    (greedy first-candidate by default, maximum bipartite assignment as an
//!    alternative).
//! 5. **Score** the match counts into a completeness value in [0, 1]
//!    ([`scoring::score_completeness`]).
//! 6. **Align** the matches back onto both token sequences for display
//!    ([`alignment::AlignmentBuilder`]).
//!
//! Batches run in parallel, per-document failures are isolated, and the
//! response preserves request order ([`engine::CompletenessEngine`]).
//!
//! ## Example
//!
//! ```
//! use criteria_align::engine::CompletenessEngine;
//! use criteria_align::extraction::KeywordExtractor;
//! use criteria_align::lexicon::MemoryTaxonomy;
//! use criteria_align::types::{CalculationParams, WordCategory};
//! use criteria_align::engine::Document;
//!
//! let taxonomy = MemoryTaxonomy::new()
//!     .with_word("mouse", WordCategory::Noun, "mouse")
//!     .with_hypernym("mouse", "rodent");
//! let engine = CompletenessEngine::new(KeywordExtractor::new(), taxonomy);
//!
//! let document = Document {
//!     id: 1,
//!     text: "### As a user I want a mouse. ### +++ A mouse appears. +++".to_string(),
//! };
//! let result = engine
//!     .process_document(&document, &CalculationParams::default())
//!     .unwrap();
//! assert_eq!(result.completeness, 1.0);
//! ```

pub mod alignment;
pub mod engine;
pub mod errors;
pub mod extraction;
pub mod lexicon;
pub mod matcher;
pub mod scoring;
pub mod story;
pub mod types;

pub use alignment::{AlignmentBuilder, AlignmentRecord, Annotation};
pub use engine::{BatchRequest, BatchResponse, CompletenessEngine, CompletenessResult, Document};
pub use errors::{AlignError, Result};
pub use extraction::{KeywordExtractor, TopicExtractor};
pub use lexicon::{LexicalCache, LexicalEntry, LexicalTaxonomy, MemoryTaxonomy};
pub use matcher::{GreedyMatcher, MatchOutcome, MatchPolicy, OptimalMatcher};
pub use scoring::score_completeness;
pub use story::UserStory;
pub use types::{CalculationParams, ExtractionResult, ScoringMode, Topic, WordCategory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
