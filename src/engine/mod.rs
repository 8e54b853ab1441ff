//! Per-document pipeline and batch assembly.
//!
//! For each document the engine splits the sentinel sections, parses the
//! user story, extracts topics from the goal and the acceptance criteria,
//! matches the two concept sets, scores completeness, and reprojects the
//! matches onto both token sequences. Documents are independent and
//! side-effect-free, so the batch runs in parallel while the response
//! preserves request order. A single document's parse or extraction failure
//! is logged and skipped; it never aborts the batch.
//!
//! ## Submodules
//!
//! - [`payload`] — request/response wire types

pub mod payload;

use crate::alignment::AlignmentBuilder;
use crate::errors::Result;
use crate::extraction::TopicExtractor;
use crate::lexicon::{LexicalCache, LexicalTaxonomy};
use crate::matcher::{GreedyMatcher, MatchContext, MatchOutcome, MatchPolicy, WordPools};
use crate::scoring::score_completeness;
use crate::story::{split_sections, UserStory};
use crate::types::{CalculationParams, ExtractionResult, Topic};
use rayon::prelude::*;
use tracing::{debug, info, warn};

pub use payload::{
    BatchRequest, BatchResponse, Dataset, Document, DocumentResult, Metrics, TopicsSection,
};

// ============================================================================
// Per-document result
// ============================================================================

/// The assembled result for one document.
///
/// Immutable once produced. The completeness score is always in [0, 1] and
/// never NaN; the matching map's keys are a subset of the user-story topics.
#[derive(Debug, Clone)]
pub struct CompletenessResult {
    /// The document id
    pub id: u64,
    /// The parsed user story
    pub story: UserStory,
    /// The acceptance-criteria text
    pub criteria_text: String,
    /// Completeness score
    pub completeness: f64,
    /// The matching map and pool counts
    pub outcome: MatchOutcome,
    /// User-story topics, offsets relocated into the full story text
    pub us_topics: Vec<Topic>,
    /// Acceptance-criteria topics
    pub ac_topics: Vec<Topic>,
}

impl CompletenessResult {
    /// Render into the wire shape, building both alignment sides.
    pub fn into_document_result(self) -> DocumentResult {
        let story_text = self.story.text();
        let mapping =
            AlignmentBuilder::source_side(&story_text, &self.us_topics, &self.outcome).build();
        let ac_mapping =
            AlignmentBuilder::target_side(&self.criteria_text, &self.ac_topics, &self.outcome)
                .build();

        DocumentResult {
            id: self.id,
            user_story_goal: self.story.goal().to_string(),
            user_story_text: story_text,
            acceptance_criteria_text: self.criteria_text,
            completeness: self.completeness,
            mapping,
            ac_mapping,
            user_story_topics: self.us_topics.iter().map(|t| t.text().to_string()).collect(),
            acceptance_criteria_topics: self
                .ac_topics
                .iter()
                .map(|t| t.text().to_string())
                .collect(),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// The completeness engine, generic over its two external collaborators.
///
/// The matching policy is pluggable; [`GreedyMatcher`] is the default.
pub struct CompletenessEngine<E, T> {
    extractor: E,
    taxonomy: T,
    policy: Box<dyn MatchPolicy + Send + Sync>,
}

impl<E, T> CompletenessEngine<E, T>
where
    E: TopicExtractor + Sync,
    T: LexicalTaxonomy + Sync,
{
    /// Create an engine with the default greedy matching policy
    pub fn new(extractor: E, taxonomy: T) -> Self {
        Self {
            extractor,
            taxonomy,
            policy: Box::new(GreedyMatcher),
        }
    }

    /// Builder method: replace the matching policy
    pub fn with_policy(mut self, policy: impl MatchPolicy + Send + Sync + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Process one document end to end.
    ///
    /// No state survives this call: the lexical cache is created here and
    /// dropped here, never shared across documents.
    pub fn process_document(
        &self,
        document: &Document,
        params: &CalculationParams,
    ) -> Result<CompletenessResult> {
        let (story_text, criteria_text) = split_sections(&document.text)?;
        let story = UserStory::parse(&story_text)?;

        // Goal-local offsets are shifted into the full story text; criteria
        // offsets are already local to the criteria text.
        let us_extraction = self
            .extractor
            .extract(story.goal())?
            .shifted(story.goal_start());
        let ac_extraction: ExtractionResult = self.extractor.extract(&criteria_text)?;

        let mut cache = LexicalCache::new();
        let us_pools = WordPools::build(&us_extraction, &self.taxonomy, &mut cache);
        let ac_pools = WordPools::build(&ac_extraction, &self.taxonomy, &mut cache);
        debug!(
            id = document.id,
            lookups = cache.misses(),
            cached = cache.hits(),
            "lexical resolution finished"
        );

        let outcome = self.policy.match_pools(&MatchContext {
            source: &us_pools,
            target: &ac_pools,
            source_topics: us_extraction.topics(),
            target_topics: ac_extraction.topics(),
            taxonomy: &self.taxonomy,
            threshold_depth: params.threshold_depth,
        });
        let completeness = score_completeness(&outcome, params);

        Ok(CompletenessResult {
            id: document.id,
            story,
            criteria_text,
            completeness,
            outcome,
            us_topics: us_extraction.topics().to_vec(),
            ac_topics: ac_extraction.topics().to_vec(),
        })
    }

    /// Process a batch, isolating per-document failures.
    ///
    /// Documents are processed in parallel; the response preserves request
    /// order. Failed documents are skipped with a warning and counted in
    /// `metrics.error_count`.
    pub fn run_batch(&self, request: &BatchRequest) -> BatchResponse {
        info!(
            documents = request.dataset.documents.len(),
            mode = ?request.params.mode,
            "processing batch"
        );

        let results: Vec<Result<CompletenessResult>> = request
            .dataset
            .documents
            .par_iter()
            .map(|document| self.process_document(document, &request.params))
            .collect();

        let mut completeness_results = Vec::with_capacity(results.len());
        let mut error_count = 0usize;
        let mut sum_completeness = 0.0f64;

        for (document, result) in request.dataset.documents.iter().zip(results) {
            match result {
                Ok(result) => {
                    sum_completeness += result.completeness;
                    completeness_results.push(result.into_document_result());
                }
                Err(err) => {
                    warn!(id = document.id, %err, "document skipped");
                    error_count += 1;
                }
            }
        }

        let avg_completeness = if completeness_results.is_empty() {
            0.0
        } else {
            sum_completeness / completeness_results.len() as f64
        };

        BatchResponse {
            metrics: Metrics {
                avg_completeness,
                error_count,
            },
            topics: TopicsSection {
                completeness_results,
            },
        }
    }

    /// JSON-body convenience wrapper: parse, validate, run, serialize.
    ///
    /// Request-shape failures are fatal and returned as errors before any
    /// document is processed.
    pub fn run_json(&self, body: &str) -> Result<String> {
        let request = BatchRequest::from_json(body)?;
        self.run_batch(&request).to_json()
    }
}
