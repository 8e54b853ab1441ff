//! Integration tests for criteria_align
//!
//! These exercise the full pipeline: document sectioning, user-story
//! parsing, topic extraction, pool matching, scoring, span alignment and
//! batch assembly, through the public API only.

use criteria_align::engine::{BatchRequest, Dataset, Document};
use criteria_align::{
    Annotation, CalculationParams, CompletenessEngine, KeywordExtractor, MemoryTaxonomy,
    OptimalMatcher, WordCategory,
};

/// mouse -> rodent -> mammal -> animal, rat -> rodent, house -> building,
/// worker -> person; "rodent" also resolves as a word of its own.
fn taxonomy() -> MemoryTaxonomy {
    MemoryTaxonomy::new()
        .with_word("mouse", WordCategory::Noun, "mouse")
        .with_word("rat", WordCategory::Noun, "rat")
        .with_word("rodent", WordCategory::Noun, "rodent")
        .with_word("house", WordCategory::Noun, "house")
        .with_word("worker", WordCategory::Noun, "worker")
        .with_word("person", WordCategory::Noun, "person")
        .with_hypernym("mouse", "rodent")
        .with_hypernym("rat", "rodent")
        .with_hypernym("rodent", "mammal")
        .with_hypernym("mammal", "animal")
        .with_hypernym("house", "building")
        .with_hypernym("worker", "person")
}

fn engine() -> CompletenessEngine<KeywordExtractor, MemoryTaxonomy> {
    CompletenessEngine::new(KeywordExtractor::new(), taxonomy())
}

fn document(id: u64, story: &str, criteria: &str) -> Document {
    Document {
        id,
        text: format!("### {} ### +++ {} +++", story, criteria),
    }
}

// ============================================================================
// Scoring scenarios
// ============================================================================

#[test]
fn test_identical_concept_is_fully_complete() {
    let engine = engine();
    let params = CalculationParams::default().with_threshold_depth(3);
    let doc = document(1, "As a user I want a mouse.", "A mouse appears.");

    let result = engine.process_document(&doc, &params).unwrap();
    assert_eq!(result.completeness, 1.0);
}

#[test]
fn test_unrelated_concept_scores_zero() {
    let engine = engine();
    let params = CalculationParams::default().with_threshold_depth(3);
    // mouse and house share no bounded is-a chain
    let doc = document(1, "As a user I want a mouse.", "A house appears.");

    let result = engine.process_document(&doc, &params).unwrap();
    assert_eq!(result.completeness, 0.0);
}

#[test]
fn test_half_covered_story_scores_one_half() {
    let engine = engine();
    let params = CalculationParams::default().with_threshold_depth(3);
    // worker matches worker; mouse finds nothing in "house"
    let doc = document(
        1,
        "As a user I want a mouse and a worker.",
        "A house helps the worker.",
    );

    let result = engine.process_document(&doc, &params).unwrap();
    assert_eq!(result.completeness, 0.5);
}

#[test]
fn test_hypernym_within_threshold_matches() {
    let engine = engine();
    let params = CalculationParams::default().with_threshold_depth(3);
    // mouse -> rodent is a chain of depth 1
    let doc = document(1, "As a user I want a mouse.", "A rodent appears.");

    let result = engine.process_document(&doc, &params).unwrap();
    assert_eq!(result.completeness, 1.0);
}

#[test]
fn test_hypernym_beyond_threshold_does_not_match() {
    let engine = engine();
    // depth bound is exclusive: a chain of length 1 needs threshold >= 2
    let params = CalculationParams::default().with_threshold_depth(1);
    let doc = document(1, "As a user I want a mouse.", "A rodent appears.");

    let result = engine.process_document(&doc, &params).unwrap();
    assert_eq!(result.completeness, 0.0);
}

#[test]
fn test_weighted_mode_combines_pool_ratios() {
    let engine = engine();
    let params = CalculationParams::default()
        .with_threshold_depth(3)
        .weighted(0.8);
    // resolved pool: mouse (matches rodent), house (matches nothing) -> 1/2
    // literal pool: gizmo (exact match) -> 1/1
    // 0.8 * 0.5 + 0.2 * 1.0 = 0.6
    let doc = document(
        1,
        "As a user I want a mouse house gizmo.",
        "The rodent gizmo appears.",
    );

    let result = engine.process_document(&doc, &params).unwrap();
    assert!((result.completeness - 0.6).abs() < 1e-12);
}

#[test]
fn test_empty_goal_concepts_score_zero_not_nan() {
    let engine = engine();
    let params = CalculationParams::default();
    // every goal token is a function word, so the source pools are empty
    let doc = document(1, "As a user I want it.", "A mouse appears.");

    let result = engine.process_document(&doc, &params).unwrap();
    assert_eq!(result.completeness, 0.0);
    assert!(!result.completeness.is_nan());
}

#[test]
fn test_duplicate_targets_never_lower_the_score() {
    let engine = engine();
    let params = CalculationParams::default().with_threshold_depth(3);

    let single = document(1, "As a user I want a mouse.", "A mouse appears.");
    let doubled = document(2, "As a user I want a mouse.", "A mouse meets a mouse.");

    let a = engine.process_document(&single, &params).unwrap();
    let b = engine.process_document(&doubled, &params).unwrap();
    assert!(b.completeness >= a.completeness);
}

// ============================================================================
// Alignment output
// ============================================================================

#[test]
fn test_alignment_annotations_cover_all_cases() {
    let engine = engine();
    let params = CalculationParams::default().with_threshold_depth(3);
    // mouse matches; rat stays unmatched; function words carry no concept
    let doc = document(
        1,
        "As a user I want a mouse and a rat.",
        "A mouse appears.",
    );

    let rendered = engine
        .process_document(&doc, &params)
        .unwrap()
        .into_document_result();

    let matched: Vec<&str> = rendered
        .mapping
        .iter()
        .filter(|r| r.annotation == Annotation::Complete)
        .map(|r| r.display_text.as_str())
        .collect();
    assert_eq!(matched, vec!["mouse"]);

    // the display span keeps the original token, trailing period included
    let unmatched: Vec<&str> = rendered
        .mapping
        .iter()
        .filter(|r| r.annotation == Annotation::NonComplete)
        .map(|r| r.display_text.as_str())
        .collect();
    assert_eq!(unmatched, vec!["rat."]);

    assert!(rendered
        .mapping
        .iter()
        .any(|r| r.annotation == Annotation::NoConcept));
}

#[test]
fn test_alignment_counterparts_point_at_the_other_side() {
    let engine = engine();
    let params = CalculationParams::default().with_threshold_depth(3);
    let doc = document(1, "As a user I want a mouse today.", "A rodent appears.");

    let rendered = engine
        .process_document(&doc, &params)
        .unwrap()
        .into_document_result();

    let us_span = rendered
        .mapping
        .iter()
        .find(|r| r.annotation == Annotation::Complete)
        .unwrap();
    assert_eq!(us_span.display_text, "mouse");
    assert_eq!(us_span.matched_counterpart.as_deref(), Some("rodent"));

    let ac_span = rendered
        .ac_mapping
        .iter()
        .find(|r| r.annotation == Annotation::Complete)
        .unwrap();
    assert_eq!(ac_span.display_text, "rodent");
    assert_eq!(ac_span.matched_counterpart.as_deref(), Some("mouse"));
}

#[test]
fn test_story_text_fields_are_reconstructed() {
    let engine = engine();
    let params = CalculationParams::default();
    let doc = document(
        1,
        "As a worker I want a mouse so that my work is easier.",
        "A mouse appears.",
    );

    let rendered = engine
        .process_document(&doc, &params)
        .unwrap()
        .into_document_result();

    assert!(rendered.user_story_text.starts_with("As a worker "));
    assert!(rendered.user_story_goal.starts_with("I want a mouse"));
    assert!(rendered.user_story_text.contains("so that"));
    assert_eq!(rendered.acceptance_criteria_text.trim(), "A mouse appears.");
}

// ============================================================================
// Batch semantics
// ============================================================================

#[test]
fn test_batch_skips_broken_documents_and_averages_the_rest() {
    let engine = engine();
    let request = BatchRequest {
        dataset: Dataset {
            documents: vec![
                document(1, "As a user I want a mouse.", "A mouse appears."),
                Document {
                    id: 2,
                    text: "this document has no story section".to_string(),
                },
                document(3, "As a user I want a mouse.", "A house appears."),
            ],
        },
        params: CalculationParams::default().with_threshold_depth(3),
    };

    let response = engine.run_batch(&request);

    assert_eq!(response.metrics.error_count, 1);
    assert_eq!(response.topics.completeness_results.len(), 2);
    // (1.0 + 0.0) / 2
    assert_eq!(response.metrics.avg_completeness, 0.5);
    let ids: Vec<u64> = response
        .topics
        .completeness_results
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_batch_json_round_trip() {
    let engine = engine();
    let body = r####"{
        "dataset": {"documents": [
            {"id": 1, "text": "### As a user I want a mouse. ### +++ A mouse appears. +++"},
            {"id": 2, "text": "### As a user I want a mouse. ### +++ A house appears. +++"}
        ]},
        "params": {"thresholdDepth": 3, "mode": "unified"}
    }"####;

    let response = engine.run_json(body).unwrap();
    let json: serde_json::Value = serde_json::from_str(&response).unwrap();

    assert_eq!(json["metrics"]["avg_completeness"], 0.5);
    assert_eq!(json["metrics"]["error_count"], 0);
    let results = json["topics"]["completeness_results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], 1);
    assert_eq!(results[0]["completeness"], 1.0);
    assert!(results[0].get("mapping").is_some());
    assert!(results[0].get("acMapping").is_some());
}

#[test]
fn test_malformed_request_fails_before_processing() {
    let engine = engine();
    assert!(engine.run_json("{}").is_err());
    assert!(engine.run_json("not json").is_err());
    // weighted mode without alpha
    let body = r#"{
        "dataset": {"documents": []},
        "params": {"thresholdDepth": 3, "mode": "weighted"}
    }"#;
    assert!(engine.run_json(body).is_err());
}

// ============================================================================
// Matching policies
// ============================================================================

#[test]
fn test_policies_agree_on_uncontended_documents() {
    let params = CalculationParams::default().with_threshold_depth(3);
    let doc = document(1, "As a user I want a mouse and a worker.", "The worker gets a mouse.");

    let greedy = engine().process_document(&doc, &params).unwrap();
    let optimal = CompletenessEngine::new(KeywordExtractor::new(), taxonomy())
        .with_policy(OptimalMatcher)
        .process_document(&doc, &params)
        .unwrap();

    assert_eq!(greedy.completeness, 1.0);
    assert_eq!(optimal.completeness, 1.0);
}

#[test]
fn test_optimal_policy_resolves_contended_targets() {
    let params = CalculationParams::default().with_threshold_depth(3);
    // both rat and mouse relate to rodent, but rat also matches literally;
    // the assignment can cover both sources with distinct targets
    let doc = document(1, "As a user I want a rat and a mouse.", "The rodent chases the rat.");

    let optimal = CompletenessEngine::new(KeywordExtractor::new(), taxonomy())
        .with_policy(OptimalMatcher)
        .process_document(&doc, &params)
        .unwrap();

    assert_eq!(optimal.completeness, 1.0);
}
