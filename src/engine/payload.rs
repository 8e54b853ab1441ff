//! Batch request and response payloads.
//!
//! Wire shapes follow the upstream API contract: requests carry a `dataset`
//! of documents and the calculation `params`; responses carry aggregate
//! `metrics` and the per-document completeness results under `topics`.

use crate::alignment::AlignmentRecord;
use crate::errors::{AlignError, Result};
use crate::types::CalculationParams;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

/// One raw document: an id and the sentinel-delimited text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier echoed back in the response
    pub id: u64,
    /// Raw text with user-story and acceptance-criteria sections
    pub text: String,
}

/// The documents of one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Documents, in request order
    pub documents: Vec<Document>,
}

/// A full batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The documents to process
    pub dataset: Dataset,
    /// The calculation configuration
    pub params: CalculationParams,
}

impl BatchRequest {
    /// Parse and validate a request from its JSON body.
    ///
    /// A missing `dataset` or `params` field, invalid JSON, or invalid
    /// params all fail the entire request before any document is processed.
    pub fn from_json(body: &str) -> Result<BatchRequest> {
        let request: BatchRequest = serde_json::from_str(body)
            .map_err(|err| AlignError::malformed_request(err.to_string()))?;
        request
            .params
            .validate()
            .map_err(|err| AlignError::malformed_request(err.to_string()))?;
        Ok(request)
    }
}

// ============================================================================
// Response
// ============================================================================

/// Aggregate batch metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean completeness over the successfully processed documents;
    /// 0 when none succeeded
    pub avg_completeness: f64,
    /// Number of documents skipped due to per-document failures
    pub error_count: usize,
}

/// The per-document result in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// The document id from the request
    pub id: u64,
    /// Reconstructed user story (role + goal + reason)
    pub user_story_text: String,
    /// The goal part of the user story
    pub user_story_goal: String,
    /// The acceptance-criteria section
    pub acceptance_criteria_text: String,
    /// Completeness score in [0, 1]
    pub completeness: f64,
    /// Ordered alignment records for the user-story side
    pub mapping: Vec<AlignmentRecord>,
    /// Ordered alignment records for the acceptance-criteria side
    #[serde(rename = "acMapping")]
    pub ac_mapping: Vec<AlignmentRecord>,
    /// Surface strings of the user-story topics, in extraction order
    pub user_story_topics: Vec<String>,
    /// Surface strings of the acceptance-criteria topics, in extraction order
    pub acceptance_criteria_topics: Vec<String>,
}

/// Container for the per-document results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicsSection {
    /// Results in request order, with failed documents omitted
    pub completeness_results: Vec<DocumentResult>,
}

/// A full batch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Aggregate metrics
    pub metrics: Metrics,
    /// Per-document results
    pub topics: TopicsSection,
}

impl BatchResponse {
    /// Serialize to the JSON wire shape
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScoringMode;

    #[test]
    fn test_request_parses_wire_shape() {
        let body = r####"{
            "dataset": {"documents": [{"id": 7, "text": "### As a user I want x ###"}]},
            "params": {"thresholdDepth": 3, "mode": "unified"}
        }"####;
        let request = BatchRequest::from_json(body).unwrap();
        assert_eq!(request.dataset.documents.len(), 1);
        assert_eq!(request.dataset.documents[0].id, 7);
        assert_eq!(request.params.mode, ScoringMode::Unified);
    }

    #[test]
    fn test_request_missing_dataset_is_malformed() {
        let err = BatchRequest::from_json(r#"{"params": {"thresholdDepth": 3}}"#).unwrap_err();
        assert!(matches!(err, AlignError::MalformedRequest { .. }));
        assert!(!err.is_document_scoped());
    }

    #[test]
    fn test_request_missing_params_is_malformed() {
        let err = BatchRequest::from_json(r#"{"dataset": {"documents": []}}"#).unwrap_err();
        assert!(matches!(err, AlignError::MalformedRequest { .. }));
    }

    #[test]
    fn test_request_invalid_params_is_malformed() {
        // weighted mode without alpha fails request validation
        let body = r#"{
            "dataset": {"documents": []},
            "params": {"thresholdDepth": 3, "mode": "weighted"}
        }"#;
        let err = BatchRequest::from_json(body).unwrap_err();
        assert!(matches!(err, AlignError::MalformedRequest { .. }));
    }

    #[test]
    fn test_request_invalid_json_is_malformed() {
        let err = BatchRequest::from_json("not json").unwrap_err();
        assert!(matches!(err, AlignError::MalformedRequest { .. }));
    }

    #[test]
    fn test_response_wire_names() {
        let response = BatchResponse {
            metrics: Metrics {
                avg_completeness: 0.5,
                error_count: 1,
            },
            topics: TopicsSection {
                completeness_results: vec![DocumentResult {
                    id: 1,
                    user_story_text: "As a user I want x".to_string(),
                    user_story_goal: "I want x".to_string(),
                    acceptance_criteria_text: "x happens".to_string(),
                    completeness: 1.0,
                    mapping: vec![],
                    ac_mapping: vec![],
                    user_story_topics: vec!["x".to_string()],
                    acceptance_criteria_topics: vec!["x".to_string()],
                }],
            },
        };

        let json: serde_json::Value =
            serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(json["metrics"]["avg_completeness"], 0.5);
        let result = &json["topics"]["completeness_results"][0];
        assert_eq!(result["id"], 1);
        assert!(result.get("acMapping").is_some());
        assert!(result.get("user_story_topics").is_some());
    }
}
