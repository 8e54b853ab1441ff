//! Topic extraction boundary.
//!
//! The engine consumes extraction through the [`TopicExtractor`] trait; the
//! heavyweight open-information extraction lives outside this crate. The
//! built-in [`KeywordExtractor`] is a lightweight stand-in: it walks the
//! whitespace token sequence with the same cumulative `length + 1` offset
//! accounting the alignment builder uses, filters function words, and tags
//! categories with a suffix heuristic.

use crate::errors::Result;
use crate::types::{ExtractionResult, Topic, WordCategory};

/// Boundary to the extraction collaborator.
///
/// # Contract
///
/// - Offsets in the returned result are character positions local to `text`.
/// - Topics are returned in extraction order.
/// - The same `text` always yields the same result (no internal randomness).
pub trait TopicExtractor {
    /// Extract topics and relationships from one text
    fn extract(&self, text: &str) -> Result<ExtractionResult>;
}

/// Function words skipped by the built-in extractor.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "i", "you", "he", "she", "it", "we", "they", "me", "my", "your", "his",
    "her", "its", "our", "their", "as", "at", "by", "for", "from", "in", "into", "of", "on",
    "to", "with", "and", "or", "but", "so", "that", "this", "these", "those", "is", "are",
    "was", "were", "be", "been", "being", "am", "do", "does", "did", "have", "has", "had",
    "can", "could", "will", "would", "shall", "should", "may", "might", "must", "want", "not",
    "no", "if", "then", "than", "when", "while", "there", "here",
];

/// A self-contained keyword extractor producing one single-word topic per
/// content token.
///
/// Useful for tests and for running the engine without an external
/// extraction service. Leading and trailing punctuation is trimmed from the
/// topic surface; the topic's start offset stays at the token start so span
/// alignment keeps working.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    /// Create a new keyword extractor
    pub fn new() -> Self {
        Self
    }

    /// Suffix-based category heuristic, intentionally simple.
    fn guess_category(word: &str) -> WordCategory {
        let lower = word.to_lowercase();
        if lower.ends_with("ly") {
            WordCategory::Adverb
        } else if lower.ends_with("ize")
            || lower.ends_with("ise")
            || lower.ends_with("ate")
            || lower.ends_with("ify")
        {
            WordCategory::Verb
        } else if lower.ends_with("ful")
            || lower.ends_with("ous")
            || lower.ends_with("ive")
            || lower.ends_with("able")
            || lower.ends_with("ible")
            || lower.ends_with("al")
        {
            WordCategory::Adjective
        } else {
            WordCategory::Noun
        }
    }
}

impl TopicExtractor for KeywordExtractor {
    fn extract(&self, text: &str) -> Result<ExtractionResult> {
        let mut topics = Vec::new();
        let mut offset = 0usize;

        for token in text.split_whitespace() {
            let token_len = token.chars().count();
            let core = token.trim_matches(|c: char| !c.is_alphanumeric());

            if !core.is_empty() && !FUNCTION_WORDS.contains(&core.to_lowercase().as_str()) {
                let width = core.chars().count();
                // offset of the core within the token (leading punctuation)
                let lead = token
                    .chars()
                    .take_while(|c| !c.is_alphanumeric())
                    .count();
                let start = offset + lead;
                topics.push(Topic::new(
                    core,
                    Self::guess_category(core),
                    start,
                    start + width,
                )?);
            }

            offset += token_len + 1;
        }

        Ok(ExtractionResult::new(topics, vec![]))
    }
}
