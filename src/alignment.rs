//! Span alignment building.
//!
//! Reprojects topic-level match results back onto the whitespace token
//! sequence of one side's original text for display. The walk tracks a
//! running character offset of `token length + 1` per step (accounting for
//! the separating space); a topic whose start offset equals the current
//! offset opens a span, which greedily consumes tokens until the rendered
//! width reaches the topic's recorded width. Each side is built
//! independently, because topic offsets are local to their own source text.

use crate::matcher::MatchOutcome;
use crate::types::Topic;
use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// Per-span annotation for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Annotation {
    /// The span is a matched topic; its counterpart is attached
    Complete,
    /// The span is an extracted topic with no match on the other side
    NonComplete,
    /// The token belongs to no extracted topic
    NoConcept,
}

/// Character offsets of a matched span on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanOffsets {
    /// Start offset of the topic in this side's text
    pub side_start: usize,
    /// End offset of the topic in this side's text
    pub side_end: usize,
    /// Start offset of the counterpart topic in the other side's text
    pub counterpart_start: usize,
    /// End offset of the counterpart topic in the other side's text
    pub counterpart_end: usize,
}

/// One display record: a rendered span of the original token sequence with
/// its annotation and, for complete spans, the matched counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentRecord {
    /// The rendered text, one or more original tokens joined by spaces
    pub display_text: String,
    /// The span annotation
    pub annotation: Annotation,
    /// Surface string of the counterpart topic, for complete spans
    #[serde(rename = "matchedCounterpart", skip_serializing_if = "Option::is_none")]
    pub matched_counterpart: Option<String>,
    /// Offsets on both sides, for complete spans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsets: Option<SpanOffsets>,
}

// ============================================================================
// Builder
// ============================================================================

/// Builds the ordered alignment records for one side of a document.
#[derive(Debug)]
pub struct AlignmentBuilder<'a> {
    text: &'a str,
    topics: &'a [Topic],
    /// (this side's topic, counterpart topic), sorted by start offset so
    /// span selection is deterministic
    matched: Vec<(Topic, Topic)>,
}

impl<'a> AlignmentBuilder<'a> {
    /// Builder for the user-story side: matched spans are the matching
    /// map's keys, counterparts its values.
    pub fn source_side(text: &'a str, topics: &'a [Topic], outcome: &MatchOutcome) -> Self {
        let mut matched: Vec<(Topic, Topic)> = outcome
            .matches()
            .map(|m| (m.source.clone(), m.target.clone()))
            .collect();
        matched.sort_by(|a, b| (a.0.start(), a.0.text()).cmp(&(b.0.start(), b.0.text())));
        Self {
            text,
            topics,
            matched,
        }
    }

    /// Builder for the acceptance-criteria side: matched spans are the
    /// matching map's values, counterparts its keys.
    pub fn target_side(text: &'a str, topics: &'a [Topic], outcome: &MatchOutcome) -> Self {
        let mut matched: Vec<(Topic, Topic)> = outcome
            .matches()
            .map(|m| (m.target.clone(), m.source.clone()))
            .collect();
        matched.sort_by(|a, b| (a.0.start(), a.0.text()).cmp(&(b.0.start(), b.0.text())));
        Self {
            text,
            topics,
            matched,
        }
    }

    fn is_matched(&self, topic: &Topic) -> bool {
        self.matched.iter().any(|(side, _)| side == topic)
    }

    /// Walk the token sequence and produce the ordered display records.
    pub fn build(&self) -> Vec<AlignmentRecord> {
        let tokens: Vec<&str> = self.text.split_whitespace().collect();
        let mut records = Vec::with_capacity(tokens.len());

        let mut offset = 0usize;
        let mut i = 0usize;
        while i < tokens.len() {
            if let Some((side, counterpart)) =
                self.matched.iter().find(|(side, _)| side.start() == offset)
            {
                let (display, next, rendered) = extend_span(&tokens, i, side.width());
                records.push(AlignmentRecord {
                    display_text: display,
                    annotation: Annotation::Complete,
                    matched_counterpart: Some(counterpart.text().to_string()),
                    offsets: Some(SpanOffsets {
                        side_start: side.start(),
                        side_end: side.end(),
                        counterpart_start: counterpart.start(),
                        counterpart_end: counterpart.end(),
                    }),
                });
                offset += rendered + 1;
                i = next;
            } else if let Some(topic) = self
                .topics
                .iter()
                .find(|t| t.start() == offset && !self.is_matched(t))
            {
                let (display, next, rendered) = extend_span(&tokens, i, topic.width());
                records.push(AlignmentRecord {
                    display_text: display,
                    annotation: Annotation::NonComplete,
                    matched_counterpart: None,
                    offsets: None,
                });
                offset += rendered + 1;
                i = next;
            } else {
                records.push(AlignmentRecord {
                    display_text: tokens[i].to_string(),
                    annotation: Annotation::NoConcept,
                    matched_counterpart: None,
                    offsets: None,
                });
                offset += tokens[i].chars().count() + 1;
                i += 1;
            }
        }

        records
    }
}

/// Greedily extend a span starting at token `i` until its rendered width
/// reaches `width`. Returns the rendered text, the index of the first token
/// after the span, and the rendered character width.
fn extend_span(tokens: &[&str], i: usize, width: usize) -> (String, usize, usize) {
    let mut display = tokens[i].to_string();
    let mut rendered = tokens[i].chars().count();
    let mut j = i + 1;
    while rendered < width && j < tokens.len() {
        display.push(' ');
        display.push_str(tokens[j]);
        rendered += 1 + tokens[j].chars().count();
        j += 1;
    }
    (display, j, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchKind;
    use crate::types::WordCategory;

    fn topic(text: &str, start: usize) -> Topic {
        let width = text.chars().count();
        Topic::new(text, WordCategory::Noun, start, start + width).unwrap()
    }

    /// "I want a fast mouse for my desk"
    ///  0 2    7 9    14    20  24 27
    const TEXT: &str = "I want a fast mouse for my desk";

    #[test]
    fn test_no_concepts_yields_one_record_per_token() {
        let outcome = MatchOutcome::default();
        let records = AlignmentBuilder::source_side(TEXT, &[], &outcome).build();

        assert_eq!(records.len(), 8);
        assert!(records.iter().all(|r| r.annotation == Annotation::NoConcept));
        assert_eq!(records[1].display_text, "want");
    }

    #[test]
    fn test_matched_multiword_span_is_merged() {
        let fast_mouse = topic("fast mouse", 9);
        let counterpart = topic("rodent", 4);
        let topics = vec![fast_mouse.clone()];

        let mut outcome = MatchOutcome::default();
        outcome.record(&fast_mouse, &counterpart, MatchKind::Semantic { depth: 1 });

        let records = AlignmentBuilder::source_side(TEXT, &topics, &outcome).build();

        // I, want, a, [fast mouse], for, my, desk
        assert_eq!(records.len(), 7);
        let span = &records[3];
        assert_eq!(span.annotation, Annotation::Complete);
        assert_eq!(span.display_text, "fast mouse");
        assert_eq!(span.matched_counterpart.as_deref(), Some("rodent"));
        let offsets = span.offsets.unwrap();
        assert_eq!(offsets.side_start, 9);
        assert_eq!(offsets.side_end, 19);
        assert_eq!(offsets.counterpart_start, 4);
        assert_eq!(offsets.counterpart_end, 10);

        // the walk resumes cleanly after the merged span
        assert_eq!(records[4].display_text, "for");
        assert_eq!(records[4].annotation, Annotation::NoConcept);
    }

    #[test]
    fn test_unmatched_topic_is_non_complete() {
        let desk = topic("desk", 27);
        let topics = vec![desk];
        let outcome = MatchOutcome::default();

        let records = AlignmentBuilder::source_side(TEXT, &topics, &outcome).build();

        let last = records.last().unwrap();
        assert_eq!(last.annotation, Annotation::NonComplete);
        assert_eq!(last.display_text, "desk");
        assert!(last.matched_counterpart.is_none());
        assert!(last.offsets.is_none());
    }

    #[test]
    fn test_matched_span_reconstructs_topic_surface() {
        let fast_mouse = topic("fast mouse", 9);
        let counterpart = topic("mouse", 0);
        let topics = vec![fast_mouse.clone()];

        let mut outcome = MatchOutcome::default();
        outcome.record(&fast_mouse, &counterpart, MatchKind::Literal);

        let records = AlignmentBuilder::source_side(TEXT, &topics, &outcome).build();
        let span = records
            .iter()
            .find(|r| r.annotation == Annotation::Complete)
            .unwrap();

        assert_eq!(span.display_text, fast_mouse.text());
    }

    #[test]
    fn test_target_side_uses_counterpart_direction() {
        let ac_text = "a rodent on the desk";
        let rodent = topic("rodent", 2);
        let mouse = topic("mouse", 14); // user-story-side counterpart
        let ac_topics = vec![rodent.clone()];

        let mut outcome = MatchOutcome::default();
        // map key is the user-story topic, value the AC topic
        outcome.record(&mouse, &rodent, MatchKind::Semantic { depth: 1 });

        let records = AlignmentBuilder::target_side(ac_text, &ac_topics, &outcome).build();

        let span = &records[1];
        assert_eq!(span.annotation, Annotation::Complete);
        assert_eq!(span.display_text, "rodent");
        assert_eq!(span.matched_counterpart.as_deref(), Some("mouse"));
        let offsets = span.offsets.unwrap();
        assert_eq!(offsets.side_start, 2);
        assert_eq!(offsets.counterpart_start, 14);
    }

    #[test]
    fn test_annotation_wire_names() {
        assert_eq!(
            serde_json::to_string(&Annotation::Complete).unwrap(),
            r#""complete""#
        );
        assert_eq!(
            serde_json::to_string(&Annotation::NonComplete).unwrap(),
            r#""non-complete""#
        );
        assert_eq!(
            serde_json::to_string(&Annotation::NoConcept).unwrap(),
            r#""no-concept""#
        );
    }

    #[test]
    fn test_record_wire_shape() {
        let record = AlignmentRecord {
            display_text: "fast mouse".to_string(),
            annotation: Annotation::Complete,
            matched_counterpart: Some("rodent".to_string()),
            offsets: Some(SpanOffsets {
                side_start: 9,
                side_end: 19,
                counterpart_start: 4,
                counterpart_end: 10,
            }),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["displayText"], "fast mouse");
        assert_eq!(json["annotation"], "complete");
        assert_eq!(json["matchedCounterpart"], "rodent");
        assert_eq!(json["offsets"]["sideStart"], 9);

        // optional fields are omitted, not null
        let bare = AlignmentRecord {
            display_text: "for".to_string(),
            annotation: Annotation::NoConcept,
            matched_counterpart: None,
            offsets: None,
        };
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("matchedCounterpart").is_none());
        assert!(json.get("offsets").is_none());
    }
}
