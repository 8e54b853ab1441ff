//! Greedy first-candidate matching policy.
//!
//! For each source word the target pool is scanned in extraction order and
//! the first qualifying candidate is taken. This is not a globally optimal
//! assignment, and target words are not consumed: two source words may both
//! match the same target word.

use crate::matcher::{MatchContext, MatchKind, MatchOutcome, MatchPolicy};
use tracing::debug;

/// The default matching policy: greedy, first candidate in extraction order.
///
/// # Contract
///
/// - Literal pass first: an unresolved source word matches the first
///   unresolved target word with case-sensitive string equality.
/// - Semantic pass second: a resolved source word matches the first resolved
///   target word whose sense is related within the threshold depth.
/// - Each source word matches at most one target word.
/// - The matching map is keyed by the owning source topic; when several
///   words of one topic match, the later write wins. Because the semantic
///   pass runs second, a semantic match overwrites a literal one for the
///   same topic.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatcher;

impl MatchPolicy for GreedyMatcher {
    fn match_pools(&self, ctx: &MatchContext<'_>) -> MatchOutcome {
        let mut outcome = MatchOutcome {
            literal_total: ctx.source.literal.len(),
            semantic_total: ctx.source.resolved.len(),
            ..MatchOutcome::default()
        };

        // Literal pass: case-sensitive exact equality, first candidate.
        for src in &ctx.source.literal {
            for tgt in &ctx.target.literal {
                if src.word == tgt.word {
                    outcome.record(
                        &ctx.source_topics[src.topic_idx],
                        &ctx.target_topics[tgt.topic_idx],
                        MatchKind::Literal,
                    );
                    outcome.literal_found += 1;
                    break;
                }
            }
        }

        // Semantic pass: bounded-depth taxonomic relation, first candidate.
        for src in &ctx.source.resolved {
            let Some(src_entry) = src.entry.as_ref() else {
                continue;
            };
            for tgt in &ctx.target.resolved {
                let Some(tgt_entry) = tgt.entry.as_ref() else {
                    continue;
                };
                match ctx.taxonomy.relate(src_entry, tgt_entry, ctx.threshold_depth) {
                    Ok(Some(depth)) => {
                        outcome.record(
                            &ctx.source_topics[src.topic_idx],
                            &ctx.target_topics[tgt.topic_idx],
                            MatchKind::Semantic { depth },
                        );
                        outcome.semantic_found += 1;
                        break;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        // Relatedness failures degrade to "unrelated" for
                        // this candidate pair; the document continues.
                        debug!(word = %src.word, %err, "relate failed, treating pair as unrelated");
                    }
                }
            }
        }

        outcome
    }
}
