//! Optimal assignment matching policy.
//!
//! Builds the bipartite qualification graph for each pool (literal equality,
//! bounded-depth taxonomic relation) and computes a maximum matching with
//! Kuhn's augmenting-path algorithm. Unlike the greedy policy, each target
//! word is consumed by at most one source word, and the number of matched
//! source words is maximal.

use crate::matcher::{MatchContext, MatchKind, MatchOutcome, MatchPolicy, PoolWord};
use crate::types::Topic;
use tracing::debug;

/// Maximum-cardinality bipartite matching policy.
///
/// The matching map keeps the greedy policy's contract: keyed by the owning
/// source topic, last writer wins across the words of one topic.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalMatcher;

/// One qualifying source-target edge.
struct Edge {
    target: usize,
    kind: MatchKind,
}

/// Maximum bipartite matching over an adjacency list. Returns, per source
/// word, the chosen edge index into its adjacency list.
fn maximum_matching(adjacency: &[Vec<Edge>], target_count: usize) -> Vec<Option<usize>> {
    // target -> source currently matched to it
    let mut owner: Vec<Option<usize>> = vec![None; target_count];
    // source -> index into its adjacency list
    let mut chosen: Vec<Option<usize>> = vec![None; adjacency.len()];

    fn augment(
        src: usize,
        adjacency: &[Vec<Edge>],
        owner: &mut [Option<usize>],
        chosen: &mut [Option<usize>],
        visited: &mut [bool],
    ) -> bool {
        for (edge_idx, edge) in adjacency[src].iter().enumerate() {
            if visited[edge.target] {
                continue;
            }
            visited[edge.target] = true;

            let free = match owner[edge.target] {
                None => true,
                Some(other) => augment(other, adjacency, owner, chosen, visited),
            };
            if free {
                owner[edge.target] = Some(src);
                chosen[src] = Some(edge_idx);
                return true;
            }
        }
        false
    }

    for src in 0..adjacency.len() {
        let mut visited = vec![false; target_count];
        augment(src, adjacency, &mut owner, &mut chosen, &mut visited);
    }

    chosen
}

/// Apply a pool's matching to the outcome, in source extraction order so the
/// last-writer-wins rule stays deterministic.
fn apply(
    outcome: &mut MatchOutcome,
    source_pool: &[PoolWord],
    target_pool: &[PoolWord],
    source_topics: &[Topic],
    target_topics: &[Topic],
    adjacency: &[Vec<Edge>],
    chosen: &[Option<usize>],
) -> usize {
    let mut found = 0;
    for (src_idx, choice) in chosen.iter().enumerate() {
        let Some(edge_idx) = choice else { continue };
        let edge = &adjacency[src_idx][*edge_idx];
        outcome.record(
            &source_topics[source_pool[src_idx].topic_idx],
            &target_topics[target_pool[edge.target].topic_idx],
            edge.kind,
        );
        found += 1;
    }
    found
}

impl MatchPolicy for OptimalMatcher {
    fn match_pools(&self, ctx: &MatchContext<'_>) -> MatchOutcome {
        let mut outcome = MatchOutcome {
            literal_total: ctx.source.literal.len(),
            semantic_total: ctx.source.resolved.len(),
            ..MatchOutcome::default()
        };

        // Literal qualification graph: case-sensitive equality.
        let literal_adj: Vec<Vec<Edge>> = ctx
            .source
            .literal
            .iter()
            .map(|src| {
                ctx.target
                    .literal
                    .iter()
                    .enumerate()
                    .filter(|(_, tgt)| src.word == tgt.word)
                    .map(|(target, _)| Edge {
                        target,
                        kind: MatchKind::Literal,
                    })
                    .collect()
            })
            .collect();

        let chosen = maximum_matching(&literal_adj, ctx.target.literal.len());
        let found = apply(
            &mut outcome,
            &ctx.source.literal,
            &ctx.target.literal,
            ctx.source_topics,
            ctx.target_topics,
            &literal_adj,
            &chosen,
        );
        outcome.literal_found += found;

        // Semantic qualification graph: relatedness within the threshold.
        let semantic_adj: Vec<Vec<Edge>> = ctx
            .source
            .resolved
            .iter()
            .map(|src| {
                let Some(src_entry) = src.entry.as_ref() else {
                    return Vec::new();
                };
                ctx.target
                    .resolved
                    .iter()
                    .enumerate()
                    .filter_map(|(target, tgt)| {
                        let tgt_entry = tgt.entry.as_ref()?;
                        match ctx.taxonomy.relate(src_entry, tgt_entry, ctx.threshold_depth) {
                            Ok(Some(depth)) => Some(Edge {
                                target,
                                kind: MatchKind::Semantic { depth },
                            }),
                            Ok(None) => None,
                            Err(err) => {
                                debug!(word = %src.word, %err, "relate failed, edge dropped");
                                None
                            }
                        }
                    })
                    .collect()
            })
            .collect();

        let chosen = maximum_matching(&semantic_adj, ctx.target.resolved.len());
        let found = apply(
            &mut outcome,
            &ctx.source.resolved,
            &ctx.target.resolved,
            ctx.source_topics,
            ctx.target_topics,
            &semantic_adj,
            &chosen,
        );
        outcome.semantic_found += found;

        outcome
    }
}
