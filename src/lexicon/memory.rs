//! In-memory lexical taxonomy.
//!
//! A small hypernym graph held entirely in memory. It backs the test suites
//! and serves as a local fallback when no external taxonomy service is
//! wired in. Sense labels are interned to dense ids; relatedness is a
//! breadth-first search along hypernym (is-a) edges.

use crate::errors::Result;
use crate::lexicon::{LexicalEntry, LexicalTaxonomy, SenseId};
use crate::types::WordCategory;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// A lexical taxonomy backed by an explicit in-memory hypernym graph.
#[derive(Debug, Default)]
pub struct MemoryTaxonomy {
    /// (word, category) -> primary sense
    senses: FxHashMap<(String, WordCategory), SenseId>,
    /// sense -> its direct hypernyms
    hypernyms: FxHashMap<SenseId, Vec<SenseId>>,
    /// sense label -> interned id
    label_to_id: FxHashMap<String, SenseId>,
    /// interned labels, indexed by id
    labels: Vec<String>,
}

impl MemoryTaxonomy {
    /// Create an empty taxonomy
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a sense label, returning its id
    fn sense_id(&mut self, label: &str) -> SenseId {
        if let Some(&id) = self.label_to_id.get(label) {
            return id;
        }
        let id = SenseId(self.labels.len() as u64);
        self.label_to_id.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        id
    }

    /// Register `word` under `category` with the given primary sense label.
    ///
    /// Returns `self` for chaining in the builder style.
    pub fn with_word(mut self, word: &str, category: WordCategory, sense_label: &str) -> Self {
        let sense = self.sense_id(sense_label);
        self.senses.insert((word.to_string(), category), sense);
        self
    }

    /// Register an is-a edge: `child_label` is a kind of `parent_label`.
    pub fn with_hypernym(mut self, child_label: &str, parent_label: &str) -> Self {
        let child = self.sense_id(child_label);
        let parent = self.sense_id(parent_label);
        self.hypernyms.entry(child).or_default().push(parent);
        self
    }

    /// The label of a sense, if known
    pub fn label(&self, sense: SenseId) -> Option<&str> {
        self.labels.get(sense.0 as usize).map(|s| s.as_str())
    }

    /// Number of registered (word, category) pairs
    pub fn len(&self) -> usize {
        self.senses.len()
    }

    /// Check if no words are registered
    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }

    /// Depth of the shortest upward hypernym chain from `from` to `to`,
    /// bounded by `max_depth` (exclusive). Depth 0 means identity.
    fn upward_depth(&self, from: SenseId, to: SenseId, max_depth: usize) -> Option<usize> {
        if from == to {
            return Some(0);
        }

        let mut visited: FxHashMap<SenseId, ()> = FxHashMap::default();
        let mut queue = VecDeque::new();
        visited.insert(from, ());
        queue.push_back((from, 0usize));

        while let Some((sense, depth)) = queue.pop_front() {
            let next_depth = depth + 1;
            if next_depth >= max_depth {
                continue;
            }
            for &parent in self.hypernyms.get(&sense).map(Vec::as_slice).unwrap_or(&[]) {
                if parent == to {
                    return Some(next_depth);
                }
                if visited.insert(parent, ()).is_none() {
                    queue.push_back((parent, next_depth));
                }
            }
        }

        None
    }
}

impl LexicalTaxonomy for MemoryTaxonomy {
    fn resolve(&self, word: &str, category: WordCategory) -> Result<Option<LexicalEntry>> {
        if !category.is_lexical() {
            return Ok(None);
        }
        Ok(self
            .senses
            .get(&(word.to_string(), category))
            .map(|&sense| LexicalEntry::new(word, category, sense)))
    }

    fn relate(
        &self,
        a: &LexicalEntry,
        b: &LexicalEntry,
        max_depth: usize,
    ) -> Result<Option<usize>> {
        // A chain may run in either direction; take the shorter one.
        let up = self.upward_depth(a.sense, b.sense, max_depth);
        let down = self.upward_depth(b.sense, a.sense, max_depth);
        Ok(match (up, down) {
            (Some(u), Some(d)) => Some(u.min(d)),
            (Some(u), None) => Some(u),
            (None, Some(d)) => Some(d),
            (None, None) => None,
        })
    }
}
