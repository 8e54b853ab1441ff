//! Lexical relatedness resolution.
//!
//! This module wraps lookups into a lexical taxonomy behind the
//! [`LexicalTaxonomy`] trait: resolving a (word, category) pair to its
//! primary sense, and testing bounded-depth taxonomic relatedness between
//! two senses. The per-document [`LexicalCache`] is an explicit value that
//! is created for one document and dropped with it — it is never shared
//! across documents or requests.

pub mod memory;

use crate::errors::Result;
use crate::types::WordCategory;
use rustc_hash::FxHashMap;

pub use memory::MemoryTaxonomy;

// ============================================================================
// Sense & Entry
// ============================================================================

/// Opaque identifier of one word sense within a taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenseId(pub u64);

/// The resolved primary sense for one (word, category) pair.
///
/// Transient: entries live at most as long as the document that resolved
/// them (via its [`LexicalCache`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalEntry {
    /// The looked-up word
    pub word: String,
    /// The category the word was tagged with
    pub category: WordCategory,
    /// The primary sense the taxonomy resolved the pair to
    pub sense: SenseId,
}

impl LexicalEntry {
    /// Create a new entry
    pub fn new(word: impl Into<String>, category: WordCategory, sense: SenseId) -> Self {
        Self {
            word: word.into(),
            category,
            sense,
        }
    }
}

// ============================================================================
// Taxonomy trait
// ============================================================================

/// Boundary to the external lexical taxonomy service.
///
/// # Contract
///
/// - `resolve` returns the primary sense for a word tagged with one of the
///   four open word classes; any other category (including `Unknown`) yields
///   `Ok(None)` and the word is treated as literal by callers.
/// - `relate` returns the shortest hypernym (is-a) chain length connecting
///   the two senses in either direction, provided it is strictly less than
///   `max_depth`; otherwise `Ok(None)`. Identical senses are related at
///   depth 0. `max_depth` is caller-supplied configuration.
/// - An `Err` signals the taxonomy itself is unreachable. Callers degrade to
///   literal-only treatment for the affected word; they never abort the
///   document.
pub trait LexicalTaxonomy {
    /// Resolve the primary sense for `word` tagged `category`
    fn resolve(&self, word: &str, category: WordCategory) -> Result<Option<LexicalEntry>>;

    /// Shortest hypernym-chain depth between two senses, bounded by
    /// `max_depth` (exclusive)
    fn relate(&self, a: &LexicalEntry, b: &LexicalEntry, max_depth: usize)
        -> Result<Option<usize>>;
}

// ============================================================================
// Per-document cache
// ============================================================================

/// Cache of resolved (word, category) pairs for a single document.
///
/// Lexical lookups are blocking calls into an external resource; within one
/// document the same word is often resolved once per owning topic. The cache
/// deduplicates those lookups. It is an explicit value passed through the
/// matching functions, not ambient state, and must not outlive its document.
#[derive(Debug, Default)]
pub struct LexicalCache {
    entries: FxHashMap<(String, WordCategory), Option<LexicalEntry>>,
    hits: usize,
    misses: usize,
}

impl LexicalCache {
    /// Create an empty cache for one document
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve through the cache, consulting the taxonomy only on a miss.
    ///
    /// Both positive and negative resolutions are cached; a taxonomy failure
    /// is not cached and is returned to the caller to handle (degrade).
    pub fn resolve<T: LexicalTaxonomy + ?Sized>(
        &mut self,
        taxonomy: &T,
        word: &str,
        category: WordCategory,
    ) -> Result<Option<LexicalEntry>> {
        if !category.is_lexical() {
            return Ok(None);
        }

        let key = (word.to_string(), category);
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(cached.clone());
        }

        let resolved = taxonomy.resolve(word, category)?;
        self.misses += 1;
        self.entries.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Number of lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of lookups forwarded to the taxonomy
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Number of distinct (word, category) pairs seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
