//! User-story parsing and document sectioning.
//!
//! A document carries a user-story section delimited by one pair of `###`
//! sentinels and an acceptance-criteria section delimited by a pair of `+++`
//! sentinels; when the second pair is absent, the acceptance criteria fall
//! back to everything after the user-story section. The user story itself
//! follows the syntax "As a [role], I want [goal] (so that [reason])."

use crate::errors::{AlignError, Result};

/// Sentinel pair delimiting the user-story section.
const STORY_SENTINEL: &str = "###";
/// Sentinel pair delimiting the acceptance-criteria section.
const CRITERIA_SENTINEL: &str = "+++";

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "etc.", "approx.", "i.e.", "cf.", "encl.", "p.a.", "Dr.", "Prof.", "no.",
];

// ============================================================================
// Document sectioning
// ============================================================================

/// Split a raw document into its user-story and acceptance-criteria texts.
///
/// Newlines are dropped first so the sentinel scan sees one line. A missing
/// user-story sentinel pair is a per-document parse failure; a missing
/// criteria pair falls back to the tail after the user-story section.
pub fn split_sections(input: &str) -> Result<(String, String)> {
    let flat = input.replace('\n', "");

    let story_open = flat.find(STORY_SENTINEL).ok_or_else(|| {
        AlignError::no_user_story("the user story section markers \"###\" were not found")
    })?;
    let story_body_start = story_open + STORY_SENTINEL.len();
    let story_close_rel = flat[story_body_start..].find(STORY_SENTINEL).ok_or_else(|| {
        AlignError::no_user_story("the closing user story section marker \"###\" was not found")
    })?;
    let story_body_end = story_body_start + story_close_rel;
    let story = flat[story_body_start..story_body_end].to_string();

    let after_story = &flat[story_body_end + STORY_SENTINEL.len()..];
    let criteria = match find_pair(after_story, CRITERIA_SENTINEL) {
        Some((start, end)) => after_story[start..end].to_string(),
        // no criteria sentinels: everything after the user-story section
        None => after_story.to_string(),
    };

    Ok((story, criteria))
}

/// Find the body between the first pair of `sentinel` markers, if both exist.
fn find_pair(haystack: &str, sentinel: &str) -> Option<(usize, usize)> {
    let open = haystack.find(sentinel)?;
    let body_start = open + sentinel.len();
    let close_rel = haystack[body_start..].find(sentinel)?;
    Some((body_start, body_start + close_rel))
}

// ============================================================================
// User story
// ============================================================================

/// A parsed user story: role, goal, and optional reason.
///
/// Substrings are sanitized (asterisks removed, whitespace collapsed), so
/// the reconstructed story text is single-space separated and the goal's
/// start offset within it is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStory {
    role: String,
    goal: String,
    reason: String,
    cut_at_list_or_note: bool,
}

impl UserStory {
    /// Parse a user story from a string.
    ///
    /// Returns a [`AlignError::NoUserStory`] when the role ("As a(n)") or
    /// goal ("I want") markers are missing.
    pub fn parse(raw: &str) -> Result<UserStory> {
        // Three or more dots are folded into a single ellipsis character so
        // they are not mistaken for a sentence ending.
        let normalized = fold_ellipses(raw);

        let as_a = find_ignore_ascii_case(&normalized, "as a", 0).ok_or_else(|| {
            AlignError::no_user_story(
                "a role could not be found; declare the role using the syntax \"As a(n) [role]\"",
            )
        })?;
        let mut story = normalized[as_a..].to_string();

        // A bullet point list or a note interrupts the story sentence;
        // everything from there on is cut, with a visible marker.
        let mut cut_at_list_or_note = false;
        if let Some(cut) = index_of_list_or_note(&story) {
            story.truncate(cut);
            story.push_str(" […]");
            cut_at_list_or_note = true;
        }

        let i_want = find_ignore_ascii_case(&story, "i want", 0).ok_or_else(|| {
            AlignError::no_user_story(
                "a goal could not be found; declare the goal after the role using the syntax \"I want [goal]\"",
            )
        })?;

        let role = sanitize(&story[..i_want]);

        let so_that = find_ignore_ascii_case(&story, "so that", i_want);
        let period = sentence_period_or_end(&story, i_want);

        let (goal, reason) = match so_that {
            Some(so_that) if so_that < period => (
                sanitize(&story[i_want..so_that]),
                sanitize(&story[so_that..period]),
            ),
            // no reason; that is fine, the story is still usable
            _ => (sanitize(&story[i_want..period]), String::new()),
        };

        Ok(UserStory {
            role,
            goal,
            reason,
            cut_at_list_or_note,
        })
    }

    /// The role part, "As a [role] "
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The goal part, "I want [goal]"
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// The reason part, "so that [reason]", empty when absent
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Check if the story carries a reason
    pub fn has_reason(&self) -> bool {
        !self.reason.is_empty()
    }

    /// Check if the story was cut at a bullet point list or note
    pub fn was_cut_at_list_or_note(&self) -> bool {
        self.cut_at_list_or_note
    }

    /// The reconstructed story text: role + goal + reason.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.role.len() + self.goal.len() + self.reason.len());
        out.push_str(&self.role);
        out.push_str(&self.goal);
        out.push_str(&self.reason);
        out
    }

    /// Character offset of the goal within the reconstructed story text.
    ///
    /// Goal-local topic offsets are shifted by this amount to relocate them
    /// into the full story text.
    pub fn goal_start(&self) -> usize {
        self.role.chars().count()
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

/// Remove asterisks and collapse whitespace runs to single spaces.
fn sanitize(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut pending_space = false;
    for ch in part.chars() {
        if ch == '*' {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    // a trailing whitespace run survives as one space, keeping the
    // role/goal/reason concatenation word-separated
    if pending_space {
        out.push(' ');
    }
    out
}

/// Fold runs of three or more dots into a single ellipsis character.
fn fold_ellipses(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut dots = 0usize;
    for ch in text.chars() {
        if ch == '.' {
            dots += 1;
            continue;
        }
        flush_dots(&mut out, dots);
        dots = 0;
        out.push(ch);
    }
    flush_dots(&mut out, dots);
    out
}

fn flush_dots(out: &mut String, dots: usize) {
    if dots >= 3 {
        out.push('…');
    } else {
        for _ in 0..dots {
            out.push('.');
        }
    }
}

/// Byte index of the first ASCII-case-insensitive occurrence of `needle`
/// in `haystack` at or after `from`.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || bytes.len() < pat.len() {
        return None;
    }
    (from..=bytes.len() - pat.len())
        .find(|&i| bytes[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

/// Byte index where a bullet point list (`* …`, `- …`) or a note (`\\ …`)
/// starts: a line break, optional whitespace, the marker, then whitespace.
fn index_of_list_or_note(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'\n' && b != b'\r' {
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() && bytes[j] != b'\n' {
            j += 1;
        }
        let marker_len = if j < bytes.len() && (bytes[j] == b'*' || bytes[j] == b'-') {
            1
        } else if j + 1 < bytes.len() && bytes[j] == b'\\' && bytes[j + 1] == b'\\' {
            2
        } else {
            continue;
        };
        let after = j + marker_len;
        if after < bytes.len() && bytes[after].is_ascii_whitespace() {
            return Some(i);
        }
    }
    None
}

/// Check if the period at `idx` ends a sentence: it must be followed by
/// whitespace (or nothing) and not terminate a common abbreviation.
fn is_sentence_ending(text: &str, idx: usize) -> bool {
    match text.as_bytes().get(idx + 1) {
        None => true,
        Some(next) if next.is_ascii_whitespace() => !ABBREVIATIONS
            .iter()
            .any(|abbr| text[..=idx].ends_with(abbr)),
        Some(_) => false,
    }
}

/// Byte index just past the first sentence period at or after `from`, or
/// the end of the string when none qualifies.
fn sentence_period_or_end(text: &str, from: usize) -> usize {
    let mut idx = from;
    while let Some(rel) = text[idx..].find('.') {
        let period = idx + rel;
        if is_sentence_ending(text, period) {
            return period + 1;
        }
        idx = period + 1;
    }
    text.len()
}
