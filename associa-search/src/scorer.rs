//! Token scoring: snippet normalisation, frequency counting and top-K ranking.
//!
//! Each whitespace-delimited token of a snippet runs through:
//!
//! 1. trim + lowercase
//! 2. non-alphanumeric characters replaced by [`PLACEHOLDER`]
//! 3. stop-word filter
//! 4. escape sequences resolved, placeholders removed
//! 5. purely numeric tokens dropped
//! 6. non-empty survivors counted once
//!
//! Counts accumulate in a shared [`TokenCounts`] so several snippets (or
//! several tasks) can feed the same ranking.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::stop_words;

/// Marker for stripped characters, removed again after unescaping.
pub const PLACEHOLDER: char = '\0';

/// Result of scoring a single snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    /// Every token of the snippet was processed.
    Complete {
        /// Number of tokens that incremented a counter.
        counted: usize,
    },
    /// A counter hit `u32::MAX`; the rest of the snippet was skipped.
    Overflowed {
        /// Number of tokens counted before the overflow.
        counted: usize,
    },
}

impl ScoreOutcome {
    /// Number of tokens that incremented a counter.
    pub fn counted(&self) -> usize {
        match self {
            Self::Complete { counted } | Self::Overflowed { counted } => *counted,
        }
    }

    /// Returns `true` if scoring stopped early because of an overflow.
    pub fn is_overflowed(&self) -> bool {
        matches!(self, Self::Overflowed { .. })
    }
}

/// Concurrency-safe token → count map shared across snippets.
#[derive(Debug, Default)]
pub struct TokenCounts {
    inner: DashMap<String, u32>,
}

impl TokenCounts {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment `token` by one, returning the new count.
    ///
    /// Returns `None` and leaves the count untouched if it would overflow.
    pub fn increment(&self, token: String) -> Option<u32> {
        let mut count = self.inner.entry(token).or_insert(0);
        let next = count.checked_add(1)?;
        *count = next;
        Some(next)
    }

    /// Set the count of `token` directly.
    pub fn insert(&self, token: impl Into<String>, count: u32) {
        self.inner.insert(token.into(), count);
    }

    /// Current count of `token`, if it has been seen.
    pub fn get(&self, token: &str) -> Option<u32> {
        self.inner.get(token).map(|count| *count)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no token has been counted.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `k` highest-counted tokens, skipping `excluded`.
    ///
    /// Ordered by descending count; equal counts are ordered by token text
    /// ascending so the ranking is deterministic.
    pub fn top_k(&self, k: usize, excluded: &HashSet<String>) -> Vec<String> {
        let mut ranked: Vec<(String, u32)> = self
            .inner
            .iter()
            .filter(|entry| !excluded.contains(entry.key()))
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(k);

        ranked.into_iter().map(|(token, _)| token).collect()
    }
}

/// Turns free-text snippets into token counts.
///
/// Holds only the stop-word configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct TokenScorer {
    extra_stop_words: HashSet<String>,
}

impl TokenScorer {
    /// Create a scorer using the built-in English stop words.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stop words on top of the built-in list.
    pub fn with_extra_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_stop_words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    /// Returns `true` if `word` is a built-in or configured stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        stop_words::is_stop_word(word) || self.extra_stop_words.contains(word)
    }

    /// Run one raw token through the normalisation pipeline.
    ///
    /// Returns `None` if the token is discarded (stop word, numeric or empty).
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let lowered = raw.trim().to_lowercase();

        let stripped = strip_special_characters(&lowered);

        // `lowered` is `stripped` with the placeholders still readable, which
        // lets contractions like "it's" match the list.
        if self.is_stop_word(&lowered) {
            return None;
        }

        let segment: String = unescape(&stripped)
            .chars()
            .filter(|c| *c != PLACEHOLDER)
            .collect();

        if segment.is_empty() || is_numeric(&segment) {
            return None;
        }
        // "the," only becomes "the" once the comma is gone.
        if self.is_stop_word(&segment) {
            return None;
        }

        Some(segment)
    }

    /// Score every token of `snippet` into `counts`.
    ///
    /// An overflowing counter stops the remainder of this snippet only;
    /// increments made before it are kept.
    pub fn score(&self, snippet: &str, counts: &TokenCounts) -> ScoreOutcome {
        let mut counted = 0;
        for raw in snippet.split_whitespace() {
            let Some(token) = self.normalize(raw) else {
                continue;
            };
            if counts.increment(token).is_none() {
                return ScoreOutcome::Overflowed { counted };
            }
            counted += 1;
        }
        ScoreOutcome::Complete { counted }
    }
}

/// Canonical form of a user-supplied word, comparable to scored tokens.
///
/// Lowercases and keeps alphanumeric characters only. Unlike
/// [`TokenScorer::normalize`] nothing is filtered out, so stop words and
/// numbers survive.
pub fn canonical_word(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Replace every non-alphanumeric character with [`PLACEHOLDER`].
fn strip_special_characters(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { PLACEHOLDER })
        .collect()
}

/// Resolve backslash escape sequences (`\n`, `\t`, `\uXXXX`, ...).
///
/// Unknown escapes yield the escaped character itself; a trailing lone
/// backslash is kept.
fn unescape(segment: &str) -> String {
    if !segment.contains('\\') {
        return segment.to_owned();
    }

    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn is_numeric(segment: &str) -> bool {
    segment.chars().all(char::is_numeric)
}
