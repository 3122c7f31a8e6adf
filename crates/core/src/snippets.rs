//! Keyword hits over whole-document text, merged into snippet windows.
//!
//! Unlike [`crate::align`], nothing here is geometric or approximate: hits are
//! literal case-insensitive occurrences, and nearby hits are coalesced so a
//! result list shows one snippet per cluster instead of one per hit.

use std::collections::HashSet;

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::text::{char_len, char_offset, char_slice};

/// Hits closer than this many chars share a snippet by default.
pub const DEFAULT_MERGE_DISTANCE: usize = 100;
/// Chars of context added on each side of a snippet by default.
pub const DEFAULT_CONTEXT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetOptions {
    pub merge_distance: usize,
    pub context_chars: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            merge_distance: DEFAULT_MERGE_DISTANCE,
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }
}

/// One keyword occurrence, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub start: usize,
    pub len: usize,
}

impl KeywordHit {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub start: usize,
    pub end: usize,
    pub text: String,
    /// Number of hits merged into this snippet.
    pub hits: usize,
}

/// Case-insensitive literal occurrences of every non-blank keyword, sorted
/// by start offset.
pub fn find_keyword_hits<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<KeywordHit> {
    let mut hits = Vec::new();

    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            continue;
        }

        let pattern = match RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(err) => {
                log::warn!("skipping keyword {keyword:?}: {err}");
                continue;
            }
        };

        for found in pattern.find_iter(text) {
            hits.push(KeywordHit {
                start: char_offset(text, found.start()),
                len: char_len(found.as_str()),
            });
        }
    }

    hits.sort_by_key(|hit| (hit.start, hit.len));
    hits.dedup();
    hits
}

/// Merge hits into snippet windows.
///
/// A hit starting within `merge_distance` chars of the current window's end
/// extends that window. Each window then gains `context_chars` on both sides,
/// clamped to the text. Snippets whose text repeats an earlier one are
/// dropped.
pub fn group_hits(text: &str, hits: &[KeywordHit], options: &SnippetOptions) -> Vec<Snippet> {
    let text_len = char_len(text);
    let mut sorted: Vec<KeywordHit> = hits.to_vec();
    sorted.sort_by_key(|hit| (hit.start, hit.len));

    let mut windows: Vec<(usize, usize, usize)> = Vec::new();
    for hit in sorted {
        match windows.last_mut() {
            Some((_, end, count)) if hit.start <= *end + options.merge_distance => {
                *end = (*end).max(hit.end());
                *count += 1;
            }
            _ => windows.push((hit.start, hit.end(), 1)),
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut snippets = Vec::with_capacity(windows.len());

    for (start, end, count) in windows {
        let start = start.saturating_sub(options.context_chars);
        let end = (end + options.context_chars).min(text_len);
        let snippet_text = char_slice(text, start, end).to_string();

        if !seen.insert(snippet_text.clone()) {
            continue;
        }

        snippets.push(Snippet {
            start,
            end,
            text: snippet_text,
            hits: count,
        });
    }

    log::debug!("grouped {} hits into {} snippets", hits.len(), snippets.len());

    snippets
}

/// [`find_keyword_hits`] followed by [`group_hits`].
pub fn keyword_snippets<S: AsRef<str>>(
    text: &str,
    keywords: &[S],
    options: &SnippetOptions,
) -> Vec<Snippet> {
    let hits = find_keyword_hits(text, keywords);
    group_hits(text, &hits, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(start: usize, len: usize) -> KeywordHit {
        KeywordHit { start, len }
    }

    #[test]
    fn test_find_keyword_hits_case_insensitive() {
        let hits = find_keyword_hits("Rust and rust and RUST", &["rust"]);
        assert_eq!(hits, vec![hit(0, 4), hit(9, 4), hit(18, 4)]);
    }

    #[test]
    fn test_find_keyword_hits_escapes_regex() {
        let hits = find_keyword_hits("a+b = c, a.b", &["a+b", "a.b"]);
        assert_eq!(hits, vec![hit(0, 3), hit(9, 3)]);
    }

    #[test]
    fn test_find_keyword_hits_skips_blank() {
        assert!(find_keyword_hits("anything", &["", "   "]).is_empty());
    }

    #[test]
    fn test_find_keyword_hits_char_offsets() {
        let hits = find_keyword_hits("café au lait", &["lait"]);
        assert_eq!(hits, vec![hit(8, 4)]);
    }

    #[test]
    fn test_group_hits_merges_nearby() {
        let text = "0123456789".repeat(5);
        let options = SnippetOptions {
            merge_distance: 5,
            context_chars: 2,
        };
        let snippets = group_hits(&text, &[hit(10, 2), hit(15, 2), hit(40, 2)], &options);

        assert_eq!(snippets.len(), 2);
        assert_eq!((snippets[0].start, snippets[0].end), (8, 19));
        assert_eq!(snippets[0].hits, 2);
        assert_eq!((snippets[1].start, snippets[1].end), (38, 44));
        assert_eq!(snippets[1].hits, 1);
    }

    #[test]
    fn test_group_hits_clamps_to_text() {
        let text = "short text";
        let snippets = group_hits(text, &[hit(0, 5)], &SnippetOptions::default());
        assert_eq!(snippets.len(), 1);
        assert_eq!((snippets[0].start, snippets[0].end), (0, 10));
        assert_eq!(snippets[0].text, "short text");
    }

    #[test]
    fn test_group_hits_suppresses_duplicate_text() {
        let text = "abc xyz abc xyz abc";
        let options = SnippetOptions {
            merge_distance: 0,
            context_chars: 0,
        };
        let snippets = group_hits(text, &[hit(0, 3), hit(8, 3), hit(16, 3)], &options);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "abc");
        assert_eq!(snippets[0].start, 0);
    }

    #[test]
    fn test_group_hits_unsorted_input() {
        let text = "a".repeat(100);
        let options = SnippetOptions {
            merge_distance: 0,
            context_chars: 0,
        };
        let snippets = group_hits(&text, &[hit(50, 1), hit(10, 1)], &options);
        assert_eq!(snippets.len(), 1, "both windows read \"a\"");
        assert_eq!(snippets[0].start, 10);
    }

    #[test]
    fn test_keyword_snippets_end_to_end() {
        let text = "The engine aligns text. Later, the engine projects rectangles.";
        let snippets = keyword_snippets(
            text,
            &["engine"],
            &SnippetOptions {
                merge_distance: 40,
                context_chars: 4,
            },
        );
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].hits, 2);
        assert!(snippets[0].text.starts_with("The engine"));
        assert!(snippets[0].text.ends_with("engine pro"));
    }

    #[test]
    fn test_group_hits_empty() {
        assert!(group_hits("text", &[], &SnippetOptions::default()).is_empty());
    }
}
