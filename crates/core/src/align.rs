//! Approximate local matching of a query against page text.
//!
//! A verbatim hit is returned straight away. Otherwise a Smith-Waterman
//! local alignment finds the best scoring region of the page, and that
//! region is accepted only if its edit distance to the query stays under a
//! tenth of the query length.
//!
//! The scan order and traceback preference decide which region is reported
//! when several alignments score the same, so both are fixed:
//!
//! - the best cell is the first maximum in row-major order (page text outer,
//!   query inner);
//! - traceback prefers diagonal, then vertical (consume page text), then
//!   horizontal (consume query).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::{char_len, char_offset};

/// Score for aligning two equal chars.
pub const MATCH_SCORE: i32 = 2;
/// Score for aligning two different chars.
pub const MISMATCH_SCORE: i32 = -1;
/// Score for skipping a char on either side.
pub const GAP_SCORE: i32 = -1;

/// Accepted alignments must have an edit distance below
/// `query_len / TOLERANCE_DIVISOR`, i.e. under 10% of the query.
pub const TOLERANCE_DIVISOR: usize = 10;

/// A query located on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The page text that was matched. Not necessarily equal to the query.
    pub matched_text: String,
    /// Char offset of `matched_text` within the page text.
    pub start_offset: usize,
}

impl MatchResult {
    /// Char offset one past the end of the match.
    pub fn end_offset(&self) -> usize {
        self.start_offset + char_len(&self.matched_text)
    }
}

/// Why a query could not be placed on a page.
///
/// None of these are faults: callers render no highlight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("query is empty")]
    EmptyQuery,
    #[error("page has no text")]
    EmptyPage,
    #[error("no alignment scored above zero")]
    NoAlignment,
    #[error("best alignment has edit distance {distance}, not below 10% of query length {query_len}")]
    Rejected { distance: usize, query_len: usize },
}

/// The page-text span of the best local alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Char offset in the page text where the alignment starts.
    pub start: usize,
    /// Char offset one past where the alignment ends.
    pub end: usize,
    pub score: i32,
}

/// Locate `query` in `page_text`.
pub fn locate(page_text: &str, query: &str) -> Result<MatchResult, LocateError> {
    if query.is_empty() {
        return Err(LocateError::EmptyQuery);
    }
    if page_text.is_empty() {
        return Err(LocateError::EmptyPage);
    }

    if let Some(byte_offset) = page_text.find(query) {
        let start_offset = char_offset(page_text, byte_offset);
        log::debug!("exact match at offset {start_offset}");
        return Ok(MatchResult {
            matched_text: query.to_string(),
            start_offset,
        });
    }

    let page: Vec<char> = page_text.chars().collect();
    let needle: Vec<char> = query.chars().collect();

    let alignment = local_alignment(&page, &needle).ok_or(LocateError::NoAlignment)?;
    let matched_text: String = page[alignment.start..alignment.end].iter().collect();

    let distance = strsim::levenshtein(&matched_text, query);
    if !within_tolerance(distance, needle.len()) {
        log::debug!(
            "rejected alignment [{}, {}) score {}: edit distance {distance} for query of {} chars",
            alignment.start,
            alignment.end,
            alignment.score,
            needle.len()
        );
        return Err(LocateError::Rejected {
            distance,
            query_len: needle.len(),
        });
    }

    log::debug!(
        "approximate match [{}, {}) score {} edit distance {distance}",
        alignment.start,
        alignment.end,
        alignment.score
    );

    Ok(MatchResult {
        matched_text,
        start_offset: alignment.start,
    })
}

/// `distance < 0.10 * query_len`, evaluated without floating point.
///
/// This is stricter than the float comparison at some lengths: with
/// `query_len = 30`, `0.1 * 30.0` is `3.0000000000000004`, so a float gate
/// accepts a distance of 3 while this one rejects it.
pub fn within_tolerance(distance: usize, query_len: usize) -> bool {
    distance * TOLERANCE_DIVISOR < query_len
}

/// Best-scoring local alignment of `query` against `page`.
///
/// Returns `None` when no cell scores above zero.
pub fn local_alignment(page: &[char], query: &[char]) -> Option<Alignment> {
    let matrix = ScoreMatrix::fill(page, query);

    let (best_row, best_col, best_score) = matrix.best_cell();
    if best_score == 0 {
        return None;
    }

    let mut i = best_row;
    let mut j = best_col;
    while i > 0 && j > 0 {
        let cell = matrix.get(i, j);
        if cell <= 0 {
            break;
        }

        if cell == matrix.get(i - 1, j - 1) + substitution(page[i - 1], query[j - 1]) {
            i -= 1;
            j -= 1;
        } else if cell == matrix.get(i - 1, j) + GAP_SCORE {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    log::trace!("alignment traceback ({best_row}, {best_col}) -> ({i}, {j}) score {best_score}");

    Some(Alignment {
        start: i,
        end: best_row,
        score: best_score,
    })
}

fn substitution(a: char, b: char) -> i32 {
    if a == b {
        MATCH_SCORE
    } else {
        MISMATCH_SCORE
    }
}

/// Full `(rows + 1) x (cols + 1)` Smith-Waterman table, row-major.
struct ScoreMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl ScoreMatrix {
    fn fill(page: &[char], query: &[char]) -> Self {
        let rows = page.len();
        let cols = query.len();
        let mut matrix = Self {
            rows,
            cols,
            cells: vec![0; (rows + 1) * (cols + 1)],
        };

        for i in 1..=rows {
            for j in 1..=cols {
                let diagonal = matrix.get(i - 1, j - 1) + substitution(page[i - 1], query[j - 1]);
                let up = matrix.get(i - 1, j) + GAP_SCORE;
                let left = matrix.get(i, j - 1) + GAP_SCORE;
                let score = diagonal.max(up).max(left).max(0);
                matrix.set(i, j, score);
            }
        }

        matrix
    }

    fn get(&self, i: usize, j: usize) -> i32 {
        self.cells[i * (self.cols + 1) + j]
    }

    fn set(&mut self, i: usize, j: usize, value: i32) {
        self.cells[i * (self.cols + 1) + j] = value;
    }

    /// First maximum in row-major order as `(row, col, score)`.
    fn best_cell(&self) -> (usize, usize, i32) {
        let mut best = (0, 0, 0);
        for i in 1..=self.rows {
            for j in 1..=self.cols {
                let score = self.get(i, j);
                if score > best.2 {
                    best = (i, j, score);
                }
            }
        }
        best
    }
}
