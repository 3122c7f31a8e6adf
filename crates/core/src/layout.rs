//! Page text layout extraction.
//!
//! Turns the positioned text runs a renderer reports for one page into a
//! single searchable string plus an index from char ranges of that string
//! back to normalized rectangles.
//!
//! # Pipeline
//!
//! ```text
//! TextRun[]  ->  sanitize  ->  join with ' '  ->  trim  ->  PageTextLayout
//!                                  |                          (plain_text, boxes)
//!                                  +-- run geometry -> viewport -> normalize
//! ```
//!
//! Extraction never fails. Runs with missing or garbage geometry fall back to
//! zero-valued defaults and simply produce degenerate rectangles.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::geometry::{NormalizedRect, ViewportTransform};
use crate::text::{char_len, char_slice};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One positioned fragment of page text, as produced by the rendering layer.
///
/// `transform` is the run's `[a, b, c, d, e, f]` text matrix; `(e, f)` is its
/// origin in page space. Any geometry field may be absent or non-numeric in
/// renderer output, so all of them are optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default, alias = "str")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_matrix")]
    pub transform: Option<[f64; 6]>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: Option<f64>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, transform: [f64; 6], width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            transform: Some(transform),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Origin point in page space, `(0, 0)` without a transform.
    pub fn origin(&self) -> (f64, f64) {
        self.transform.map(|m| (m[4], m[5])).unwrap_or((0.0, 0.0))
    }

    pub fn effective_width(&self) -> f64 {
        self.width.filter(|w| w.is_finite()).unwrap_or(0.0)
    }

    /// The run's own height, else the magnitude of the transform's vertical
    /// scale component, else 0.
    pub fn effective_height(&self) -> f64 {
        self.height
            .filter(|h| h.is_finite())
            .or_else(|| self.transform.map(|m| m[3].abs()))
            .filter(|h| h.is_finite())
            .unwrap_or(0.0)
    }
}

/// A char range of [`PageTextLayout::plain_text`] and where it sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub start: usize,
    pub end: usize,
    pub rect: NormalizedRect,
}

impl TextBox {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracted text and geometry index for one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageTextLayout {
    pub plain_text: String,
    pub boxes: Vec<TextBox>,
}

impl PageTextLayout {
    pub fn is_empty(&self) -> bool {
        self.plain_text.is_empty()
    }

    /// Length of `plain_text` in chars.
    pub fn char_len(&self) -> usize {
        char_len(&self.plain_text)
    }

    /// Text covered by a box.
    pub fn box_text(&self, text_box: &TextBox) -> &str {
        char_slice(&self.plain_text, text_box.start, text_box.end)
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Drop control characters below U+0020, keeping `\n`, `\r` and `\t`.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| c >= '\u{20}' || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Build the [`PageTextLayout`] for one page.
///
/// Non-empty sanitized runs are joined with a single space and the result is
/// trimmed. Box offsets are relative to the trimmed text; runs that end up
/// entirely inside the trimmed-off whitespace are dropped.
pub fn extract<V>(runs: &[TextRun], viewport: &V) -> PageTextLayout
where
    V: ViewportTransform + ?Sized,
{
    let mut raw = String::new();
    let mut raw_len = 0usize;
    let mut ranges: Vec<(usize, usize, NormalizedRect)> = Vec::with_capacity(runs.len());

    for run in runs {
        let text = sanitize(&run.text);
        if text.is_empty() {
            continue;
        }

        if !raw.is_empty() {
            raw.push(' ');
            raw_len += 1;
        }

        let start = raw_len;
        raw.push_str(&text);
        raw_len += char_len(&text);

        ranges.push((start, raw_len, run_rect(run, viewport)));
    }

    let leading = raw.chars().take_while(|c| c.is_whitespace()).count();
    let plain_text = raw.trim().to_string();
    let text_len = char_len(&plain_text);

    let boxes: Vec<TextBox> = ranges
        .into_iter()
        .filter_map(|(start, end, rect)| {
            let start = start.saturating_sub(leading);
            let end = end.saturating_sub(leading).min(text_len);
            (end > start).then_some(TextBox { start, end, rect })
        })
        .collect();

    log::debug!(
        "extracted layout: {} runs -> {} boxes, {} chars",
        runs.len(),
        boxes.len(),
        text_len
    );

    PageTextLayout { plain_text, boxes }
}

/// Project a run's page-space box through the viewport and normalize it.
fn run_rect<V>(run: &TextRun, viewport: &V) -> NormalizedRect
where
    V: ViewportTransform + ?Sized,
{
    let (x, y) = run.origin();
    let width = run.effective_width();
    let height = run.effective_height();

    let (x1, y1) = viewport.to_viewport_point(x, y);
    let (x2, y2) = viewport.to_viewport_point(x + width, y + height);

    NormalizedRect::from_pixels(
        x1.min(x2),
        y1.min(y2),
        x1.max(x2),
        y1.max(y2),
        viewport.width(),
        viewport.height(),
    )
}

// ---------------------------------------------------------------------------
// Lenient geometry decoding
// ---------------------------------------------------------------------------

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(finite(&value))
}

fn lenient_matrix<'de, D>(deserializer: D) -> Result<Option<[f64; 6]>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Some(items) = value.as_array() else {
        return Ok(None);
    };
    if items.len() < 6 {
        return Ok(None);
    }

    let mut matrix = [0.0; 6];
    for (slot, item) in matrix.iter_mut().zip(items) {
        match finite(item) {
            Some(v) => *slot = v,
            None => return Ok(None),
        }
    }
    Ok(Some(matrix))
}
