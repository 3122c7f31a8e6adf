//! Core library for textanchor
//!
//! This crate implements the **Functional Core** of textanchor, following the
//! Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`textanchor_core`** (this crate): pure transformations, no I/O
//! - **`textanchor`**: file loading, concurrency, and terminal output (the
//!   Imperative Shell)
//!
//! Every function here is deterministic: the same runs, viewport and query
//! always produce the same layout, match and rectangles, including when
//! several alignments score the same.
//!
//! # Pipeline
//!
//! ```text
//! TextRun[] + Viewport --layout::extract--> PageTextLayout      (once per page, cached)
//! plain_text + query   --align::locate----> MatchResult         (per query)
//! layout + match       --rects::to_rects--> Rect[]              (per query)
//! Rect[]               --rects::group_by_page--> page -> Rect[] (per overlay)
//! ```
//!
//! # Module Organization
//!
//! - [`layout`]: text run sanitization, joining and the offset-to-rectangle index
//! - [`align`]: exact search with a Smith-Waterman fallback gated by edit distance
//! - [`rects`]: prorated rectangle reconstruction and per-page grouping
//! - [`snippets`]: keyword hit grouping over whole-document text
//! - [`cache`]: per-page layout memoization
//! - [`geometry`]: rectangles and the viewport transform
//! - [`input`]: JSON page documents
//!
//! # Example Usage
//!
//! ```rust
//! use textanchor_core::{extract, highlight, TextRun, Viewport};
//!
//! let runs = vec![
//!     TextRun::new("Hello", [1.0, 0.0, 0.0, 1.0, 0.0, 0.0], 50.0, 10.0),
//!     TextRun::new("world", [1.0, 0.0, 0.0, 1.0, 60.0, 0.0], 50.0, 10.0),
//! ];
//! let layout = extract(&runs, &Viewport::new(200.0, 100.0));
//!
//! let rects = highlight(&layout, "world", 1).unwrap();
//! assert_eq!(rects.len(), 1);
//! assert_eq!(rects[0].left, 0.3);
//! ```

pub mod align;
pub mod cache;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod rects;
pub mod snippets;
pub mod text;

pub use align::{locate, LocateError, MatchResult};
pub use cache::LayoutCache;
pub use geometry::{NormalizedRect, Rect, Viewport, ViewportTransform};
pub use input::{parse_document, parse_page, DocumentInput, InputError, PageInput};
pub use layout::{extract, PageTextLayout, TextBox, TextRun};
pub use rects::{group_by_page, highlight, range_rects, to_rects};
pub use snippets::{group_hits, keyword_snippets, KeywordHit, Snippet, SnippetOptions};
