//! Turning matched char ranges back into page rectangles.
//!
//! Boxes only partly covered by a match are prorated horizontally by the
//! covered fraction of their chars. Boxes are assumed to hold one horizontal
//! line of text, so top and bottom pass through untouched.

use std::collections::BTreeMap;

use crate::align::{locate, LocateError, MatchResult};
use crate::geometry::Rect;
use crate::layout::PageTextLayout;

/// Rectangles covering `[match.start_offset, match.end_offset())` on `page`.
pub fn to_rects(layout: &PageTextLayout, matched: &MatchResult, page: u32) -> Vec<Rect> {
    range_rects(layout, matched.start_offset, matched.end_offset(), page)
}

/// Rectangles covering the char range `[start, end)` of the layout's text.
pub fn range_rects(layout: &PageTextLayout, start: usize, end: usize, page: u32) -> Vec<Rect> {
    let mut rects = Vec::new();

    for text_box in &layout.boxes {
        if !(text_box.end > start && text_box.start < end) {
            continue;
        }

        let box_len = text_box.end.saturating_sub(text_box.start);
        if box_len == 0 {
            rects.push(text_box.rect.on_page(page));
            continue;
        }

        let intersect_start = text_box.start.max(start);
        let intersect_end = text_box.end.min(end);
        let start_ratio = (intersect_start - text_box.start) as f64 / box_len as f64;
        let end_ratio = (intersect_end - text_box.start) as f64 / box_len as f64;

        let rect = text_box.rect;
        let span = rect.right - rect.left;
        rects.push(Rect {
            top: rect.top,
            left: rect.left + span * start_ratio,
            right: rect.left + span * end_ratio,
            bottom: rect.bottom,
            page,
        });
    }

    rects
}

/// Locate `query` on the page and return its highlight rectangles.
pub fn highlight(
    layout: &PageTextLayout,
    query: &str,
    page: u32,
) -> Result<Vec<Rect>, LocateError> {
    let matched = locate(&layout.plain_text, query)?;
    Ok(to_rects(layout, &matched, page))
}

/// Partition rectangles by page, keeping encounter order inside each page.
pub fn group_by_page<I>(rects: I) -> BTreeMap<u32, Vec<Rect>>
where
    I: IntoIterator<Item = Rect>,
{
    let mut groups: BTreeMap<u32, Vec<Rect>> = BTreeMap::new();
    for rect in rects {
        groups.entry(rect.page).or_default().push(rect);
    }
    groups
}
