//! JSON page documents: the text runs and viewport a renderer reports per page.
//!
//! A document is either a single page object or `{ "pages": [...] }`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Viewport;
use crate::layout::{extract, PageTextLayout, TextRun};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid page document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Page {0} appears more than once")]
    DuplicatePage(u32),
}

/// One rendered page: its number, viewport, and text runs in render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    #[serde(default)]
    pub page: u32,
    pub viewport: Viewport,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl PageInput {
    pub fn layout(&self) -> PageTextLayout {
        extract(&self.runs, &self.viewport)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub pages: Vec<PageInput>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Document(DocumentInput),
    Page(PageInput),
}

/// Parse a page document, sorting pages by number.
pub fn parse_document(json: &str) -> Result<DocumentInput, InputError> {
    let mut document = match serde_json::from_str::<RawDocument>(json) {
        Ok(RawDocument::Document(document)) => document,
        Ok(RawDocument::Page(page)) => DocumentInput { pages: vec![page] },
        // Re-parse as a document to surface a useful error message.
        Err(_) => serde_json::from_str::<DocumentInput>(json)?,
    };

    let mut seen = HashSet::new();
    for page in &document.pages {
        if !seen.insert(page.page) {
            return Err(InputError::DuplicatePage(page.page));
        }
    }

    document.pages.sort_by_key(|page| page.page);
    Ok(document)
}

/// Parse a single page object.
pub fn parse_page(json: &str) -> Result<PageInput, InputError> {
    Ok(serde_json::from_str(json)?)
}
