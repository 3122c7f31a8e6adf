//! Loading page documents and text from disk.

use std::path::Path;

use textanchor_core::{parse_document, DocumentInput, PageInput};

use crate::prelude::*;

/// Read and parse a page document (a single page or `{ "pages": [...] }`).
pub fn load_document(path: &Path) -> Result<DocumentInput> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read page document {}", path.display()))?;

    let document = parse_document(&json)
        .wrap_err_with(|| format!("Failed to parse page document {}", path.display()))?;

    log::debug!(
        "loaded {} page(s) from {}",
        document.pages.len(),
        path.display()
    );

    Ok(document)
}

/// Keep only `page` when given, failing if the document lacks it.
pub fn select_pages(document: DocumentInput, page: Option<u32>) -> Result<Vec<PageInput>> {
    match page {
        None => Ok(document.pages),
        Some(number) => {
            let selected = document
                .pages
                .into_iter()
                .find(|p| p.page == number)
                .ok_or_eyre(Error::MissingPage(number))?;
            Ok(vec![selected])
        }
    }
}

/// Read a plain text file.
pub fn load_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r#"{"pages": [
        {"page": 2, "viewport": {"width": 100, "height": 100}, "runs": [{"text": "two"}]},
        {"page": 1, "viewport": {"width": 100, "height": 100}, "runs": [{"text": "one"}]}
    ]}"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_document() {
        let file = write_temp(DOCUMENT);
        let document = load_document(file.path()).unwrap();
        assert_eq!(document.pages.len(), 2);
        assert_eq!(document.pages[0].page, 1);
    }

    #[test]
    fn test_load_document_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_document(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_document_invalid_json() {
        let file = write_temp("not json");
        assert!(load_document(file.path()).is_err());
    }

    #[test]
    fn test_select_pages() {
        let file = write_temp(DOCUMENT);

        let all = select_pages(load_document(file.path()).unwrap(), None).unwrap();
        assert_eq!(all.len(), 2);

        let one = select_pages(load_document(file.path()).unwrap(), Some(2)).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].layout().plain_text, "two");

        assert!(select_pages(load_document(file.path()).unwrap(), Some(9)).is_err());
    }

    #[test]
    fn test_load_text() {
        let file = write_temp("plain text");
        assert_eq!(load_text(file.path()).unwrap(), "plain text");
    }
}
