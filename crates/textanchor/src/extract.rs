use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;
use textanchor_core::{PageInput, PageTextLayout};

use crate::locate::OutputFormat;
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct ExtractOptions {
    /// Path to the page document (JSON)
    pub path: std::path::PathBuf,

    /// Only extract this page
    #[arg(long, env = "TEXTANCHOR_PAGE")]
    pub page: Option<u32>,

    /// Output format: table or json (default: table)
    #[arg(long, env = "TEXTANCHOR_OUTPUT", default_value = "table")]
    pub output: OutputFormat,

    /// Output as JSON (alias for --output json)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct PageLayout {
    pub page: u32,
    #[serde(flatten)]
    pub layout: PageTextLayout,
}

pub async fn run(options: ExtractOptions, global: crate::Global) -> Result<()> {
    let document = crate::io::load_document(&options.path)?;
    let pages = crate::io::select_pages(document, options.page)?;
    let layouts = extract_pages(&pages);

    if global.verbose {
        for layout in &layouts {
            eprintln!(
                "{} page {}: {} chars, {} boxes",
                "Extracted".green(),
                layout.page,
                layout.layout.char_len(),
                layout.layout.boxes.len()
            );
        }
    }

    // Determine output format (--json flag takes precedence)
    let format = if options.json {
        OutputFormat::Json
    } else {
        options.output.clone()
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&layouts)?),
        OutputFormat::Table => output_table(&layouts),
    }

    Ok(())
}

/// Extract the layout of every page, in document order.
pub fn extract_pages(pages: &[PageInput]) -> Vec<PageLayout> {
    pages
        .iter()
        .map(|page| PageLayout {
            page: page.page,
            layout: page.layout(),
        })
        .collect()
}

fn output_table(layouts: &[PageLayout]) {
    let is_terminal = std::io::stdout().is_terminal();

    for entry in layouts {
        if is_terminal {
            eprintln!(
                "\n{} {}: {}",
                "Page".green(),
                entry.page,
                crate::truncate_text(&entry.layout.plain_text, 60).bright_white()
            );
        }

        if entry.layout.boxes.is_empty() {
            eprintln!("{}", "No text boxes.".yellow());
            continue;
        }

        let mut table = new_table();
        table.add_row(prettytable::row![
            "Start", "End", "Text", "Left", "Top", "Right", "Bottom"
        ]);

        for text_box in &entry.layout.boxes {
            table.add_row(prettytable::row![
                text_box.start,
                text_box.end,
                crate::truncate_text(entry.layout.box_text(text_box), 30),
                format!("{:.4}", text_box.rect.left),
                format!("{:.4}", text_box.rect.top),
                format!("{:.4}", text_box.rect.right),
                format!("{:.4}", text_box.rect.bottom)
            ]);
        }

        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textanchor_core::{TextRun, Viewport};

    fn page(number: u32, text: &str) -> PageInput {
        PageInput {
            page: number,
            viewport: Viewport::new(100.0, 100.0),
            runs: vec![TextRun::new(text, [1.0, 0.0, 0.0, 1.0, 10.0, 20.0], 50.0, 10.0)],
        }
    }

    #[test]
    fn test_extract_pages() {
        let layouts = extract_pages(&[page(1, "one"), page(2, "  two ")]);

        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].layout.plain_text, "one");
        assert_eq!(layouts[1].page, 2);
        assert_eq!(layouts[1].layout.plain_text, "two");
        assert_eq!(layouts[1].layout.boxes.len(), 1);
    }

    #[test]
    fn test_page_layout_json_is_flat() {
        let layouts = extract_pages(&[page(7, "seven")]);
        let json = serde_json::to_value(&layouts).unwrap();

        assert_eq!(json[0]["page"], 7);
        assert_eq!(json[0]["plain_text"], "seven");
        assert_eq!(json[0]["boxes"][0]["start"], 0);
        assert_eq!(json[0]["boxes"][0]["end"], 5);
    }

    #[test]
    fn test_extract_pages_matches_locate_layout() {
        let pages = [page(1, "alpha"), page(2, "beta")];
        let layouts = extract_pages(&pages);

        for (entry, page) in layouts.iter().zip(&pages) {
            assert_eq!(entry.layout, page.layout());
        }
    }
}
