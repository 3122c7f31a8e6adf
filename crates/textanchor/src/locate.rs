use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::sync::Arc;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use textanchor_core::{group_by_page, locate, to_rects, PageInput, Rect};

use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct LocateOptions {
    /// Path to the page document (JSON)
    pub path: std::path::PathBuf,

    /// Text to locate
    pub query: String,

    /// Only search this page
    #[arg(long, env = "TEXTANCHOR_PAGE")]
    pub page: Option<u32>,

    /// Output format: table or json (default: table)
    #[arg(long, env = "TEXTANCHOR_OUTPUT", default_value = "table")]
    pub output: OutputFormat,

    /// Output as JSON (alias for --output json)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// JSON with structured data
    Json,
}

/// Where the query landed on one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageHit {
    pub page: u32,
    pub matched_text: String,
    pub start_offset: usize,
    pub rects: Vec<Rect>,
}

/// Why the query missed one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageMiss {
    pub page: u32,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct LocateOutput {
    pub query: String,
    pub hits: Vec<PageHit>,
    pub misses: Vec<PageMiss>,
    /// Every hit rectangle, one overlay group per page.
    pub overlays: BTreeMap<u32, Vec<Rect>>,
}

enum PageOutcome {
    Hit(PageHit),
    Miss(PageMiss),
}

pub async fn run(options: LocateOptions, global: crate::Global) -> Result<()> {
    let document = crate::io::load_document(&options.path)?;
    let pages = crate::io::select_pages(document, options.page)?;

    if global.verbose {
        eprintln!(
            "{}: {} page(s), query of {} chars",
            "Searching".green(),
            pages.len(),
            options.query.chars().count()
        );
    }

    let output = locate_pages(pages, options.query.clone()).await?;

    if global.verbose {
        for miss in &output.misses {
            eprintln!(
                "{} page {}: {}",
                "Miss".yellow(),
                miss.page,
                miss.reason.dimmed()
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
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Table => output_table(&output),
    }

    if output.hits.is_empty() {
        return Err(eyre!(Error::NotFound(output.query)));
    }

    Ok(())
}

/// Locate `query` on every page, one blocking task per page.
pub async fn locate_pages(pages: Vec<PageInput>, query: String) -> Result<LocateOutput> {
    let shared_query = Arc::new(query.clone());

    let tasks = pages.into_iter().map(|page| {
        let query = Arc::clone(&shared_query);
        tokio::task::spawn_blocking(move || locate_page(&page, &query))
    });

    let mut hits = Vec::new();
    let mut misses = Vec::new();
    for outcome in futures::future::join_all(tasks).await {
        match outcome? {
            PageOutcome::Hit(hit) => hits.push(hit),
            PageOutcome::Miss(miss) => misses.push(miss),
        }
    }

    let overlays = group_by_page(hits.iter().flat_map(|hit| hit.rects.iter().copied()));

    Ok(LocateOutput {
        query,
        hits,
        misses,
        overlays,
    })
}

fn locate_page(page: &PageInput, query: &str) -> PageOutcome {
    let layout = page.layout();

    match locate(&layout.plain_text, query) {
        Ok(matched) => {
            let rects = to_rects(&layout, &matched, page.page);
            log::debug!(
                "page {}: matched {} chars at {}, {} rect(s)",
                page.page,
                matched.matched_text.chars().count(),
                matched.start_offset,
                rects.len()
            );
            PageOutcome::Hit(PageHit {
                page: page.page,
                matched_text: matched.matched_text,
                start_offset: matched.start_offset,
                rects,
            })
        }
        Err(reason) => {
            log::debug!("page {}: {reason}", page.page);
            PageOutcome::Miss(PageMiss {
                page: page.page,
                reason: reason.to_string(),
            })
        }
    }
}

fn output_table(output: &LocateOutput) {
    if std::io::stdout().is_terminal() {
        eprintln!("\n{}: {}", "Query".green(), output.query.bright_white().bold());
    }

    if output.hits.is_empty() {
        eprintln!("{}", "No matches.".yellow());
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Page", "Offset", "Matched", "Left", "Top", "Right", "Bottom"
    ]);

    for hit in &output.hits {
        for rect in &hit.rects {
            table.add_row(prettytable::row![
                hit.page,
                hit.start_offset,
                crate::truncate_text(&hit.matched_text, 40),
                format!("{:.4}", rect.left),
                format!("{:.4}", rect.top),
                format!("{:.4}", rect.right),
                format!("{:.4}", rect.bottom)
            ]);
        }
    }

    table.printstd();
}

#[cfg(test)]
mod tests {
    use super::*;
    use textanchor_core::{TextRun, Viewport};

    fn page(number: u32, words: &[&str]) -> PageInput {
        let runs = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                TextRun::new(*word, [1.0, 0.0, 0.0, 1.0, i as f64 * 20.0, 0.0], 15.0, 10.0)
            })
            .collect();
        PageInput {
            page: number,
            viewport: Viewport::new(100.0, 100.0),
            runs,
        }
    }

    #[tokio::test]
    async fn test_locate_pages_splits_hits_and_misses() {
        let pages = vec![
            page(1, &["alpha", "beta"]),
            page(2, &["gamma", "delta"]),
            page(3, &["beta", "gamma"]),
        ];

        let output = locate_pages(pages, "beta".to_string()).await.unwrap();

        let hit_pages: Vec<u32> = output.hits.iter().map(|h| h.page).collect();
        assert_eq!(hit_pages, vec![1, 3]);
        assert_eq!(output.misses.len(), 1);
        assert_eq!(output.misses[0].page, 2);
        assert_eq!(output.overlays.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(output.hits[0].start_offset, 6);
    }

    #[tokio::test]
    async fn test_locate_pages_no_pages() {
        let output = locate_pages(Vec::new(), "beta".to_string()).await.unwrap();
        assert!(output.hits.is_empty());
        assert!(output.overlays.is_empty());
    }

    #[test]
    fn test_locate_page_reports_reason() {
        match locate_page(&page(4, &["alpha"]), "") {
            PageOutcome::Miss(miss) => {
                assert_eq!(miss.page, 4);
                assert_eq!(miss.reason, "query is empty");
            }
            PageOutcome::Hit(_) => panic!("empty query should not match"),
        }
    }
}
