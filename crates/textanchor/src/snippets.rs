use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;
use textanchor_core::snippets::{
    find_keyword_hits, DEFAULT_CONTEXT_CHARS, DEFAULT_MERGE_DISTANCE,
};
use textanchor_core::{group_hits, Snippet, SnippetOptions};

use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct SnippetsOptions {
    /// Path to a plain text file
    pub path: std::path::PathBuf,

    /// Keywords to search for (case-insensitive)
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Hits this many chars apart or closer share a snippet
    #[arg(long, env = "TEXTANCHOR_MERGE_DISTANCE", default_value_t = DEFAULT_MERGE_DISTANCE)]
    pub merge_distance: usize,

    /// Chars of context on each side of a snippet
    #[arg(long, env = "TEXTANCHOR_CONTEXT", default_value_t = DEFAULT_CONTEXT_CHARS)]
    pub context: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct SnippetsOutput {
    pub keywords: Vec<String>,
    pub total_hits: usize,
    pub snippets: Vec<Snippet>,
}

pub async fn run(options: SnippetsOptions, global: crate::Global) -> Result<()> {
    let text = crate::io::load_text(&options.path)?;
    let output = build_snippets(&text, &options)?;

    if global.verbose {
        eprintln!(
            "{}: {} hit(s) in {} snippet(s)",
            "Grouped".green(),
            output.total_hits,
            output.snippets.len()
        );
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output_text(&output);
    }

    Ok(())
}

/// Find every keyword hit in `text` and group the hits into snippets.
pub fn build_snippets(text: &str, options: &SnippetsOptions) -> Result<SnippetsOutput> {
    let keywords: Vec<String> = options
        .keywords
        .iter()
        .map(|keyword| keyword.trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .collect();

    if keywords.is_empty() {
        return Err(eyre!(Error::NoKeywords));
    }

    let hits = find_keyword_hits(text, &keywords);
    let snippets = group_hits(
        text,
        &hits,
        &SnippetOptions {
            merge_distance: options.merge_distance,
            context_chars: options.context,
        },
    );

    Ok(SnippetsOutput {
        keywords,
        total_hits: hits.len(),
        snippets,
    })
}

fn output_text(output: &SnippetsOutput) {
    if output.snippets.is_empty() {
        eprintln!("{}", "No keyword hits.".yellow());
        return;
    }

    let is_terminal = std::io::stdout().is_terminal();

    for snippet in &output.snippets {
        if is_terminal {
            eprintln!(
                "\n{} {}..{} ({} hit(s))",
                "Snippet".green(),
                snippet.start,
                snippet.end,
                snippet.hits
            );
        }
        println!("{}", snippet.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(keywords: &[&str]) -> SnippetsOptions {
        SnippetsOptions {
            path: "doc.txt".into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            merge_distance: 10,
            context: 3,
            json: false,
        }
    }

    #[test]
    fn test_build_snippets() {
        let text = "alpha beta gamma. A long stretch of filler text here. beta again";
        let output = build_snippets(text, &options(&["beta"])).unwrap();

        assert_eq!(output.total_hits, 2);
        assert_eq!(output.snippets.len(), 2);
        assert_eq!(output.snippets[0].text, "ha beta ga");
        assert!(output.snippets[1].text.ends_with("beta ag"));
    }

    #[test]
    fn test_build_snippets_rejects_blank_keywords() {
        let result = build_snippets("text", &options(&["", "  "]));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_snippets_no_hits() {
        let output = build_snippets("nothing relevant", &options(&["absent"])).unwrap();
        assert_eq!(output.total_hits, 0);
        assert!(output.snippets.is_empty());
    }
}
