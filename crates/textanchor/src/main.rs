use crate::prelude::*;
use clap::Parser;

mod error;
mod extract;
mod io;
mod locate;
mod prelude;
mod snippets;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Locate quoted text on rendered pages and project it to highlight rectangles"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "TEXTANCHOR_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Print the plain text and text boxes extracted from each page
    Extract(crate::extract::ExtractOptions),

    /// Find a quote on each page and print its highlight rectangles
    Locate(crate::locate::LocateOptions),

    /// Group keyword hits in a text file into snippets
    Snippets(crate::snippets::SnippetsOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Extract(options) => crate::extract::run(options, app.global).await,
        SubCommands::Locate(options) => crate::locate::run(options, app.global).await,
        SubCommands::Snippets(options) => crate::snippets::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

/// Shorten `text` to `max_chars` chars for a table cell, flattening line breaks.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let head: String = flat.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
