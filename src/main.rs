use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pagekit::actions::ShareOutcome;
use pagekit::clipboard::ClipboardProvider;
use pagekit::config::Config;
use pagekit::dom::{Document, ElementId};
use pagekit::page::Page;
use pagekit::platform::{Capabilities, PlatformEffect, TerminalPlatform};
use pagekit::search::{CompletionStatus, HttpSearchClient, CATEGORY_CLASS, SEARCH_INPUT_ID};
use pagekit::storage::{Database, DatabaseError};
use pagekit::theme::THEME_TOGGLE_ID;
use pagekit::util::{strip_control_chars, truncate_to_width};

/// Column budget for printed search results.
const OUTPUT_WIDTH: usize = 80;

type CliPage = Page<Database, HttpSearchClient, TerminalPlatform>;

/// Get the config directory path (~/.config/pagekit/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("pagekit"))
}

#[derive(Parser, Debug)]
#[command(name = "pagekit", about = "Drive a content site's page behaviours from the terminal")]
struct Args {
    /// Config file (default: ~/.config/pagekit/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the stored theme
    Theme {
        /// Switch to the other theme and store it
        #[arg(long)]
        toggle: bool,
    },
    /// Save an article, or remove it if already saved
    Save { url: String },
    /// List saved articles
    Saved,
    /// Share an article link
    Share {
        url: String,
        /// Pretend a native share sheet is available
        #[arg(long)]
        native: bool,
    },
    /// Run a live search query
    Search { query: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let db_path = config_dir.join("storage.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of pagekit appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let client = HttpSearchClient::from_config(&config).context("Invalid search endpoint")?;

    let (location, capabilities) = match &args.command {
        Command::Save { url } => (url.as_str(), Capabilities::default()),
        Command::Share { url, native: true } => (url.as_str(), Capabilities::full()),
        Command::Share { url, native: false } => (url.as_str(), Capabilities::default()),
        _ => ("about:blank", Capabilities::default()),
    };
    let document = Document::site_skeleton(location, location);
    let platform = TerminalPlatform::new(capabilities, ClipboardProvider::detect());
    let mut page = Page::load(document, db, client, platform, &config).await;

    match args.command {
        Command::Theme { toggle } => {
            if toggle {
                let button = page
                    .document()
                    .get_element_by_id(THEME_TOGGLE_ID)
                    .context("Theme toggle missing from page")?;
                page.click(button).await;
            }
            println!("{}", page.theme().as_str());
        }
        Command::Save { .. } => {
            page.save_article()
                .await
                .context("Failed to update saved articles")?;
            print_effects(page.platform().take_effects());
        }
        Command::Saved => {
            let saved = page
                .saved_articles()
                .await
                .context("Failed to read saved articles")?;
            if saved.is_empty() {
                println!("No saved articles.");
            }
            for url in saved {
                println!("{url}");
            }
        }
        Command::Share { url, .. } => {
            let outcome = page.share_article();
            let effects = page.platform().take_effects();
            let copied = effects
                .iter()
                .any(|effect| matches!(effect, PlatformEffect::ClipboardWrite(_)));
            if outcome == ShareOutcome::CopiedToClipboard && !copied {
                eprintln!(
                    "No system clipboard available ({}); link: {}",
                    page.platform().clipboard().name(),
                    strip_control_chars(&url)
                );
            } else {
                print_effects(effects);
            }
        }
        Command::Search { query } => run_search(&mut page, &query).await?,
    }

    Ok(())
}

async fn run_search(page: &mut CliPage, query: &str) -> Result<()> {
    let input = page
        .document()
        .get_element_by_id(SEARCH_INPUT_ID)
        .context("Search box missing from page")?;
    page.input(input, query).await;

    if !page.search().is_some_and(|s| s.is_pending()) {
        println!("Query too short.");
        return Ok(());
    }

    match page.next_search_completion().await {
        Some(CompletionStatus::Rendered(_)) => {
            if let Some(search) = page.search() {
                print_results(page.document(), search.results_panel());
            }
            Ok(())
        }
        Some(CompletionStatus::Failed) => {
            anyhow::bail!("Search failed; run with RUST_LOG=debug for details")
        }
        Some(CompletionStatus::Stale) | None => Ok(()),
    }
}

/// Print the rendered results panel, one entry per line.
fn print_results(doc: &Document, panel: ElementId) {
    for &entry in doc.element(panel).children() {
        if doc.element(entry).tag() != "a" {
            // Empty state
            println!("{}", strip_control_chars(doc.element(entry).text()));
            continue;
        }
        let mut title = String::new();
        let mut category = None;
        for child in doc.descendants(entry) {
            let el = doc.element(child);
            if el.tag() == "strong" {
                title = strip_control_chars(el.text()).into_owned();
            } else if el.has_class(CATEGORY_CLASS) {
                category = Some(strip_control_chars(el.text()).into_owned());
            }
        }
        let href = doc.attribute(entry, "href").unwrap_or_default();
        let line = match category {
            Some(category) => format!("{title} [{category}]"),
            None => title,
        };
        println!("{}", truncate_to_width(&line, OUTPUT_WIDTH));
        println!("  {}", strip_control_chars(href));
    }
}

fn print_effects(effects: Vec<PlatformEffect>) {
    for effect in effects {
        match effect {
            PlatformEffect::Alert(message) => println!("{message}"),
            PlatformEffect::ClipboardWrite(text) => println!("Copied to clipboard: {text}"),
            PlatformEffect::Shared(data) => println!("Shared: {}", data.url),
            PlatformEffect::Navigated(url) => println!("Navigated to {url}"),
            PlatformEffect::ScrolledIntoView { .. } => {}
        }
    }
}
