//! Site-Gleaner main entry point
//!
//! This is the command-line interface for the Site-Gleaner content harvester.

use anyhow::Context;
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use site_gleaner::config::{
    load_config, parse_seed_url, resolve_options, Config, CrawlOptions, Renderer, ScopeMode,
};
use site_gleaner::crawler::{crawl, ProgressUpdate};
use site_gleaner::output::{export_results, load_json_results, print_summary, ExportFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Gleaner: a same-origin website content harvester
///
/// Site-Gleaner walks every page reachable from a seed URL without leaving
/// its origin, collects page text, image and video references (optionally
/// running OCR over images) and saves them as json, txt, docx, csv, pdf or
/// xlsx.
#[derive(Parser, Debug)]
#[command(name = "site-gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A same-origin website content harvester", long_about = None)]
struct Cli {
    /// Seed URL (https:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only record page text containing this keyword (case-insensitive)
    #[arg(short, long)]
    keyword: Option<String>,

    /// Output folder, created if absent
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Output format: json, txt, docx, csv, pdf or xlsx
    #[arg(short, long)]
    format: Option<String>,

    /// Collect image URLs
    #[arg(long)]
    images: bool,

    /// Collect video URLs
    #[arg(long)]
    videos: bool,

    /// Run OCR over collected images (implies --images)
    #[arg(long)]
    ocr: bool,

    /// Harvest a single page instead of the whole site
    #[arg(long)]
    single_page: bool,

    /// Page to harvest in single-page mode (implies --single-page)
    #[arg(long, value_name = "URL")]
    page: Option<String>,

    /// Page renderer
    #[arg(long, value_parser = ["http", "browser"])]
    renderer: Option<String>,

    /// Show the browser window while rendering
    #[arg(long)]
    visible: bool,

    /// Per-page timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Ask for every setting interactively
    #[arg(short, long, conflicts_with = "from_json")]
    interactive: bool,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long, conflicts_with = "from_json")]
    dry_run: bool,

    /// Re-export a previously written scraped_data.json instead of crawling
    #[arg(long, value_name = "FILE")]
    from_json: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);

    if let Some(path) = &cli.from_json {
        return handle_from_json(&config, path);
    }

    if cli.interactive {
        prompt_settings(&mut config)?;
    }

    let options = resolve_options(&config).context("invalid crawl settings")?;

    if cli.dry_run {
        handle_dry_run(&config, &options);
        return Ok(());
    }

    handle_crawl(config, options, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_gleaner=info,warn"),
            1 => EnvFilter::new("site_gleaner=debug,info"),
            2 => EnvFilter::new("site_gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers command-line flags over the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.crawl.url = Some(url.clone());
    }
    if let Some(keyword) = &cli.keyword {
        config.crawl.keyword = Some(keyword.clone());
    }
    if let Some(folder) = &cli.output_dir {
        config.output.folder = folder.clone();
    }
    if let Some(format) = &cli.format {
        config.output.format = format.clone();
    }

    config.content.images |= cli.images || cli.ocr;
    config.content.videos |= cli.videos;
    config.content.ocr |= cli.ocr;

    if let Some(page) = &cli.page {
        config.crawl.page = Some(page.clone());
    }
    if cli.single_page || cli.page.is_some() {
        config.crawl.scope = ScopeMode::SinglePage;
    }

    match cli.renderer.as_deref() {
        Some("browser") => config.fetch.renderer = Renderer::Browser,
        Some("http") => config.fetch.renderer = Renderer::Http,
        _ => {}
    }
    config.crawl.render_visible |= cli.visible;

    if let Some(timeout) = cli.timeout {
        config.fetch.page_timeout_secs = timeout;
    }
}

/// Asks the operator for every setting, re-prompting until the URL is valid
fn prompt_settings(config: &mut Config) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();

    let seed = loop {
        let mut prompt = Input::<String>::with_theme(&theme).with_prompt("Website URL");
        if let Some(current) = config.crawl.url.clone() {
            prompt = prompt.default(current);
        }
        let input = prompt.interact_text()?;

        match parse_seed_url(&input) {
            Ok(url) => break url,
            Err(e) => println!("{}. Please try again.", e),
        }
    };
    config.crawl.url = Some(seed.to_string());

    let keyword: String = Input::with_theme(&theme)
        .with_prompt("Keyword to filter page text (leave empty for all)")
        .allow_empty(true)
        .default(config.crawl.keyword.clone().unwrap_or_default())
        .interact_text()?;
    config.crawl.keyword = Some(keyword);

    config.output.folder = Input::with_theme(&theme)
        .with_prompt("Output folder")
        .default(config.output.folder.clone())
        .interact_text()?;

    let formats: Vec<&str> = ExportFormat::ALL.iter().map(|f| f.extension()).collect();
    let current = formats
        .iter()
        .position(|f| config.output.format.eq_ignore_ascii_case(f))
        .unwrap_or(0);
    let selected = Select::with_theme(&theme)
        .with_prompt("Output format")
        .items(&formats)
        .default(current)
        .interact()?;
    config.output.format = formats[selected].to_string();

    config.content.images = Confirm::with_theme(&theme)
        .with_prompt("Collect images?")
        .default(config.content.images)
        .interact()?;
    config.content.videos = Confirm::with_theme(&theme)
        .with_prompt("Collect videos?")
        .default(config.content.videos)
        .interact()?;
    config.content.ocr = config.content.images
        && Confirm::with_theme(&theme)
            .with_prompt("Extract text from images (OCR)?")
            .default(config.content.ocr)
            .interact()?;

    let whole_site = Confirm::with_theme(&theme)
        .with_prompt("Crawl every page of the site?")
        .default(config.crawl.scope == ScopeMode::WholeSite)
        .interact()?;

    if whole_site {
        config.crawl.scope = ScopeMode::WholeSite;
        config.crawl.page = None;
    } else {
        config.crawl.scope = ScopeMode::SinglePage;
        let page = loop {
            let input: String = Input::with_theme(&theme)
                .with_prompt("Page URL (leave empty for the website URL)")
                .allow_empty(true)
                .interact_text()?;

            if input.trim().is_empty() {
                break None;
            }
            match parse_seed_url(&input) {
                Ok(url) => break Some(url.to_string()),
                Err(e) => println!("{}. Please try again.", e),
            }
        };
        config.crawl.page = page;
    }

    if config.fetch.renderer == Renderer::Browser {
        config.crawl.render_visible = Confirm::with_theme(&theme)
            .with_prompt("Show the browser window while crawling?")
            .default(config.crawl.render_visible)
            .interact()?;
    }

    Ok(())
}

/// Handles the --dry-run mode: validates settings and shows what would be crawled
fn handle_dry_run(config: &Config, options: &CrawlOptions) {
    println!("=== Site-Gleaner Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", options.seed);
    println!(
        "  Scope: {}",
        if options.follows_links() {
            "whole site"
        } else {
            "single page"
        }
    );
    println!(
        "  Keyword: {}",
        options.keyword.as_deref().unwrap_or("(none)")
    );
    println!("  Page timeout: {}s", options.page_timeout.as_secs());

    println!("\nContent:");
    println!("  Images: {}", options.images);
    println!("  Videos: {}", options.videos);
    println!("  OCR: {}", options.ocr);

    println!("\nFetching:");
    println!("  Renderer: {:?}", config.fetch.renderer);
    println!("  Render visible: {}", options.render_visible);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nOutput:");
    println!(
        "  File: {}",
        Path::new(&config.output.folder)
            .join(format!("scraped_data.{}", config.output.format.to_lowercase()))
            .display()
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --from-json mode: converts an earlier JSON export
fn handle_from_json(config: &Config, path: &Path) -> anyhow::Result<()> {
    println!("=== Re-exporting Results ===\n");
    println!("Input: {}", path.display());

    let results = load_json_results(path)
        .with_context(|| format!("failed to read results from {}", path.display()))?;

    let keyword = config.crawl.keyword.as_deref();
    let written = export_results(
        &results,
        Path::new(&config.output.folder),
        &config.output.format,
        keyword,
    )?;

    println!("✓ Results exported to: {}", written.display());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, options: CrawlOptions, quiet: bool) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            signal_token.cancel();
        }
    });

    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(update) = events_rx.recv().await {
            if !quiet {
                render_progress(&update);
            }
        }
        if !quiet {
            eprintln!();
        }
    });

    let keyword = options.keyword.clone();
    let outcome = crawl(options, &config.fetch, cancel, Some(events_tx)).await;
    // The sender was dropped with the engine, so the printer drains and exits
    let _ = progress.await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !quiet {
        print_summary(&outcome.summary);
    }

    match export_results(
        &outcome.results,
        Path::new(&config.output.folder),
        &config.output.format,
        keyword.as_deref(),
    ) {
        Ok(path) => {
            println!("\n✓ Data saved to: {}", path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            Err(e.into())
        }
    }
}

/// Draws a one-line progress bar on stderr
fn render_progress(update: &ProgressUpdate) {
    const BAR_WIDTH: usize = 40;

    let percent = update.percent().clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "-".repeat(BAR_WIDTH - filled));

    let mut stderr = std::io::stderr().lock();
    let _ = write!(
        stderr,
        "\rProgress |{}| {:.1}% ({}/{}) ETA {:.2} min ",
        bar,
        percent,
        update.page_number,
        update.total_estimate,
        update.eta_minutes()
    );
    let _ = stderr.flush();
}
