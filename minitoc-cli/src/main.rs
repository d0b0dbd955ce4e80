//! minitoc - documentation pages with a scroll-synchronised contents panel
//!
//! Renders Markdown into pages whose headings carry stable identifiers and
//! whose contents panel is prerendered, ready for the browser module to
//! take over highlighting.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
#![allow(clippy::module_name_repetitions)]

mod cli;
mod markdown;
mod page;
mod walker;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use minitoc::TocConfig;
use page::PageOptions;
use std::fs;
use std::path::{Path, PathBuf};

/// Main entry point for the minitoc CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            script,
            title,
        } => {
            handle_render_command(input, output, config, script, title)?;
        }

        Commands::Outline { input, config } => {
            handle_outline_command(input, config)?;
        }

        Commands::InitConfig { path, force } => {
            handle_init_config_command(path, force)?;
        }

        Commands::CheckConfig { path } => {
            handle_check_config_command(path)?;
        }
    }

    Ok(())
}

/// Load the configuration file if one was given, defaults otherwise
fn load_config(path: Option<&Path>) -> Result<TocConfig> {
    match path {
        Some(path) => TocConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(TocConfig::default()),
    }
}

/// Handle the render command
fn handle_render_command(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    script: Option<String>,
    title: Option<String>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;

    let jobs = if input.is_dir() {
        let output_root = output.unwrap_or_else(|| PathBuf::from("site"));
        walker::find_markdown_files(&input, &output_root)
            .with_context(|| format!("Failed to scan {}", input.display()))?
    } else {
        let output = output.unwrap_or_else(|| input.with_extension("html"));
        vec![walker::RenderJob {
            input: input.clone(),
            output,
        }]
    };

    if jobs.is_empty() {
        anyhow::bail!("No markdown files found in {}", input.display());
    }

    println!("Rendering {} document(s)...", jobs.len());

    for job in &jobs {
        let page_title = title.clone().unwrap_or_else(|| default_title(&job.input));
        let options = PageOptions {
            title: page_title,
            script_url: script.clone(),
        };
        let entries = render_file(&job.input, &job.output, &config, &options)?;
        println!(
            "✓ {} -> {} ({} contents entries)",
            job.input.display(),
            job.output.display(),
            entries
        );
    }

    Ok(())
}

/// Render one markdown file to an HTML page, returning the number of panel entries
fn render_file(
    input: &Path,
    output: &Path,
    config: &TocConfig,
    options: &PageOptions,
) -> Result<usize> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let doc = markdown::render_markdown(&source, config);
    if doc.headings.is_empty() {
        log::info!(
            "{} has no headings; contents panel will be hidden",
            input.display()
        );
    }
    let html = page::render_page(&doc, config, options);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(output, html).with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(doc.headings.len())
}

/// Page title derived from the file name
fn default_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Document")
        .to_string()
}

/// Handle the outline command
fn handle_outline_command(input: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let doc = markdown::render_markdown(&source, &config);
    if doc.headings.is_empty() {
        println!("(no headings; the contents panel would be hidden)");
        return Ok(());
    }

    for heading in &doc.headings {
        let indent = "  ".repeat(usize::from(heading.level.saturating_sub(config.min_level)));
        println!("{}{}  #{}", indent, heading.text, heading.id);
    }

    Ok(())
}

/// Handle the init-config command
fn handle_init_config_command(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite",
            path.display()
        );
    }

    TocConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}

/// Handle the check-config command
fn handle_check_config_command(path: PathBuf) -> Result<()> {
    let config = TocConfig::load(&path)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    println!("✓ {} is valid", path.display());
    println!("  headings: {}", config.heading_selector());
    println!("  content:  {}", config.content_selector);
    println!("  list:     {}", config.list_selector);
    Ok(())
}
