//! CLI administration tool for shortlink-pipeline.
//!
//! Manages short links directly against the database, without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- create --url "https://www.rust-lang.org/learn"
//!
//! # Show the click count of a link
//! cargo run --bin admin -- stats --code aZ3x9Q
//!
//! # Most recent links
//! cargo run --bin admin -- list --limit 20
//!
//! # Remove a link and its clicks
//! cargo run --bin admin -- delete --code aZ3x9Q
//!
//! # Apply database migrations
//! cargo run --bin admin -- migrate
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`shortlink_pipeline::config`].

use shortlink_pipeline::application::services::LinkService;
use shortlink_pipeline::config::{self, Config};
use shortlink_pipeline::error::AppError;
use shortlink_pipeline::infrastructure::persistence::PgLinkRepository;
use shortlink_pipeline::server;
use shortlink_pipeline::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing short links.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link for a long URL
    Create {
        /// Long URL to shorten
        #[arg(short, long)]
        url: String,
    },

    /// Show click statistics for a short link
    Stats {
        /// Short code of the link
        #[arg(short, long)]
        code: String,
    },

    /// List the most recent links
    List {
        /// Maximum number of links to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Delete a short link and its recorded clicks
    Delete {
        /// Short code of the link
        #[arg(short, long)]
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env().context("Failed to load configuration")?;

    if let Commands::Create { url } = &cli.command {
        validate_url(url)?;
    }

    let pool = server::connect(&config).await?;

    if let Commands::Migrate = cli.command {
        server::migrate(&pool).await?;
        println!("{}", "✅ Migrations applied".green().bold());
        return Ok(());
    }

    let repository = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repository, Arc::new(RandomCodeGenerator), config.allocator());

    let result = match cli.command {
        Commands::Create { url } => create_link(&service, &config, url).await,
        Commands::Stats { code } => show_stats(&service, &code).await,
        Commands::List { limit } => list_links(&service, &config, limit).await,
        Commands::Delete { code, yes } => delete_link(&service, &code, yes).await,
        Commands::Migrate => Ok(()),
    };

    pool.close().await;
    result
}

/// Rejects input that is not an absolute URL.
fn validate_url(raw: &str) -> Result<()> {
    url::Url::parse(raw).with_context(|| format!("Invalid URL: {raw}"))?;
    Ok(())
}

async fn create_link(service: &LinkService, config: &Config, url: String) -> Result<()> {
    let link = match service.create_link(url).await {
        Ok(link) => link,
        Err(AppError::DuplicateUrl { long_url }) => {
            println!("{} {}", "⚠️  Already shortened:".yellow(), long_url);
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to create link"),
    };

    println!("{}", "✅ Short link created".green().bold());
    println!();
    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!("  Long URL:  {}", link.long_url.cyan());
    println!(
        "  Short URL: {}",
        LinkService::short_url(&config.base_url, &link.code).bright_white()
    );
    println!();

    Ok(())
}

async fn show_stats(service: &LinkService, code: &str) -> Result<()> {
    let stats = service
        .get_link_stats(code)
        .await
        .with_context(|| format!("Failed to load stats for '{code}'"))?;

    println!("{}", "📊 Link statistics".bright_blue().bold());
    println!();
    println!("  Code:         {}", stats.link.code.bright_yellow());
    println!("  Long URL:     {}", stats.link.long_url.cyan());
    println!(
        "  Created:      {}",
        stats.link.created_at.format("%Y-%m-%d %H:%M").to_string()
    );
    println!(
        "  Total clicks: {}",
        stats.total_clicks.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Lists the most recent links.
///
/// ```text
/// 📋 Links
///
///   Code       Created           Long URL
///   ───────────────────────────────────────────────────────────
///   aZ3x9Q     2025-01-15 10:30  https://www.rust-lang.org/learn
/// ```
async fn list_links(service: &LinkService, config: &Config, limit: i64) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service.list_links(limit).await.context("Failed to list links")?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin -- create --url <URL>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<10} {:<17} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Long URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<10} {:<17} {}",
            link.code.bright_yellow(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.long_url.cyan()
        );
    }

    println!();
    println!(
        "  Total: {}   Base URL: {}",
        links.len().to_string().bright_white().bold(),
        config.base_url.bright_black()
    );
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &LinkService, code: &str, skip_confirm: bool) -> Result<()> {
    let stats = service
        .get_link_stats(code)
        .await
        .with_context(|| format!("Failed to find link '{code}'"))?;

    println!("{}", "🗑️  Delete short link".bright_blue().bold());
    println!();
    println!("  Code:     {}", stats.link.code.bright_yellow());
    println!("  Long URL: {}", stats.link.long_url.cyan());
    println!(
        "  Clicks:   {}",
        stats.total_clicks.to_string().bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link and its clicks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(code)
        .await
        .context("Failed to delete link")?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}
