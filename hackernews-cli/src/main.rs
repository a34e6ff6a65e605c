//! hackernews-mcp - MCP server and command-line client for Hacker News

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hackernews_core::batch::BatchFetcher;
use hackernews_core::client::{HackerNewsClient, ItemId, StoryCategory};
use hackernews_core::config::HackerNewsConfig;
use hackernews_core::tools::DEFAULT_STORY_LIMIT;
use tracing::info;

#[derive(Parser)]
#[command(name = "hackernews-mcp")]
#[command(about = "Hacker News MCP server", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file, loaded on top of the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout, e.g. "10s" or "500ms"
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Maximum simultaneous item fetches
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Serve,
    /// Print one item as JSON, or `null` if it does not exist
    Item {
        /// Item ID, a positive integer
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        id: ItemId,
    },
    /// Print the first stories of a category as JSON
    Stories {
        /// One of top, new, best, ask, show, job
        category: StoryCategory,

        /// Number of stories
        #[arg(short, long, default_value_t = DEFAULT_STORY_LIMIT)]
        limit: usize,
    },
    /// Version information
    Version,
}

impl Cli {
    fn load_config(&self) -> Result<HackerNewsConfig> {
        let mut config = match self.config {
            Some(ref path) => HackerNewsConfig::from_file(path)?,
            None => HackerNewsConfig::load()?,
        };

        if let Some(ref base_url) = self.base_url {
            config.client.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.client.timeout = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.batch.max_concurrency = concurrency;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Reject a story limit outside `1..=max` before anything touches the network
fn check_limit(category: StoryCategory, limit: usize) -> Result<()> {
    if limit == 0 || limit > category.max_limit() {
        bail!(
            "limit must be between 1 and {} for {} stories",
            category.max_limit(),
            category
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut cli = Cli::parse();

    match cli.command.take() {
        None | Some(Commands::Serve) => {
            let config = cli.load_config()?;
            let server = hackernews_core::build_server(&config)?;
            info!(
                base_url = %config.client.base_url,
                max_concurrency = config.batch.max_concurrency,
                "starting Hacker News MCP server on stdio"
            );
            server.run_stdio().await?;
        }
        Some(Commands::Item { id }) => {
            let config = cli.load_config()?;
            let client = HackerNewsClient::new(&config.client)?;
            let item = client
                .get_item(id)
                .await
                .with_context(|| format!("failed to fetch item {}", id))?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Some(Commands::Stories { category, limit }) => {
            check_limit(category, limit)?;

            let config = cli.load_config()?;
            let client = HackerNewsClient::new(&config.client)?;
            let fetcher = BatchFetcher::from_config(client, &config.batch);
            let stories = fetcher
                .fetch_batch(|| fetcher.source().get_story_ids(category), limit)
                .await
                .with_context(|| format!("failed to fetch {} stories", category))?;
            println!("{}", serde_json::to_string_pretty(&stories)?);
        }
        Some(Commands::Version) => {
            println!("hackernews-mcp {}", env!("CARGO_PKG_VERSION"));
            println!("hackernews-core {}", hackernews_core::VERSION);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["hackernews-mcp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["hackernews-mcp", "serve", "--timeout", "500ms"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.timeout, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_item_id_must_be_positive() {
        let cli = Cli::try_parse_from(["hackernews-mcp", "item", "8863"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Item { id: 8863 })));

        assert!(Cli::try_parse_from(["hackernews-mcp", "item", "0"]).is_err());
        assert!(Cli::try_parse_from(["hackernews-mcp", "item", "-3"]).is_err());
        assert!(Cli::try_parse_from(["hackernews-mcp", "item", "abc"]).is_err());
    }

    #[test]
    fn test_stories_arguments() {
        let cli = Cli::try_parse_from(["hackernews-mcp", "stories", "ask"]).unwrap();
        match cli.command {
            Some(Commands::Stories { category, limit }) => {
                assert_eq!(category, StoryCategory::Ask);
                assert_eq!(limit, DEFAULT_STORY_LIMIT);
            }
            _ => panic!("expected stories command"),
        }

        assert!(Cli::try_parse_from(["hackernews-mcp", "stories", "front"]).is_err());
    }

    #[test]
    fn test_check_limit() {
        assert!(check_limit(StoryCategory::Top, 500).is_ok());
        assert!(check_limit(StoryCategory::Ask, 200).is_ok());
        assert!(check_limit(StoryCategory::Ask, 201).is_err());
        assert!(check_limit(StoryCategory::Job, 0).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hackernews-mcp",
            "stories",
            "top",
            "--limit",
            "5",
            "--concurrency",
            "2",
            "--base-url",
            "http://127.0.0.1:9000/v0",
        ])
        .unwrap();
        assert_eq!(cli.concurrency, Some(2));
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:9000/v0"));
    }
}
