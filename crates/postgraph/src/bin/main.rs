//! postgraph CLI

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use postgraph::Site;
use postgraph::server;
use postgraph_core::SiteConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Backlinks, graph data and link checking for a markdown blog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "POSTGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Content directory (overrides the configuration file)
    #[arg(long, env = "POSTGRAPH_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// Include documents marked `draft: true`
    #[arg(long, action = clap::ArgAction::SetTrue)]
    drafts: bool,

    /// Log output format (logs always go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report internal links whose target does not exist
    Check,

    /// Print the graph dataset as JSON
    Graph {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, action = clap::ArgAction::SetTrue)]
        pretty: bool,

        /// Also print a connectivity summary to stderr
        #[arg(long, action = clap::ArgAction::SetTrue)]
        stats: bool,
    },

    /// List documents linking to ID
    Backlinks {
        id: String,

        #[arg(long, action = clap::ArgAction::SetTrue)]
        json: bool,
    },

    /// Serve /graph.json and /backlinks/{id} over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Human,
    Json,
}

fn log_level(config_level: &str, verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => config_level.parse().unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn init_logging(format: LogFormat, level: log::LevelFilter) -> anyhow::Result<()> {
    match format {
        LogFormat::Human => {
            use simple_logger::SimpleLogger;

            SimpleLogger::new()
                .with_level(level)
                .with_utc_timestamps()
                .init()
                .map_err(|e| anyhow!("Failed to initialize logger: {}", e))
        }
        LogFormat::Json => {
            use tracing_subscriber::EnvFilter;

            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logger: {}", e))
        }
    }
}

async fn load_config(cli: &Cli) -> anyhow::Result<SiteConfig> {
    let mut config = match &cli.config {
        Some(path) => SiteConfig::load(path).await?,
        None => SiteConfig::default(),
    };

    if let Some(dir) = &cli.content_dir {
        config.content_dir = dir.clone();
    }
    if cli.drafts {
        config.include_drafts = true;
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli, mut config: SiteConfig) -> anyhow::Result<ExitCode> {
    if matches!(cli.command, Command::Check) {
        // Drafts are still valid link targets
        config.include_drafts = true;
    }

    let site = Site::load(config)
        .await
        .context("Failed to load content")?;

    match cli.command {
        Command::Check => {
            let report = site.check();
            for broken in &report.broken {
                eprintln!("{}", broken);
            }
            if report.is_clean() {
                println!("{}", report.summary());
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{}", report.summary());
                Ok(ExitCode::FAILURE)
            }
        }

        Command::Graph {
            output,
            pretty,
            stats,
        } => {
            let dataset = site.graph();
            if let Err(e) = dataset.validate() {
                log::warn!("Graph dataset is inconsistent: {}", e);
            }

            let json = if pretty {
                dataset.to_json_pretty()?
            } else {
                dataset.to_json()?
            };

            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("Wrote graph dataset to {}", path.display());
                }
                None => println!("{}", json),
            }

            if stats {
                let stats = dataset.stats();
                eprintln!(
                    "posts: {}  tags: {}  post links: {}  tag links: {}  components: {}",
                    stats.posts, stats.tags, stats.post_links, stats.tag_links, stats.components
                );
                eprintln!("orphaned posts: {}", stats.orphaned_posts.len());
                for id in &stats.orphaned_posts {
                    eprintln!("  {}", id);
                }
                if !stats.cycles.is_empty() {
                    eprintln!("link cycles: {}", stats.cycles.len());
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Backlinks { id, json } => {
            let report = site.backlinks(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.backlinks.is_empty() {
                println!("No documents link to {}", report.id);
            } else {
                for entry in &report.backlinks {
                    println!("{}\t{}", entry.id, entry.title);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| site.config().server.host.clone());
            let port = port.unwrap_or(site.config().server.port);

            server::serve(Arc::new(site), &host, port, server::shutdown_signal()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(&cli).await?;
    init_logging(cli.log_format, log_level(&config.log_level, cli.verbose))?;

    log::debug!("postgraph v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Content directory: {}", config.content_dir.display());

    run(cli, config).await
}
