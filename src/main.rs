mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rever_crawler::config::{Config, OutputFormat, RendererKind};

#[derive(Parser)]
#[command(
    name = "rever-crawler",
    version,
    about = "Crawler for rever.vn apartment-for-sale listings in Ho Chi Minh City",
    long_about = None
)]
struct Cli {
    /// Runs the default crawl when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML); environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (csv, xlsx, json)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Directory the export is written to
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl result pages and export the listings
    Crawl {
        /// First result page
        #[arg(long)]
        first_page: Option<u32>,

        /// Last result page (inclusive)
        #[arg(long)]
        last_page: Option<u32>,

        /// Page renderer (chrome, http)
        #[arg(short, long)]
        renderer: Option<RendererKind>,
    },

    /// Extract listings from a saved results page
    Extract {
        /// HTML file of a results page
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env().context("Failed to load configuration")?,
    };

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if let Some(log_format) = cli.log_format {
        config.logging.format = log_format;
    }

    // Initialize tracing/logging
    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    tracing::info!("rever-crawler starting");

    match cli.command {
        None => {
            tracing::info!("Starting default crawl");
            commands::crawl(config).await?;
        }

        Some(Commands::Crawl {
            first_page,
            last_page,
            renderer,
        }) => {
            if let Some(page) = first_page {
                config.crawler.first_page = page;
            }
            if let Some(page) = last_page {
                config.crawler.last_page = page;
            }
            if let Some(kind) = renderer {
                config.crawler.renderer = kind;
            }

            tracing::info!(
                first_page = config.crawler.first_page,
                last_page = config.crawler.last_page,
                renderer = ?config.crawler.renderer,
                "Starting crawl command"
            );
            commands::crawl(config).await?;
        }

        Some(Commands::Extract { input }) => {
            tracing::info!(input = %input.display(), "Starting extract command");
            commands::extract(config, input).await?;
        }
    }

    tracing::info!("rever-crawler completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("rever_crawler=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("rever_crawler={level},warn"))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
