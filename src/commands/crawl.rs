use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;

use rever_crawler::config::Config;
use rever_crawler::crawler::{open_renderer, CrawlReport, Crawler, PageCrawler};
use rever_crawler::models::{number_listings, CrawlStats};
use rever_crawler::storage::{output_path, writer_for, TabularWriter};

use super::report::print_summary;

/// Crawl the configured page range and export the listings
pub async fn crawl(config: Config) -> Result<()> {
    let crawler = Crawler::new(&config)?;
    let writer = writer_for(config.output.format);

    let pages = crawler.pages();
    println!(
        "Starting crawl of {} pages from rever.vn...",
        pages.end() - pages.start() + 1
    );
    println!("{}", "=".repeat(80));

    let mut renderer = open_renderer(&config)
        .await
        .context("Failed to open rendering session")?;

    let report = crawler.run(renderer.as_mut()).await;

    renderer
        .close()
        .await
        .context("Failed to close rendering session")?;

    let path = export(&config, writer.as_ref(), &report)?;
    print_summary(&report, &path, config.output.preview_rows);

    Ok(())
}

/// Extract listings from a saved results page and export them
pub async fn extract(config: Config, input: PathBuf) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let html = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let page_crawler = PageCrawler::new(&config)?;
    let result = page_crawler.extract(&html, config.crawler.first_page);

    let mut stats = CrawlStats::default();
    stats.record(&result.outcome);

    let report = CrawlReport {
        records: number_listings(result.listings),
        stats,
        pages: vec![result.outcome],
    };

    let writer = writer_for(config.output.format);
    let path = export(&config, writer.as_ref(), &report)?;
    print_summary(&report, &path, config.output.preview_rows);

    Ok(())
}

fn export(config: &Config, writer: &dyn TabularWriter, report: &CrawlReport) -> Result<PathBuf> {
    let path = output_path(
        &config.output.dir,
        &config.output.file_prefix,
        writer.extension(),
        &Local::now(),
    );

    writer
        .write(&report.records, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = report.records.len(), "Export written");
    Ok(path)
}
