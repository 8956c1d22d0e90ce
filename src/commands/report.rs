use std::path::Path;

use rever_crawler::analytics::{column_coverage, PriceStatistics};
use rever_crawler::crawler::CrawlReport;
use rever_crawler::models::ListingRecord;
use rever_crawler::utils::truncate_text;

/// Print the operator report for a finished run
pub fn print_summary(report: &CrawlReport, path: &Path, preview_rows: usize) {
    let stats = &report.stats;

    println!("{}", "=".repeat(80));
    println!("CRAWL COMPLETED!");
    println!("Total listings collected: {}", report.records.len());
    println!(
        "Pages visited: {} (failed: {})",
        stats.pages_visited, stats.pages_failed
    );
    if stats.listings_dropped > 0 {
        println!("Listings dropped: {}", stats.listings_dropped);
    }
    println!("Saved to: {}", path.display());

    println!("\nData preview:");
    print_preview(&report.records, preview_rows);

    println!("\nData summary:");
    for (column, count) in column_coverage(&report.records) {
        println!("  {column:<16} {count} non-null");
    }

    println!("\nPrice statistics:");
    match PriceStatistics::from_records(&report.records) {
        Some(price_stats) => print!("{price_stats}"),
        None => println!("  no prices"),
    }
}

fn print_preview(records: &[ListingRecord], rows: usize) {
    if records.is_empty() {
        println!("  (empty)");
        return;
    }

    println!(
        "{:>4}  {:<14} {:<40} {:>8} {:>8} {:>3} {:>3}  {:<30}",
        "STT", "ID tin", "Tiêu đề", "Giá (tỷ)", "m²", "PN", "WC", "Địa chỉ"
    );

    for record in records.iter().take(rows) {
        println!(
            "{:>4}  {:<14} {:<40} {:>8} {:>8} {:>3} {:>3}  {:<30}",
            record.sequence_number,
            cell(record.listing_id.as_deref(), 14),
            cell(record.title.as_deref(), 40),
            number(record.price_billion),
            number(record.area_sq_m),
            count(record.bedroom_count),
            count(record.bathroom_count),
            cell(record.address.as_deref(), 30),
        );
    }
}

fn cell(value: Option<&str>, width: usize) -> String {
    value
        .map(|text| truncate_text(text, width))
        .unwrap_or_else(|| "-".to_string())
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn count(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
