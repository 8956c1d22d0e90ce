//! Configuration management for the rever crawler
//!
//! This module handles loading and validating configuration from environment
//! variables, TOML files, and command-line overrides. The defaults reproduce
//! the fixed crawl: pages 1 through 30 of the Ho Chi Minh City apartment
//! search, exported as CSV.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Search results URL; the `page` query parameter is set per page
pub const DEFAULT_BASE_URL: &str = "https://rever.vn/s/ho-chi-minh/mua/can-ho";

/// Desktop Chrome user agent sent by both renderers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Search results URL without the page parameter
    pub base_url: String,

    /// First page index (inclusive, 1-based)
    pub first_page: u32,

    /// Last page index (inclusive)
    pub last_page: u32,

    /// Navigation timeout in milliseconds
    pub navigation_timeout_ms: u64,

    /// Timeout for the first listing container to appear, in milliseconds
    pub readiness_timeout_ms: u64,

    /// Pause after readiness for client-rendered content, in milliseconds
    pub settle_delay_ms: u64,

    /// Pause between page visits, in milliseconds
    pub inter_page_delay_ms: u64,

    /// User agent string
    pub user_agent: String,

    /// Which renderer loads the pages
    pub renderer: RendererKind,

    /// Run Chrome without a window
    pub headless: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the export file is written to
    pub dir: PathBuf,

    /// File name prefix, followed by the completion timestamp
    pub file_prefix: String,

    /// Export format
    pub format: OutputFormat,

    /// Number of rows shown in the terminal preview
    pub preview_rows: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

/// Page renderer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chromium, executes client-side scripts
    #[default]
    Chrome,
    /// Plain HTTP fetch of the server-rendered markup
    Http,
}

impl FromStr for RendererKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" | "browser" => Ok(Self::Chrome),
            "http" | "static" => Ok(Self::Http),
            _ => anyhow::bail!("Unknown renderer: {s}. Valid: chrome, http"),
        }
    }
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Xlsx,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown output format: {s}. Valid: csv, xlsx, json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("REVER_BASE_URL").unwrap_or_else(|_| defaults.crawler.base_url.clone());

        let first_page = env_parse("REVER_FIRST_PAGE").unwrap_or(defaults.crawler.first_page);
        let last_page = env_parse("REVER_LAST_PAGE").unwrap_or(defaults.crawler.last_page);

        let navigation_timeout_ms = env_parse("REVER_NAVIGATION_TIMEOUT_MS")
            .unwrap_or(defaults.crawler.navigation_timeout_ms);
        let readiness_timeout_ms = env_parse("REVER_READINESS_TIMEOUT_MS")
            .unwrap_or(defaults.crawler.readiness_timeout_ms);
        let settle_delay_ms =
            env_parse("REVER_SETTLE_DELAY_MS").unwrap_or(defaults.crawler.settle_delay_ms);
        let inter_page_delay_ms =
            env_parse("REVER_INTER_PAGE_DELAY_MS").unwrap_or(defaults.crawler.inter_page_delay_ms);

        let user_agent = std::env::var("REVER_USER_AGENT")
            .unwrap_or_else(|_| defaults.crawler.user_agent.clone());

        let renderer = env_parse("REVER_RENDERER").unwrap_or(defaults.crawler.renderer);
        let headless = env_parse("REVER_HEADLESS").unwrap_or(defaults.crawler.headless);

        let output_dir = std::env::var("REVER_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| defaults.output.dir.clone());
        let output_format = env_parse("REVER_OUTPUT_FORMAT").unwrap_or(defaults.output.format);

        let log_level =
            std::env::var("REVER_LOG_LEVEL").unwrap_or_else(|_| defaults.logging.level.clone());
        let log_format =
            std::env::var("REVER_LOG_FORMAT").unwrap_or_else(|_| defaults.logging.format.clone());

        Ok(Self {
            crawler: CrawlerConfig {
                base_url,
                first_page,
                last_page,
                navigation_timeout_ms,
                readiness_timeout_ms,
                settle_delay_ms,
                inter_page_delay_ms,
                user_agent,
                renderer,
                headless,
            },
            output: OutputConfig {
                dir: output_dir,
                format: output_format,
                ..defaults.output
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawler.first_page == 0 {
            anyhow::bail!("first_page must be at least 1");
        }

        if self.crawler.last_page < self.crawler.first_page {
            anyhow::bail!(
                "last_page ({}) must not be smaller than first_page ({})",
                self.crawler.last_page,
                self.crawler.first_page
            );
        }

        if self.crawler.navigation_timeout_ms == 0 {
            anyhow::bail!("navigation_timeout_ms must be greater than 0");
        }

        if self.crawler.readiness_timeout_ms == 0 {
            anyhow::bail!("readiness_timeout_ms must be greater than 0");
        }

        url::Url::parse(&self.crawler.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.crawler.base_url))?;

        if self.output.file_prefix.trim().is_empty() {
            anyhow::bail!("file_prefix must not be empty");
        }

        Ok(())
    }

    /// Inclusive page range to crawl
    #[must_use]
    pub fn page_range(&self) -> std::ops::RangeInclusive<u32> {
        self.crawler.first_page..=self.crawler.last_page
    }

    /// Get navigation timeout as Duration
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.crawler.navigation_timeout_ms)
    }

    /// Get readiness timeout as Duration
    #[must_use]
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.crawler.readiness_timeout_ms)
    }

    /// Get settle delay as Duration
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.settle_delay_ms)
    }

    /// Get inter-page delay as Duration
    #[must_use]
    pub fn inter_page_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.inter_page_delay_ms)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            first_page: 1,
            last_page: 30,
            navigation_timeout_ms: 30_000,
            readiness_timeout_ms: 15_000,
            settle_delay_ms: 2_000,
            inter_page_delay_ms: 1_000,
            user_agent: String::from(DEFAULT_USER_AGENT),
            renderer: RendererKind::Chrome,
            headless: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_prefix: String::from("rever_hcm_30pages"),
            format: OutputFormat::Csv,
            preview_rows: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_range(), 1..=30);
    }

    #[test]
    fn test_zero_first_page_rejected() {
        let mut config = Config::default();
        config.crawler.first_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = Config::default();
        config.crawler.first_page = 5;
        config.crawler.last_page = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_single_page_range_is_valid() {
        let mut config = Config::default();
        config.crawler.first_page = 7;
        config.crawler.last_page = 7;
        assert!(config.validate().is_ok());
        assert_eq!(config.page_range().count(), 1);
    }

    #[test]
    fn test_duration_conversion() {
        let config = Config::default();
        assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
        assert_eq!(config.readiness_timeout(), Duration::from_secs(15));
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
        assert_eq!(config.inter_page_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            last_page = 3
            renderer = "http"

            [output]
            format = "xlsx"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.first_page, 1);
        assert_eq!(config.crawler.last_page, 3);
        assert_eq!(config.crawler.renderer, RendererKind::Http);
        assert_eq!(config.output.format, OutputFormat::Xlsx);
        assert_eq!(config.output.file_prefix, "rever_hcm_30pages");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!("Chrome".parse::<RendererKind>().unwrap(), RendererKind::Chrome);
        assert_eq!("static".parse::<RendererKind>().unwrap(), RendererKind::Http);
        assert!("firefox".parse::<RendererKind>().is_err());

        assert_eq!("excel".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert!("parquet".parse::<OutputFormat>().is_err());
    }
}
