use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://webscraper.io/";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How the load-more listings are driven.
#[derive(Debug, Clone)]
pub struct PaginationOptions {
    pub cookie_class: String,
    pub load_more_class: String,
    pub scroll_offset: u32,
    /// Pause after scrolling and after every load-more click.
    pub settle_delay: Duration,
    /// How long to wait for the load-more control to become clickable.
    pub click_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            cookie_class: "acceptCookies".to_string(),
            load_more_class: "ecomerce-items-scroll-more".to_string(),
            scroll_offset: 1000,
            settle_delay: Duration::from_secs(1),
            click_timeout: Duration::from_secs(1),
            poll_interval: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub out_dir: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub browser_workers: usize,
    pub request_timeout: Duration,
    pub pagination: PaginationOptions,
}

impl ScrapeConfig {
    pub fn new(base_url: &str, out_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            out_dir: out_dir.into(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            browser_workers: 3,
            request_timeout: Duration::from_secs(30),
            pagination: PaginationOptions::default(),
        })
    }
}

/// Scrape every product listing of the webscraper.io demo shop into CSV files.
#[derive(Parser, Debug)]
#[command(name = "ecom_scrape", version)]
pub struct Args {
    /// Site root the category paths are joined onto
    #[arg(long, env = "SCRAPE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory the CSV files are written to
    #[arg(long, env = "SCRAPE_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// WebDriver endpoint (chromedriver) used for load-more pages
    #[arg(long, env = "WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Maximum number of browser sessions open at once
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
    pub browser_workers: u16,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn into_config(self) -> Result<ScrapeConfig> {
        let mut config = ScrapeConfig::new(&self.base_url, self.out_dir)?;
        config.webdriver_url = self.webdriver_url;
        config.headless = self.headless;
        config.browser_workers = usize::from(self.browser_workers);
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        Ok(config)
    }
}
