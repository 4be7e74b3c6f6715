//! Product scraper for the webscraper.io e-commerce demo shop.
//!
//! Static listings are fetched over HTTP; "load more" listings are expanded in
//! a WebDriver session. Every category is written to its own CSV file.

pub mod archiver;
pub mod browser;
pub mod categories;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod parser;
pub mod runner;

pub use config::{Args, PaginationOptions, ScrapeConfig};
pub use error::{Result, ScrapeError};
pub use models::{PRODUCT_FIELDS, Product};
pub use runner::{RunSummary, run_all};
