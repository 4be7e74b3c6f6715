use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::archiver::write_products;
use crate::browser::{BrowserSession, ChromeLauncher, SessionLauncher, load_all_products};
use crate::categories::{Category, paginated_categories, static_categories};
use crate::config::ScrapeConfig;
use crate::error::{Result, ScrapeError};
use crate::fetcher::{build_client, fetch_html};
use crate::models::Product;
use crate::parser::parse_products;

/// What happened to one category.
#[derive(Debug)]
pub struct JobOutcome {
    pub category: &'static str,
    pub result: Result<PathBuf>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<JobOutcome>,
}

impl RunSummary {
    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&'static str, &ScrapeError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.category, e)))
    }
}

/// Scrape all six categories: static pages over HTTP and load-more pages in
/// their own browser sessions, both groups at once. Individual category
/// failures end up in the summary; only setup problems are returned as errors.
pub async fn run_all(config: &ScrapeConfig) -> Result<RunSummary> {
    tokio::fs::create_dir_all(&config.out_dir).await?;
    let client = build_client(config)?;
    let launcher = ChromeLauncher {
        webdriver_url: config.webdriver_url.clone(),
        headless: config.headless,
    };

    let (browser, fixed) = tokio::join!(
        run_browser_jobs(config, launcher),
        run_static_jobs(config, &client)
    );

    Ok(RunSummary {
        outcomes: fixed.into_iter().chain(browser).collect(),
    })
}

/// Fetch, parse and write every static category concurrently over one client.
pub async fn run_static_jobs(config: &ScrapeConfig, client: &reqwest::Client) -> Vec<JobOutcome> {
    let jobs = static_categories().map(|category| async move {
        report(category.name, static_job(config, client, category).await)
    });
    join_all(jobs).await
}

async fn static_job(config: &ScrapeConfig, client: &reqwest::Client, category: &Category) -> Result<PathBuf> {
    let url = category.url(&config.base_url)?;
    let html = fetch_html(client, url.as_str()).await?;
    let products = parse_products(&html, category.card_selector)?;
    save(config, category, &products)
}

/// Run every load-more category on its own task with its own browser session,
/// at most `config.browser_workers` sessions at a time.
pub async fn run_browser_jobs<L: SessionLauncher>(config: &ScrapeConfig, launcher: L) -> Vec<JobOutcome> {
    let launcher = Arc::new(launcher);
    let config = Arc::new(config.clone());
    let permits = Arc::new(Semaphore::new(config.browser_workers.max(1)));

    let mut jobs = JoinSet::new();
    let mut names = HashMap::new();
    for category in paginated_categories() {
        let launcher = Arc::clone(&launcher);
        let config = Arc::clone(&config);
        let permits = Arc::clone(&permits);
        let handle = jobs.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .expect("browser semaphore is never closed");
            browser_job(&config, launcher.as_ref(), category).await
        });
        names.insert(handle.id(), category.name);
    }

    let mut outcomes = Vec::with_capacity(names.len());
    while let Some(joined) = jobs.join_next_with_id().await {
        let outcome = match joined {
            Ok((id, result)) => report(names[&id], result),
            Err(e) => {
                let category = names[&e.id()];
                let failure = ScrapeError::JobPanicked {
                    category: category.to_string(),
                    message: e.to_string(),
                };
                report(category, Err(failure))
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

async fn browser_job<L: SessionLauncher>(config: &ScrapeConfig, launcher: &L, category: &Category) -> Result<PathBuf> {
    let url = category.url(&config.base_url)?;
    let session = launcher.launch().await?;
    let loaded = load_all_products(&session, url.as_str(), &config.pagination).await;
    if let Err(e) = session.quit().await {
        warn!(category = category.name, error = %e, "failed to close browser session");
    }

    let products = parse_products(&loaded?, category.card_selector)?;
    save(config, category, &products)
}

fn save(config: &ScrapeConfig, category: &Category, products: &[Product]) -> Result<PathBuf> {
    let path = config.out_dir.join(category.file_name);
    write_products(products, &path)?;
    Ok(path)
}

fn report(category: &'static str, result: Result<PathBuf>) -> JobOutcome {
    match &result {
        Ok(path) => info!(category, path = %path.display(), "category done"),
        Err(e) => error!(category, error = %e, "category failed"),
    }
    JobOutcome { category, result }
}
