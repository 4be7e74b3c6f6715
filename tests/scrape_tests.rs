use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ecom_scrape::browser::{BrowserSession, SessionLauncher};
use ecom_scrape::runner::{run_browser_jobs, run_static_jobs};
use ecom_scrape::{PaginationOptions, ScrapeConfig, ScrapeError};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn card(title: &str, price: &str, stars: usize, reviews: u32) -> String {
    format!(
        r#"<div class="col-md-4 col-xl-4 col-lg-4">
            <div class="card thumbnail">
                <h4 class="price float-end card-title pull-right">{price}</h4>
                <h4><a href="/product/{reviews}" class="title" title="{title}">{title}</a></h4>
                <p class="description card-text">{title}&nbsp;description</p>
                <div class="ratings">
                    <p class="review-count float-end">{reviews} reviews</p>
                    <p data-rating="{stars}">{icons}</p>
                </div>
            </div>
        </div>"#,
        icons = "<span class=\"ws-icon ws-icon-star\"></span>".repeat(stars),
    )
}

fn listing(cards: &[String]) -> String {
    format!(
        r#"<html><body>
            <div class="container test-site"><div class="row">
                <div class="col-lg-3 sidebar"></div>
                <div class="col-lg-9"><div class="row">{}</div></div>
            </div></div>
        </body></html>"#,
        cards.concat()
    )
}

fn config(base_url: &str, out_dir: &std::path::Path) -> ScrapeConfig {
    let mut config = ScrapeConfig::new(base_url, out_dir).unwrap();
    config.pagination = PaginationOptions {
        settle_delay: Duration::ZERO,
        click_timeout: Duration::ZERO,
        poll_interval: Duration::ZERO,
        ..PaginationOptions::default()
    };
    config
}

async fn serve(server: &MockServer, at: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn static_jobs_write_files_independently() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/test-sites/e-commerce/more/",
        200,
        listing(&[card("ASUS X", "$299.00", 2, 7), card("Lenovo Y", "$19.99", 4, 12)]),
    )
    .await;
    serve(
        &server,
        "/test-sites/e-commerce/more/computers",
        200,
        listing(&[card("Dell Z", "$1099.50", 5, 3)]),
    )
    .await;
    serve(&server, "/test-sites/e-commerce/more/phones", 404, String::new()).await;

    let out = tempdir().unwrap();
    let config = config(&format!("{}/", server.uri()), out.path());
    let client = reqwest::Client::new();

    let outcomes = run_static_jobs(&config, &client).await;
    assert_eq!(outcomes.len(), 3);

    let home = std::fs::read_to_string(out.path().join("home.csv")).unwrap();
    let lines: Vec<_> = home.lines().collect();
    assert_eq!(
        lines,
        [
            "title,description,price,rating,num_of_reviews",
            "ASUS X,ASUS X description,299.0,2,7",
            "Lenovo Y,Lenovo Y description,19.99,4,12",
        ]
    );

    let computers = std::fs::read_to_string(out.path().join("computers.csv")).unwrap();
    assert_eq!(computers.lines().count(), 2);

    let phones = outcomes.iter().find(|o| o.category == "phones").unwrap();
    assert!(matches!(phones.result, Err(ScrapeError::Network { .. })));
    assert!(!out.path().join("phones.csv").exists());
}

#[tokio::test]
async fn malformed_card_fails_only_its_category() {
    let server = MockServer::start().await;
    let broken = card("Broken", "$call us", 1, 1);
    serve(&server, "/test-sites/e-commerce/more/", 200, listing(&[broken])).await;
    serve(&server, "/test-sites/e-commerce/more/computers", 200, listing(&[])).await;
    serve(
        &server,
        "/test-sites/e-commerce/more/phones",
        200,
        listing(&[card("Nokia", "$24.99", 3, 9)]),
    )
    .await;

    let out = tempdir().unwrap();
    let config = config(&format!("{}/", server.uri()), out.path());
    let outcomes = run_static_jobs(&config, &reqwest::Client::new()).await;

    let home = outcomes.iter().find(|o| o.category == "home").unwrap();
    assert!(matches!(home.result, Err(ScrapeError::Parse { field: "price", .. })));

    let computers = std::fs::read_to_string(out.path().join("computers.csv")).unwrap();
    assert_eq!(computers.lines().count(), 1);
    assert!(out.path().join("phones.csv").exists());
}

/// Browser stand-in: laptops loads fine, tablets has no cookie banner and
/// touch blows up on navigation.
struct StubSession {
    url: Mutex<String>,
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn goto(&self, url: &str) -> ecom_scrape::Result<()> {
        if url.ends_with("/touch") {
            panic!("renderer crashed");
        }
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn click(&self, class_name: &str) -> ecom_scrape::Result<()> {
        if self.url.lock().unwrap().ends_with("/tablets") {
            return Err(ScrapeError::ElementNotFound {
                class_name: class_name.to_string(),
            });
        }
        Ok(())
    }

    async fn require(&self, _class_name: &str) -> ecom_scrape::Result<()> {
        Ok(())
    }

    async fn scroll_to(&self, _y: u32) -> ecom_scrape::Result<()> {
        Ok(())
    }

    async fn click_when_clickable(&self, _class_name: &str, _timeout: Duration, _poll: Duration) -> ecom_scrape::Result<bool> {
        Ok(false)
    }

    async fn page_source(&self) -> ecom_scrape::Result<String> {
        Ok(listing(&[card("Packard 255 G2", "$416.99", 2, 2)]))
    }

    async fn quit(self) -> ecom_scrape::Result<()> {
        Ok(())
    }
}

struct StubLauncher;

#[async_trait]
impl SessionLauncher for StubLauncher {
    type Session = StubSession;

    async fn launch(&self) -> ecom_scrape::Result<StubSession> {
        Ok(StubSession {
            url: Mutex::new(String::new()),
        })
    }
}

#[tokio::test]
async fn browser_job_failures_are_isolated() {
    let out = tempdir().unwrap();
    let config = config("http://shop.test/", out.path());

    let outcomes = run_browser_jobs(&config, StubLauncher).await;
    assert_eq!(outcomes.len(), 3);

    let laptops = std::fs::read_to_string(out.path().join("laptops.csv")).unwrap();
    assert_eq!(laptops.lines().count(), 2);
    assert!(laptops.contains("Packard 255 G2,Packard 255 G2 description,416.99,2,2"));

    let tablets = outcomes.iter().find(|o| o.category == "tablets").unwrap();
    assert!(matches!(tablets.result, Err(ScrapeError::ElementNotFound { .. })));

    let touch = outcomes.iter().find(|o| o.category == "touch").unwrap();
    assert!(matches!(touch.result, Err(ScrapeError::JobPanicked { .. })));
    assert!(!out.path().join("touch.csv").exists());
}

/// Counts how many sessions are open at the same time.
#[derive(Clone, Default)]
struct CountingLauncher {
    open: Arc<AtomicUsize>,
    most_open: Arc<AtomicUsize>,
    launched: Arc<AtomicUsize>,
}

struct CountingSession {
    open: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for CountingSession {
    async fn goto(&self, _url: &str) -> ecom_scrape::Result<()> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(())
    }

    async fn click(&self, _class_name: &str) -> ecom_scrape::Result<()> {
        Ok(())
    }

    async fn require(&self, _class_name: &str) -> ecom_scrape::Result<()> {
        Ok(())
    }

    async fn scroll_to(&self, _y: u32) -> ecom_scrape::Result<()> {
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn click_when_clickable(&self, _class_name: &str, _timeout: Duration, _poll: Duration) -> ecom_scrape::Result<bool> {
        Ok(false)
    }

    async fn page_source(&self) -> ecom_scrape::Result<String> {
        Ok(listing(&[card("Galaxy Tab", "$251.99", 3, 5)]))
    }

    async fn quit(self) -> ecom_scrape::Result<()> {
        self.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SessionLauncher for CountingLauncher {
    type Session = CountingSession;

    async fn launch(&self) -> ecom_scrape::Result<CountingSession> {
        self.launched.fetch_add(1, Ordering::SeqCst);
        let now_open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.most_open.fetch_max(now_open, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(CountingSession {
            open: Arc::clone(&self.open),
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn browser_workers_caps_open_sessions() {
    let out = tempdir().unwrap();
    let mut config = config("http://shop.test/", out.path());
    config.browser_workers = 1;
    let launcher = CountingLauncher::default();

    let outcomes = run_browser_jobs(&config, launcher.clone()).await;

    assert!(outcomes.iter().all(|o| o.result.is_ok()));
    assert_eq!(launcher.launched.load(Ordering::SeqCst), 3);
    assert_eq!(launcher.most_open.load(Ordering::SeqCst), 1);
    assert_eq!(launcher.open.load(Ordering::SeqCst), 0);
}
