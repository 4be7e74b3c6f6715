use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

use crate::config::PaginationOptions;
use crate::error::{Result, ScrapeError};

/// The handful of page interactions the load-more listings need.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Click the first element with `class_name`; fails if there is none.
    async fn click(&self, class_name: &str) -> Result<()>;

    /// Fail unless at least one element with `class_name` exists.
    async fn require(&self, class_name: &str) -> Result<()>;

    async fn scroll_to(&self, y: u32) -> Result<()>;

    /// Wait up to `timeout` for an element with `class_name` to become
    /// clickable and click it. `Ok(false)` means the wait timed out.
    async fn click_when_clickable(&self, class_name: &str, timeout: Duration, poll: Duration) -> Result<bool>;

    async fn page_source(&self) -> Result<String>;

    async fn quit(self) -> Result<()>;
}

/// Opens one fresh session per job.
#[async_trait]
pub trait SessionLauncher: Send + Sync + 'static {
    type Session: BrowserSession + 'static;

    async fn launch(&self) -> Result<Self::Session>;
}

pub struct ChromeLauncher {
    pub webdriver_url: String,
    pub headless: bool,
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self) -> Result<ChromeSession> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }
        let driver = WebDriver::new(self.webdriver_url.as_str(), caps).await?;
        debug!(webdriver = %self.webdriver_url, "browser session started");
        Ok(ChromeSession { driver })
    }
}

pub struct ChromeSession {
    driver: WebDriver,
}

impl ChromeSession {
    async fn first(&self, class_name: &str) -> Result<WebElement> {
        self.driver
            .find_all(By::ClassName(class_name))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScrapeError::ElementNotFound {
                class_name: class_name.to_string(),
            })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn click(&self, class_name: &str) -> Result<()> {
        self.first(class_name).await?.click().await?;
        Ok(())
    }

    async fn require(&self, class_name: &str) -> Result<()> {
        self.first(class_name).await.map(|_| ())
    }

    async fn scroll_to(&self, y: u32) -> Result<()> {
        self.driver
            .execute(format!("window.scrollTo(0, {y});"), Vec::new())
            .await?;
        Ok(())
    }

    async fn click_when_clickable(&self, class_name: &str, timeout: Duration, poll: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            for element in self.driver.find_all(By::ClassName(class_name)).await? {
                if element.is_clickable().await? {
                    element.click().await?;
                    return Ok(true);
                }
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(poll).await;
        }
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

/// Open `url`, accept cookies, and keep pressing "load more" until it stops
/// becoming clickable. Returns the markup of the fully expanded page.
///
/// Failures before the load-more loop propagate. Inside the loop a timeout
/// ends pagination normally and any other error ends it early with a warning;
/// either way the page loaded so far is returned.
#[instrument(skip(session, options))]
pub async fn load_all_products<S: BrowserSession>(session: &S, url: &str, options: &PaginationOptions) -> Result<String> {
    session.goto(url).await?;
    session.click(&options.cookie_class).await?;
    session.scroll_to(options.scroll_offset).await?;
    sleep(options.settle_delay).await;
    session.require(&options.load_more_class).await?;

    let mut clicks = 0usize;
    loop {
        match session
            .click_when_clickable(&options.load_more_class, options.click_timeout, options.poll_interval)
            .await
        {
            Ok(true) => {
                clicks += 1;
                sleep(options.settle_delay).await;
            }
            Ok(false) => {
                info!(clicks, "load-more control no longer clickable");
                break;
            }
            Err(e) => {
                warn!(clicks, error = %e, "stopped paginating");
                break;
            }
        }
    }

    session.page_source().await
}
