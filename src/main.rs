use clap::Parser;
use tracing::{info, warn};

use ecom_scrape::{Args, logging, run_all};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;
    let config = args.into_config()?;

    info!(base_url = %config.base_url, out_dir = %config.out_dir.display(), "scraping all categories");
    let summary = run_all(&config).await?;

    for (category, e) in summary.failed() {
        warn!(category, error = %e, "no file written");
    }
    info!(files = summary.written().count(), failed = summary.failed().count(), "done");
    Ok(())
}
