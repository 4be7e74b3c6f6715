use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::error::Result;
use crate::models::{PRODUCT_FIELDS, Product};

/// Write `products` to `path` as CSV, replacing whatever was there.
/// The header row is written even when there are no products.
pub fn write_products(products: &[Product], path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(PRODUCT_FIELDS)?;
    for product in products {
        writer.serialize(product)?;
    }
    writer.flush()?;

    info!(path = %path.display(), products = products.len(), "wrote CSV");
    Ok(())
}
