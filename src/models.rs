use serde::Serialize;

/// Column names of every output file, in field declaration order.
pub const PRODUCT_FIELDS: [&str; 5] = ["title", "description", "price", "rating", "num_of_reviews"];

/// One product card as it appears on a listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub rating: u32,
    pub num_of_reviews: u32,
}
