use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::models::Product;

const TITLE_SELECTOR: &str = "a.title";
const DESCRIPTION_SELECTOR: &str = "p.card-text.description";
const PRICE_SELECTOR: &str = "h4.price";
const RATING_ICON_SELECTOR: &str = "span.ws-icon";
const REVIEW_COUNT_SELECTOR: &str = "p.review-count";

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector(format!("{css}: {e}")))
}

/// Card field selectors, compiled once and reused for every card on a page.
pub struct ProductParser {
    title: Selector,
    description: Selector,
    price: Selector,
    rating_icon: Selector,
    review_count: Selector,
}

impl ProductParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: selector(TITLE_SELECTOR)?,
            description: selector(DESCRIPTION_SELECTOR)?,
            price: selector(PRICE_SELECTOR)?,
            rating_icon: selector(RATING_ICON_SELECTOR)?,
            review_count: selector(REVIEW_COUNT_SELECTOR)?,
        })
    }

    /// Every card matching `card` in document order. The first malformed
    /// card fails the whole page.
    pub fn collect(&self, document: &Html, card: &Selector) -> Result<Vec<Product>> {
        document
            .select(card)
            .map(|element| self.parse_card(element))
            .collect()
    }

    pub fn parse_card(&self, card: ElementRef<'_>) -> Result<Product> {
        let title = card
            .select(&self.title)
            .next()
            .and_then(|a| a.value().attr("title"))
            .filter(|title| !title.is_empty())
            .ok_or(ScrapeError::MissingField { field: "title" })?
            .to_string();

        let description = first_text(card, &self.description, "description")?.replace('\u{a0}', " ");
        let price = parse_price(&first_text(card, &self.price, "price")?)?;
        let rating = rating_from_icons(card.select(&self.rating_icon).count())?;
        let num_of_reviews = parse_review_count(&first_text(card, &self.review_count, "num_of_reviews")?)?;

        Ok(Product {
            title,
            description,
            price,
            rating,
            num_of_reviews,
        })
    }
}

/// Parse raw markup and collect every card matching `card_selector`.
pub fn parse_products(html: &str, card_selector: &str) -> Result<Vec<Product>> {
    let card = selector(card_selector)?;
    let document = Html::parse_document(html);
    ProductParser::new()?.collect(&document, &card)
}

fn first_text(card: ElementRef<'_>, selector: &Selector, field: &'static str) -> Result<String> {
    card.select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or(ScrapeError::MissingField { field })
}

/// `"$19.99"` -> `19.99`. Only a single leading dollar sign is stripped.
pub fn parse_price(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let amount = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let invalid = |reason: String| ScrapeError::Parse {
        field: "price",
        value: text.to_string(),
        reason,
    };
    let price = amount.parse::<f64>().map_err(|e| invalid(e.to_string()))?;
    if !price.is_finite() {
        return Err(invalid("not a finite number".to_string()));
    }
    Ok(price)
}

fn rating_from_icons(icons: usize) -> Result<u32> {
    u32::try_from(icons).map_err(|e| ScrapeError::Parse {
        field: "rating",
        value: icons.to_string(),
        reason: e.to_string(),
    })
}

/// `"12 reviews"` -> `12`.
pub fn parse_review_count(text: &str) -> Result<u32> {
    let token = text.split_whitespace().next().unwrap_or_default();
    token.parse::<u32>().map_err(|e| ScrapeError::Parse {
        field: "num_of_reviews",
        value: text.to_string(),
        reason: e.to_string(),
    })
}
