use url::Url;

use crate::error::Result;

pub const STATIC_CARD_SELECTOR: &str = "div.col-lg-9 > div.row > div.col-md-4";
pub const PAGINATED_CARD_SELECTOR: &str = "div.container > div.row > div.col-lg-9 > div.row > div.col-md-4";

/// One listing page of the demo shop and where its products end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub path: &'static str,
    pub paginated: bool,
    pub card_selector: &'static str,
    pub file_name: &'static str,
}

impl Category {
    pub fn url(&self, base: &Url) -> Result<Url> {
        Ok(base.join(self.path)?)
    }
}

pub static CATEGORIES: [Category; 6] = [
    Category {
        name: "home",
        path: "test-sites/e-commerce/more/",
        paginated: false,
        card_selector: STATIC_CARD_SELECTOR,
        file_name: "home.csv",
    },
    Category {
        name: "computers",
        path: "test-sites/e-commerce/more/computers",
        paginated: false,
        card_selector: STATIC_CARD_SELECTOR,
        file_name: "computers.csv",
    },
    Category {
        name: "phones",
        path: "test-sites/e-commerce/more/phones",
        paginated: false,
        card_selector: STATIC_CARD_SELECTOR,
        file_name: "phones.csv",
    },
    Category {
        name: "laptops",
        path: "test-sites/e-commerce/more/computers/laptops",
        paginated: true,
        card_selector: PAGINATED_CARD_SELECTOR,
        file_name: "laptops.csv",
    },
    Category {
        name: "tablets",
        path: "test-sites/e-commerce/more/computers/tablets",
        paginated: true,
        card_selector: PAGINATED_CARD_SELECTOR,
        file_name: "tablets.csv",
    },
    Category {
        name: "touch",
        path: "test-sites/e-commerce/more/phones/touch",
        paginated: true,
        card_selector: PAGINATED_CARD_SELECTOR,
        file_name: "touch.csv",
    },
];

pub fn static_categories() -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(|c| !c.paginated)
}

pub fn paginated_categories() -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(|c| c.paginated)
}
