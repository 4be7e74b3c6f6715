use thiserror::Error;
use thirtyfour::error::WebDriverError;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("card has no {field}")]
    MissingField { field: &'static str },

    #[error("cannot parse {field} from {value:?}: {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("webdriver error: {0}")]
    Driver(#[from] WebDriverError),

    #[error("no element with class {class_name:?} on the page")]
    ElementNotFound { class_name: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{category} job panicked: {message}")]
    JobPanicked { category: String, message: String },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
