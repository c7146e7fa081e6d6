use crate::normalizer::NormalizeError;
use crate::storage::StorageError;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: Url, status: u16 },

    #[error("Page was not fetched: {0}")]
    MissingPage(Url),

    #[error("Task error: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Unknown spider: {0}")]
    UnknownSpider(String),

    #[error("Normalization error: {0}")]
    NormalizeError(#[from] NormalizeError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl ScraperError {
    pub fn extraction(msg: impl Into<String>) -> Self {
        ScraperError::ExtractionError(msg.into())
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;
