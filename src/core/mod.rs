mod crawling;
mod errors;
pub mod spider;

pub use crawling::{CrawlSummary, Crawler};
pub use errors::{ScraperError, ScraperResult};
pub use spider::{CrawlConfig, Spider};
