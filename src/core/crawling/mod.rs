mod crawler;

pub use crawler::{CrawlSummary, Crawler};
