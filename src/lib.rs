pub mod core;
pub mod fetchers;
pub mod http;
pub mod meeting;
pub mod normalizer;
pub mod spiders;
pub mod stats;
pub mod storage;

pub use core::Crawler;
pub use core::{CrawlConfig, CrawlSummary, ScraperError, ScraperResult, Spider};
pub use fetchers::{Fetcher, HttpFetcher};
pub use http::{Page, PageRequest, PageSet};
pub use meeting::{Meeting, MeetingDraft};
pub use normalizer::{NormalizeError, Normalizer};
pub use stats::StatsTracker;
pub use storage::{DiskStorage, MeetingSink};
