use crate::core::CrawlConfig;
use crate::http::{Page, PageRequest};
use crate::ScraperResult;
use async_trait::async_trait;

/// Retrieves pages for spiders. Failures are returned as-is; nothing retries.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &PageRequest, config: &CrawlConfig) -> ScraperResult<Page>;
    fn box_clone(&self) -> Box<dyn Fetcher>;
}
