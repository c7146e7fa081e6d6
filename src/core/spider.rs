use crate::http::{PageRequest, PageSet};
use crate::meeting::MeetingDraft;
use crate::ScraperResult;
use chrono::NaiveDateTime;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings shared by every fetch in a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub user_agent: String,
    pub headers: Vec<(String, String)>,
    pub max_concurrency: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: Vec::new(),
            max_concurrency: 4,
        }
    }
}

impl CrawlConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }
}

/// A site-specific extractor.
///
/// The crawler fetches every request from `start_requests` and then calls
/// `parse` once with all of them, so a spider that needs several pages reads
/// them from the `PageSet` instead of keeping state between callbacks.
pub trait Spider: Send + Sync {
    /// Agency slug, also the first segment of every meeting id.
    fn name(&self) -> &str;

    /// Human-readable agency name.
    fn agency(&self) -> &str;

    fn start_urls(&self) -> Vec<Url>;

    /// Pages to fetch for a run at `now`. Defaults to a GET of each start URL.
    fn start_requests(&self, _now: NaiveDateTime) -> Vec<PageRequest> {
        self.start_urls().into_iter().map(PageRequest::get).collect()
    }

    fn parse(&self, pages: &PageSet) -> ScraperResult<Vec<MeetingDraft>>;
}
