use crate::core::CrawlConfig;
use crate::http::{Page, PageRequest};
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::sleep;

use super::Fetcher;

#[derive(Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<std::time::Duration>,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct Counters {
    started: AtomicUsize,
    finished: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Serves canned pages by URL, e.g. captured fixtures. Form fields are
/// ignored, so every POST to a URL gets the same response.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<HashMap<String, MockResponse>>,
    counters: Arc<Counters>,
}

impl MockFetcher {
    pub fn new(responses: Vec<(&str, MockResponse)>) -> Self {
        Self {
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(url, response)| (url.to_string(), response))
                    .collect(),
            ),
            counters: Arc::default(),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.counters.started.load(Ordering::SeqCst)
    }

    /// Fetches that ran to completion, delay included.
    pub fn finished_count(&self) -> usize {
        self.counters.finished.load(Ordering::SeqCst)
    }

    /// Most fetches that were ever running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &PageRequest, _config: &CrawlConfig) -> ScraperResult<Page> {
        let counters = &self.counters;
        counters.started.fetch_add(1, Ordering::SeqCst);

        let response = self
            .responses
            .get(request.url.as_str())
            .ok_or_else(|| ScraperError::MissingPage(request.url.clone()))?;

        let running = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = response.delay {
            sleep(delay).await;
        }
        counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        counters.finished.fetch_add(1, Ordering::SeqCst);

        Ok(Page::new(
            request.url.clone(),
            response.status,
            response.body.clone(),
        ))
    }

    fn box_clone(&self) -> Box<dyn Fetcher> {
        Box::new(self.clone())
    }
}
