use crate::core::{CrawlConfig, Spider};
use crate::fetchers::Fetcher;
use crate::http::{Page, PageRequest, PageSet};
use crate::normalizer::Normalizer;
use crate::stats::StatsTracker;
use crate::storage::MeetingSink;
use crate::{ScraperError, ScraperResult};
use chrono::{Duration, NaiveDateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::spawn;
use tokio::task::{JoinError, JoinHandle};

type FetchOutput = (PageRequest, ScraperResult<Page>, Duration);
type FetchHandle = JoinHandle<FetchOutput>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub spider: String,
    pub pages: usize,
    pub meetings: usize,
}

/// Runs spiders: fetch start pages, parse, normalize, hand off.
pub struct Crawler {
    fetcher: Box<dyn Fetcher>,
    config: CrawlConfig,
    stats: Arc<StatsTracker>,
}

impl Crawler {
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        info!("Initializing crawler");
        Self {
            fetcher,
            config: CrawlConfig::default(),
            stats: Arc::new(StatsTracker::new()),
        }
    }

    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stats(&self) -> Arc<StatsTracker> {
        Arc::clone(&self.stats)
    }

    /// Crawls one spider. `now` decides which meetings have passed.
    pub async fn run(
        &self,
        spider: &dyn Spider,
        sink: &dyn MeetingSink,
        now: NaiveDateTime,
    ) -> ScraperResult<CrawlSummary> {
        info!("Starting spider: {} ({})", spider.name(), spider.agency());

        let pages = self.fetch_pages(spider.start_requests(now)).await?;
        let drafts = spider.parse(&pages)?;
        debug!("Spider {} produced {} drafts", spider.name(), drafts.len());

        let normalizer = Normalizer::new(spider.name());
        let mut meetings = 0;
        for result in normalizer.finalize_all(drafts, now) {
            let meeting = match result {
                Ok(meeting) => meeting,
                Err(e) => {
                    warn!("Rejected meeting from {}: {}", spider.name(), e);
                    self.stats.record_rejected_draft();
                    return Err(e.into());
                }
            };

            sink.store(spider.name(), &meeting).await?;
            self.stats.record_meeting(meeting.status);
            meetings += 1;
        }

        info!(
            "Spider {} completed. Pages: {}, meetings: {}",
            spider.name(),
            pages.len(),
            meetings
        );

        Ok(CrawlSummary {
            spider: spider.name().to_string(),
            pages: pages.len(),
            meetings,
        })
    }

    async fn fetch_pages(&self, requests: Vec<PageRequest>) -> ScraperResult<PageSet> {
        let mut fetched = HashMap::new();
        let mut futures: FuturesUnordered<FetchHandle> = FuturesUnordered::new();

        for request in requests.iter().cloned() {
            if futures.len() >= self.config.max_concurrency {
                debug!(
                    "Reached concurrent request limit {}, waiting for slot",
                    self.config.max_concurrency
                );
                if let Some(done) = futures.next().await {
                    self.collect(done, &mut fetched)
                        .inspect_err(|_| abort_all(&futures))?;
                }
            }

            let fetcher = self.fetcher.box_clone();
            let config = self.config.clone();
            futures.push(spawn(async move {
                let started = Utc::now();
                let result = fetcher.fetch(&request, &config).await;
                (request, result, Utc::now() - started)
            }));
        }

        while let Some(done) = futures.next().await {
            self.collect(done, &mut fetched)
                .inspect_err(|_| abort_all(&futures))?;
        }

        // Hand pages over in request order, whatever order they arrived in.
        Ok(requests
            .into_iter()
            .filter_map(|request| fetched.remove(&request).map(|page| (request, page)))
            .collect())
    }

    fn collect(
        &self,
        done: Result<FetchOutput, JoinError>,
        fetched: &mut HashMap<PageRequest, Page>,
    ) -> ScraperResult<()> {
        let (request, result, elapsed) = done?;
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to fetch {}: {}", request.url, e);
                self.stats.record_failed_fetch();
                return Err(e);
            }
        };

        self.stats.record_fetch(page.status, page.body.len(), elapsed);
        if !page.is_success() {
            warn!("Unexpected status {} for {}", page.status, request.url);
            self.stats.record_failed_fetch();
            return Err(ScraperError::HttpStatus {
                url: request.url,
                status: page.status,
            });
        }

        fetched.insert(request, page);
        Ok(())
    }
}

/// Cancels fetches still running when the run gives up early.
fn abort_all(futures: &FuturesUnordered<FetchHandle>) {
    for handle in futures.iter() {
        handle.abort();
    }
}
