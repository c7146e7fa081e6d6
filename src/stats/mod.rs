use crate::meeting::Status;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapingStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub pages_fetched: usize,
    pub failed_fetches: usize,
    pub bytes_downloaded: usize,
    pub status_codes: HashMap<u16, usize>,
    pub meetings_emitted: usize,
    pub meeting_statuses: HashMap<Status, usize>,
    pub rejected_drafts: usize,
    pub average_fetch_time: f64, // in milliseconds
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<ScrapingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(ScrapingStats {
                start_time: Utc::now(),
                end_time: None,
                pages_fetched: 0,
                failed_fetches: 0,
                bytes_downloaded: 0,
                status_codes: HashMap::new(),
                meetings_emitted: 0,
                meeting_statuses: HashMap::new(),
                rejected_drafts: 0,
                average_fetch_time: 0.0,
            })),
        }
    }

    pub fn record_fetch(&self, status: u16, size: usize, duration: Duration) {
        let mut stats = self.stats.write();
        stats.pages_fetched += 1;
        *stats.status_codes.entry(status).or_insert(0) += 1;
        stats.bytes_downloaded += size;

        let current_total = stats.average_fetch_time * (stats.pages_fetched - 1) as f64;
        let new_duration = duration.num_milliseconds() as f64;
        stats.average_fetch_time = (current_total + new_duration) / stats.pages_fetched as f64;
    }

    pub fn record_failed_fetch(&self) {
        self.stats.write().failed_fetches += 1;
    }

    pub fn record_meeting(&self, status: Status) {
        let mut stats = self.stats.write();
        stats.meetings_emitted += 1;
        *stats.meeting_statuses.entry(status).or_insert(0) += 1;
    }

    pub fn record_rejected_draft(&self) {
        self.stats.write().rejected_drafts += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> ScrapingStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        println!("\nScraping Statistics:");
        println!("===================");
        println!("Duration: {} seconds", duration.num_seconds());
        println!("Pages Fetched: {}", stats.pages_fetched);
        println!("Failed Fetches: {}", stats.failed_fetches);
        println!(
            "Data Downloaded: {:.2} MB",
            stats.bytes_downloaded as f64 / 1_000_000.0
        );
        println!("Average Fetch Time: {:.2}ms", stats.average_fetch_time);
        println!("Meetings Emitted: {}", stats.meetings_emitted);
        println!("Rejected Drafts: {}", stats.rejected_drafts);

        if !stats.meeting_statuses.is_empty() {
            println!("\nMeeting Statuses:");
            for (status, count) in &stats.meeting_statuses {
                println!("  {}: {}", status, count);
            }
        }

        println!("\nStatus Codes:");
        for (code, count) in &stats.status_codes {
            println!("  {}: {}", code, count);
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
