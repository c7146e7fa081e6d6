use super::util::{element_text, parse_clock_time, regex, selector};
use crate::core::Spider;
use crate::http::{Page, PageSet};
use crate::meeting::{Classification, Link, Location, MeetingDraft};
use crate::normalizer::mentions_cancellation;
use crate::{ScraperError, ScraperResult};
use chrono::{NaiveDate, NaiveTime};
use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

const START_URL: &str = "https://www.lakeviewchamber.com/ssa27";
const LOCATION_MARKER: &str = "meetings are held at";

fn is_location_note(text: &str) -> bool {
    text.to_lowercase().contains(LOCATION_MARKER)
}

pub struct ChiSsa27Spider {
    start_url: Url,
}

/// Matches "January 15, 2019" with an optional "10:00 am" after it.
struct DatePattern {
    date: Regex,
}

impl DatePattern {
    fn new() -> ScraperResult<Self> {
        Ok(Self {
            date: regex(
                r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})(?:\s+(\d{1,2}:\d{2}\s*[ap]\.?m\.?))?",
            )?,
        })
    }

    fn find(&self, text: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
        self.date.captures_iter(text).find_map(|caps| {
            let raw = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
            let date = NaiveDate::parse_from_str(&raw, "%B %d %Y").ok()?;
            let time = caps.get(4).and_then(|t| parse_clock_time(t.as_str()));
            Some((date, time))
        })
    }
}

impl ChiSsa27Spider {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            start_url: Url::parse(START_URL)?,
        })
    }

    fn parse_page(&self, page: &Page) -> ScraperResult<Vec<MeetingDraft>> {
        let document = Html::parse_document(&page.body);
        let content_sel = selector("#content-232764")?;
        let paragraph_sel = selector("p")?;

        let content = document
            .select(&content_sel)
            .next()
            .ok_or_else(|| ScraperError::extraction("meeting content block not found"))?;

        // Meetings live in the second block of the content's first child.
        let block = content
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "div")
            .and_then(|wrapper| {
                wrapper
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "div")
                    .nth(1)
            })
            .ok_or_else(|| ScraperError::extraction("meeting list block not found"))?;

        let paragraphs: Vec<ElementRef<'_>> = block.select(&paragraph_sel).collect();

        let location_text = paragraphs
            .iter()
            .map(|p| element_text(*p))
            .find(|text| is_location_note(text))
            .ok_or_else(|| ScraperError::extraction("meeting location paragraph not found"))?;
        let location = Self::parse_location(&location_text)?;
        let default_time = Self::parse_default_time(&location_text)?;

        let dates = DatePattern::new()?;
        let mut drafts = Vec::new();
        for paragraph in paragraphs {
            let text = element_text(paragraph);
            if is_location_note(&text) {
                continue;
            }

            let found = dates.find(&text);
            let is_annual = text.contains("Annual Meeting");
            if found.is_none() && !is_annual {
                debug!("Skipping paragraph without a meeting: {:?}", text);
                continue;
            }

            let start = found
                .map(|(date, time)| date.and_time(time.or(default_time).unwrap_or_default()));
            let title = Self::parse_title(&text);
            drafts.push(
                MeetingDraft::new(title, Classification::Commission, page.url.to_string())
                    .with_start(start)
                    .with_location(location.clone())
                    .with_links(Self::parse_links(paragraph, &page.url)?)
                    .with_time_notes(Self::time_notes(found, default_time))
                    .with_cancelled(mentions_cancellation(&text)),
            );
        }

        debug!("Found {} meetings on {}", drafts.len(), page.url);
        Ok(drafts)
    }

    fn parse_title(text: &str) -> &'static str {
        if text.contains("Annual Meeting") {
            "Annual Meeting"
        } else {
            "Commission"
        }
    }

    fn parse_location(text: &str) -> ScraperResult<Location> {
        if text.contains("Sheil Park") {
            Ok(Location::new(
                "Sheil Park",
                "3505 N. Southport Ave., Chicago, IL 60657",
            ))
        } else {
            Err(ScraperError::extraction(format!(
                "meeting location has changed: {:?}",
                text
            )))
        }
    }

    fn parse_default_time(text: &str) -> ScraperResult<Option<NaiveTime>> {
        let time = regex(r"(?i)\d{1,2}:\d{2}\s*[ap]\.?m\.?")?;
        Ok(time
            .find(text)
            .and_then(|m| parse_clock_time(m.as_str())))
    }

    fn time_notes(
        found: Option<(NaiveDate, Option<NaiveTime>)>,
        default_time: Option<NaiveTime>,
    ) -> &'static str {
        match found {
            Some((_, None)) if default_time.is_none() => "Confirm meeting time with the agency",
            _ => "",
        }
    }

    fn parse_links(paragraph: ElementRef<'_>, page_url: &Url) -> ScraperResult<Vec<Link>> {
        let link_sel = selector("a[href]")?;
        let mut links = Vec::new();
        for anchor in paragraph.select(&link_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            match page_url.join(href) {
                Ok(url) => links.push(Link::new(url.to_string(), "Minutes")),
                Err(e) => warn!("Skipping bad link {:?}: {}", href, e),
            }
        }
        Ok(links)
    }
}

impl Spider for ChiSsa27Spider {
    fn name(&self) -> &str {
        "chi_ssa_27"
    }

    fn agency(&self) -> &str {
        "Chicago Special Service Area #27 Lakeview West"
    }

    fn start_urls(&self) -> Vec<Url> {
        vec![self.start_url.clone()]
    }

    fn parse(&self, pages: &PageSet) -> ScraperResult<Vec<MeetingDraft>> {
        self.parse_page(pages.get(&self.start_url)?)
    }
}
