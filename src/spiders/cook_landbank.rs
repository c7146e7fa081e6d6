use super::util::{element_text, regex, selector};
use crate::core::Spider;
use crate::http::{PageRequest, PageSet};
use crate::meeting::{Classification, Link, Location, MeetingDraft};
use crate::{ScraperError, ScraperResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

const AJAX_URL: &str = "http://www.cookcountylandbank.org/wp-admin/admin-ajax.php";
const DEFAULT_ADDRESS: &str = "69 W Washington St Chicago, IL 60602";

/// Days polled on each side of today.
const TIME_HORIZON_DAYS: i64 = 45;

/// Event types the calendar shows for public meetings.
const EVENT_TYPES: &str = "9, 16, 17, 18, 19, 20, 26, 27";

pub struct CookLandbankSpider {
    ajax_url: Url,
}

/// Body of the calendar's AJAX reply. Only the rendered event list is used.
#[derive(Debug, Deserialize)]
struct CalendarReply {
    content: String,
}

/// Selectors and patterns used on every event, built once per parse.
struct EventSelectors {
    event: Selector,
    title: Selector,
    start: Selector,
    source: Selector,
    street: Selector,
    location_detail: Selector,
    description: Selector,
    description_link: Selector,
    board: Regex,
    agenda: Regex,
}

impl EventSelectors {
    fn new() -> ScraperResult<Self> {
        Ok(Self {
            event: selector("div.eventon_list_event[data-event_id]")?,
            title: selector("span.evcal_event_title")?,
            start: selector("[itemprop='startDate']")?,
            source: selector("div.evo_event_schema a[itemprop='url']")?,
            street: selector("[itemprop='streetAddress']")?,
            location_detail: selector("span.evcal_desc.evo_info")?,
            description: selector("[itemprop='description']")?,
            description_link: selector("[itemprop='description'] a[href]")?,
            board: regex(r"(?i)board of directors")?,
            agenda: regex(r"(?i)agenda")?,
        })
    }
}

impl CookLandbankSpider {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            ajax_url: Url::parse(AJAX_URL)?,
        })
    }

    /// Form the calendar widget posts to load the events around one day.
    fn calendar_form(date: NaiveDate) -> Vec<(&'static str, String)> {
        let fixed = [
            ("action", "the_ajax_hook"),
            ("event_count", "0"),
            ("filters[0][filter_type]", "tax"),
            ("filters[0][filter_name]", "event_type"),
            ("filters[0][filter_val]", EVENT_TYPES),
            ("direction", "none"),
            ("shortcode[hide_past]", "no"),
            ("shortcode[show_et_ft_img]", "no"),
            ("shortcode[event_order]", "DESC"),
            ("shortcode[ft_event_priority]", "no"),
            ("shortcode[lang]", "L1"),
            ("shortcode[month_incre]", "0"),
            ("shortcode[evc_open]", "no"),
            ("shortcode[show_limit]", "no"),
            ("shortcode[etc_override]", "no"),
            ("shortcode[tiles]", "no"),
            ("shortcode[tile_height]", "0"),
            ("shortcode[tile_bg]", "0"),
            ("shortcode[tile_count]", "2"),
        ];

        let mut form = vec![
            ("current_month", date.format("%-m").to_string()),
            ("current_year", date.format("%Y").to_string()),
            ("fc_focus_day", date.format("%-d").to_string()),
        ];
        form.extend(fixed.iter().map(|(k, v)| (*k, v.to_string())));
        form
    }

    fn parse_event(
        &self,
        event: ElementRef<'_>,
        sel: &EventSelectors,
    ) -> ScraperResult<Option<MeetingDraft>> {
        let title = event
            .select(&sel.title)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let Some(start) = Self::parse_start(event, sel)? else {
            warn!("Skipping event without a start: {:?}", title);
            return Ok(None);
        };

        let classification = if sel.board.is_match(&title) {
            Classification::Board
        } else {
            Classification::Committee
        };

        let source = event
            .select(&sel.source)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or(AJAX_URL)
            .to_string();

        // The end date is published but its time is not reliable, so no end
        // is recorded.
        Ok(Some(
            MeetingDraft::new(title, classification, source)
                .with_start(Some(start))
                .with_description(Self::parse_description(event, sel))
                .with_location(Self::parse_location(event, sel))
                .with_links(self.parse_links(event, sel)),
        ))
    }

    fn parse_start(
        event: ElementRef<'_>,
        sel: &EventSelectors,
    ) -> ScraperResult<Option<NaiveDateTime>> {
        let Some(raw) = event
            .select(&sel.start)
            .next()
            .and_then(|time| time.value().attr("content"))
        else {
            return Ok(None);
        };

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .map(Some)
            .map_err(|e| ScraperError::extraction(format!("unparseable start {:?}: {}", raw, e)))
    }

    /// Description text up to the first mention of the agenda.
    fn parse_description(event: ElementRef<'_>, sel: &EventSelectors) -> String {
        let text = event
            .select(&sel.description)
            .next()
            .map(element_text)
            .unwrap_or_default();

        match sel.agenda.find(&text) {
            Some(m) => text[..m.start()].trim().to_string(),
            None => text.trim().to_string(),
        }
    }

    fn parse_location(event: ElementRef<'_>, sel: &EventSelectors) -> Location {
        let detail = event
            .select(&sel.location_detail)
            .next()
            .and_then(|span| span.value().attr("data-location_name"))
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let street = event
            .select(&sel.street)
            .next()
            .map(element_text)
            .filter(|street| !street.is_empty());

        let mut address = [detail.map(str::to_string), street]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        if address.is_empty() {
            return Location::new("", DEFAULT_ADDRESS);
        }
        if !address.contains("Chicago") {
            address.push_str(" Chicago, IL");
        }
        Location::new("", address)
    }

    fn parse_links(&self, event: ElementRef<'_>, sel: &EventSelectors) -> Vec<Link> {
        event
            .select(&sel.description_link)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let href = match self.ajax_url.join(href) {
                    Ok(url) => url.to_string(),
                    Err(e) => {
                        warn!("Skipping bad link {:?}: {}", href, e);
                        return None;
                    }
                };
                let title = if href.to_lowercase().contains("agenda") {
                    "Agenda".to_string()
                } else {
                    element_text(anchor)
                };
                Some(Link::new(href, title))
            })
            .collect()
    }
}

impl Spider for CookLandbankSpider {
    fn name(&self) -> &str {
        "cook_landbank"
    }

    fn agency(&self) -> &str {
        "Cook County Land Bank Authority"
    }

    fn start_urls(&self) -> Vec<Url> {
        vec![self.ajax_url.clone()]
    }

    /// One calendar POST per day from 45 days before `now` up to 44 days
    /// after it.
    fn start_requests(&self, now: NaiveDateTime) -> Vec<PageRequest> {
        let first = now.date() - Duration::days(TIME_HORIZON_DAYS);
        (0..TIME_HORIZON_DAYS * 2)
            .map(|offset| first + Duration::days(offset))
            .map(|date| PageRequest::post_form(self.ajax_url.clone(), Self::calendar_form(date)))
            .collect()
    }

    /// Neighbouring days list the same events, so each event id is kept once,
    /// from the earliest day that lists it.
    fn parse(&self, pages: &PageSet) -> ScraperResult<Vec<MeetingDraft>> {
        let sel = EventSelectors::new()?;
        let mut seen = HashSet::new();
        let mut drafts = Vec::new();

        for (request, page) in pages.responses() {
            if request.url != self.ajax_url {
                continue;
            }
            let reply: CalendarReply = serde_json::from_str(&page.body)?;
            let fragment = Html::parse_fragment(&reply.content);

            for event in fragment.select(&sel.event) {
                let Some(id) = event.value().attr("data-event_id") else {
                    continue;
                };
                if !seen.insert(id.to_string()) {
                    continue;
                }
                if let Some(draft) = self.parse_event(event, &sel)? {
                    drafts.push(draft);
                }
            }
        }

        debug!("Found {} events in {} calendar pages", drafts.len(), pages.len());
        Ok(drafts)
    }
}
