use crate::{ScraperError, ScraperResult};
use chrono::NaiveTime;
use regex::Regex;
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> ScraperResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::extraction(format!("bad selector {:?}: {}", css, e)))
}

pub(crate) fn regex(pattern: &str) -> ScraperResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| ScraperError::extraction(format!("bad pattern {:?}: {}", pattern, e)))
}

/// All descendant text of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses clock times such as "10:30am", "2:30 pm" or "1:30 p.m.".
pub(crate) fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_lowercase();
    NaiveTime::parse_from_str(&normalized, "%I:%M%p").ok()
}
