use super::util::{element_text, parse_clock_time, regex, selector};
use crate::core::Spider;
use crate::http::{Page, PageSet};
use crate::meeting::{Classification, Link, Location, MeetingDraft};
use crate::{ScraperError, ScraperResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use scraper::Html;
use std::collections::HashMap;
use url::Url;

const AGENDAS_URL: &str = "https://www.iipd.com/calendar/agendas";
const MINUTES_URL: &str = "https://www.iipd.com/about/board-meeting-minutes";
const SCHEDULES_URL: &str = "https://www.iipd.com/calendar/schedules";

pub struct IlPortDistrictSpider {
    agendas_url: Url,
    minutes_url: Url,
    schedules_url: Url,
}

/// Board minutes keyed by meeting date. The first link listed for a date wins.
type MinutesByDate = HashMap<NaiveDate, String>;

/// What the asterisks around a schedule date mean.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DateMarker {
    Regular,
    /// `***`: the meeting starts at the changed time from the footnotes.
    ChangedTime,
    /// `**`: a special meeting.
    Special,
    /// `*`: the meeting moved to the date given as "(<date> - NEW)".
    Moved(Option<String>),
}

impl DateMarker {
    fn of(raw: &str) -> ScraperResult<Self> {
        let marked = |stars: &str| raw.starts_with(stars) || raw.ends_with(stars);
        Ok(if marked("***") {
            DateMarker::ChangedTime
        } else if marked("**") {
            DateMarker::Special
        } else if marked("*") {
            let moved = regex(r"\((.*?)NEW")?
                .captures(raw)
                .map(|caps| caps[1].trim_end_matches([' ', '-']).to_string());
            DateMarker::Moved(moved)
        } else {
            DateMarker::Regular
        })
    }
}

/// One schedule cell after markers are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledDate {
    start: NaiveDateTime,
    special: bool,
}

/// Values read once from the schedules page and shared by every cell.
struct ScheduleContext<'a> {
    year: String,
    changed_time: Option<NaiveTime>,
    agendas: &'a [Link],
    minutes: &'a MinutesByDate,
    source: String,
}

impl IlPortDistrictSpider {
    pub fn new() -> ScraperResult<Self> {
        Ok(Self {
            agendas_url: Url::parse(AGENDAS_URL)?,
            minutes_url: Url::parse(MINUTES_URL)?,
            schedules_url: Url::parse(SCHEDULES_URL)?,
        })
    }

    fn location() -> Location {
        Location::new(
            "Illinois International Port District",
            "3600 E. 95th St. Chicago, IL 60617",
        )
    }

    /// Agenda files, titled "<file name> <Month Year>" with the date taken
    /// from the file link.
    fn parse_agendas(page: &Page) -> ScraperResult<Vec<Link>> {
        let document = Html::parse_document(&page.body);
        let row_sel = selector("tr")?;
        let name_sel = selector("td.views-field.views-field-title")?;
        let file_sel = selector("td a.file-download")?;
        let date_pattern = regex(r"Agenda(.*?)\.pdf")?;

        let mut agendas = Vec::new();
        for row in document.select(&row_sel) {
            let (Some(name), Some(file)) =
                (row.select(&name_sel).next(), row.select(&file_sel).next())
            else {
                continue;
            };
            let Some(href) = file.value().attr("href") else {
                continue;
            };
            let Some(date) = date_pattern.captures(href) else {
                debug!("Skipping file that is not an agenda: {}", href);
                continue;
            };

            let date = date[1].replace("%20", " ");
            let title = format!("{} {}", element_text(name), date.trim());
            agendas.push(Link::new(href, title));
        }

        Ok(agendas)
    }

    fn parse_minutes(page: &Page) -> ScraperResult<MinutesByDate> {
        let document = Html::parse_document(&page.body);
        let row_sel = selector("tr")?;
        let name_sel = selector("td.views-field.views-field-title")?;
        let file_sel = selector("td.views-field.views-field-field-file a")?;
        let date_pattern = regex(r"^(.*?\d{4})")?;

        let mut minutes = MinutesByDate::new();
        for row in document.select(&row_sel) {
            let Some(name) = row.select(&name_sel).next() else {
                continue;
            };
            let name = element_text(name);
            let Some(date_text) = date_pattern.captures(&name) else {
                warn!("Minutes entry without a date: {:?}", name);
                continue;
            };
            let date = NaiveDate::parse_from_str(&date_text[1], "%B %d, %Y").map_err(|e| {
                ScraperError::extraction(format!("unparseable minutes date {:?}: {}", name, e))
            })?;

            if let Some(href) = row
                .select(&file_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
            {
                minutes.entry(date).or_insert_with(|| href.to_string());
            }
        }

        Ok(minutes)
    }

    fn parse_schedules(
        &self,
        page: &Page,
        agendas: &[Link],
        minutes: &MinutesByDate,
    ) -> ScraperResult<Vec<MeetingDraft>> {
        let document = Html::parse_document(&page.body);
        Self::validate_location(&document)?;

        let em_sel = selector("em")?;
        let year: String = document
            .select(&em_sel)
            .next()
            .map(|em| element_text(em).chars().take(4).collect())
            .filter(|year: &String| year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| ScraperError::extraction("schedule year not found"))?;

        let context = ScheduleContext {
            year,
            changed_time: Self::parse_changed_time(&document)?,
            agendas,
            minutes,
            source: page.url.to_string(),
        };

        let row_sel = selector("tr")?;
        let cell_sel = selector("td")?;
        let rows: Vec<_> = document.select(&row_sel).collect();
        let Some((header, rows)) = rows.split_first() else {
            return Err(ScraperError::extraction("schedule table not found"));
        };

        let meeting_types: Vec<String> = header
            .select(&cell_sel)
            .map(|cell| {
                element_text(cell)
                    .trim_matches(|c: char| c == ' ' || c == ':' || c == 's')
                    .to_string()
            })
            .collect();

        // Each row lays out one date per meeting type column.
        rows.iter()
            .flat_map(|row| row.select(&cell_sel).map(element_text).enumerate().collect::<Vec<_>>())
            .filter(|(_, raw)| !raw.is_empty())
            .try_fold(Vec::new(), |mut drafts, (column, raw)| -> ScraperResult<_> {
                let meeting_type = meeting_types.get(column).ok_or_else(|| {
                    ScraperError::extraction(format!("date {:?} has no meeting type", raw))
                })?;
                let scheduled = Self::parse_start(&raw, &context)?;
                drafts.push(Self::build_meeting(meeting_type, scheduled, &context));
                Ok(drafts)
            })
    }

    fn parse_changed_time(document: &Html) -> ScraperResult<Option<NaiveTime>> {
        let p_sel = selector("p")?;
        let time_pattern = regex(r"(?i)\d{1,2}:\d{2}\s*[ap]m")?;
        Ok(document
            .select(&p_sel)
            .map(element_text)
            .find(|text| text.starts_with("***"))
            .and_then(|text| time_pattern.find(&text).map(|m| m.as_str().to_string()))
            .and_then(|time| parse_clock_time(&time)))
    }

    fn parse_start(raw: &str, context: &ScheduleContext<'_>) -> ScraperResult<ScheduledDate> {
        let regular_time = NaiveTime::from_hms_opt(9, 0, 0)
            .ok_or_else(|| ScraperError::extraction("invalid meeting time"))?;

        let marker = DateMarker::of(raw)?;
        let time = match marker {
            DateMarker::ChangedTime => context.changed_time.unwrap_or_else(|| {
                warn!("Date {:?} marks a changed time but none is listed", raw);
                regular_time
            }),
            _ => regular_time,
        };
        let date_text = match &marker {
            DateMarker::Moved(Some(moved)) => moved.as_str(),
            _ => raw,
        };
        let date_text = date_text.trim_matches(|c: char| c == ' ' || c == '*');

        let date = NaiveDate::parse_from_str(
            &format!("{} {}", context.year, date_text),
            "%Y %B %d",
        )
        .map_err(|e| ScraperError::extraction(format!("unparseable date {:?}: {}", raw, e)))?;

        Ok(ScheduledDate {
            start: date.and_time(time),
            special: marker == DateMarker::Special,
        })
    }

    fn parse_classification(meeting_type: &str) -> Classification {
        let meeting_type = meeting_type.to_lowercase();
        if meeting_type.contains("board") {
            Classification::Board
        } else if meeting_type.contains("committee") {
            Classification::Committee
        } else {
            Classification::NotClassified
        }
    }

    fn build_meeting(
        meeting_type: &str,
        scheduled: ScheduledDate,
        context: &ScheduleContext<'_>,
    ) -> MeetingDraft {
        let classification = Self::parse_classification(meeting_type);
        let title = if scheduled.special {
            format!("Special {}", meeting_type)
        } else {
            meeting_type.to_string()
        };

        let mut links = Self::agenda_links(classification, scheduled.start, context.agendas);
        if classification == Classification::Board {
            if let Some(href) = context.minutes.get(&scheduled.start.date()) {
                links.push(Link::new(href.clone(), "Board Meeting Minutes"));
            }
        }

        MeetingDraft::new(title, classification, context.source.clone())
            .with_start(Some(scheduled.start))
            .with_location(Self::location())
            .with_links(links)
    }

    fn agenda_links(
        classification: Classification,
        start: NaiveDateTime,
        agendas: &[Link],
    ) -> Vec<Link> {
        let keyword = match classification {
            Classification::Board => "Board",
            Classification::Committee => "Committee",
            _ => return Vec::new(),
        };
        let month = start.format("%B %Y").to_string();

        agendas
            .iter()
            .filter(|link| link.title.contains(keyword) && link.title.contains(&month))
            .cloned()
            .collect()
    }

    fn validate_location(document: &Html) -> ScraperResult<()> {
        let strong_sel = selector("strong")?;
        let location = document
            .select(&strong_sel)
            .last()
            .map(element_text)
            .unwrap_or_default();
        if location.contains("3600") {
            Ok(())
        } else {
            Err(ScraperError::extraction(format!(
                "meeting location has changed: {:?}",
                location
            )))
        }
    }
}

impl Spider for IlPortDistrictSpider {
    fn name(&self) -> &str {
        "il_port_district"
    }

    fn agency(&self) -> &str {
        "Illinois International Port District"
    }

    fn start_urls(&self) -> Vec<Url> {
        vec![
            self.agendas_url.clone(),
            self.minutes_url.clone(),
            self.schedules_url.clone(),
        ]
    }

    fn parse(&self, pages: &PageSet) -> ScraperResult<Vec<MeetingDraft>> {
        let agendas = Self::parse_agendas(pages.get(&self.agendas_url)?)?;
        let minutes = Self::parse_minutes(pages.get(&self.minutes_url)?)?;
        debug!(
            "Found {} agendas and {} board minutes",
            agendas.len(),
            minutes.len()
        );
        self.parse_schedules(pages.get(&self.schedules_url)?, &agendas, &minutes)
    }
}

#[cfg(test)]
mod tests;
