use super::types::{Classification, Link, Location, Status};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A finalized meeting, ready to hand off downstream.
///
/// Built only by [`crate::Normalizer`]; `id` and `status` are derived from the
/// other fields and are never set on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: String,
    pub classification: Classification,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub time_notes: String,
    pub location: Location,
    pub links: Vec<Link>,
    pub source: String,
    pub status: Status,
}

/// Raw values a spider extracted for one meeting occurrence.
///
/// `classification` is kept as the label the extractor produced so that an
/// unknown label is rejected at finalization instead of being coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDraft {
    pub title: String,
    pub description: String,
    pub classification: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub time_notes: String,
    pub location: Location,
    pub links: Vec<Link>,
    pub source: String,
    pub cancelled: bool,
    pub confirmed: bool,
    /// Text seen next to the meeting on the page, e.g. "CANCELLED".
    pub status_text: String,
}

impl MeetingDraft {
    pub fn new(
        title: impl Into<String>,
        classification: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            classification: classification.into(),
            start: None,
            end: None,
            all_day: false,
            time_notes: String::new(),
            location: Location::default(),
            links: Vec::new(),
            source: source.into(),
            cancelled: false,
            confirmed: false,
            status_text: String::new(),
        }
    }

    pub fn with_start(mut self, start: Option<NaiveDateTime>) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: Option<NaiveDateTime>) -> Self {
        self.end = end;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_time_notes(mut self, notes: impl Into<String>) -> Self {
        self.time_notes = notes.into();
        self
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    pub fn with_cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn with_confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_defaults() {
        let draft = MeetingDraft::new("Board Meeting", Classification::Board, "https://example.com");
        assert_eq!(draft.classification, "Board");
        assert!(draft.links.is_empty());
        assert!(!draft.all_day);
        assert!(!draft.cancelled);
        assert_eq!(draft.location, Location::default());
    }

    #[test]
    fn test_meeting_serializes_empty_links_as_array() {
        let meeting = Meeting {
            id: "agency/000000000000/x/untitled".to_string(),
            title: String::new(),
            description: String::new(),
            classification: Classification::Forum,
            start: None,
            end: None,
            all_day: false,
            time_notes: String::new(),
            location: Location::default(),
            links: vec![],
            source: "https://example.com".to_string(),
            status: Status::Tentative,
        };

        let value = serde_json::to_value(&meeting).unwrap();
        assert_eq!(value["links"], json!([]));
        assert_eq!(value["location"], json!({"name": "", "address": ""}));
        assert_eq!(value["end"], json!(null));

        let back: Meeting = serde_json::from_value(value).unwrap();
        assert_eq!(back.links, Vec::<Link>::new());
    }
}
