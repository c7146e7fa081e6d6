mod identifier;
mod status;

pub use identifier::{
    derive_identifier, slugify_title, EMPTY_TITLE_SEGMENT, MAX_TITLE_SLUG_LEN,
    MISSING_START_SEGMENT, SEQUENCE_PLACEHOLDER,
};
pub use status::{derive_status, mentions_cancellation};

use crate::meeting::{Classification, Meeting, MeetingDraft};
use chrono::NaiveDateTime;
use log::trace;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Turns drafts from one agency into finalized meetings.
///
/// Holds nothing but the agency slug, so one instance can be shared freely
/// between threads.
#[derive(Debug, Clone)]
pub struct Normalizer {
    agency_slug: String,
}

impl Normalizer {
    pub fn new(agency_slug: impl Into<String>) -> Self {
        Self {
            agency_slug: agency_slug.into(),
        }
    }

    pub fn agency_slug(&self) -> &str {
        &self.agency_slug
    }

    pub fn finalize(
        &self,
        draft: MeetingDraft,
        now: NaiveDateTime,
    ) -> Result<Meeting, NormalizeError> {
        let classification: Classification = draft.classification.parse()?;
        let status = derive_status(&draft, now);
        let id = derive_identifier(&self.agency_slug, &draft);
        trace!("Finalized meeting {} ({})", id, status);

        Ok(Meeting {
            id,
            title: draft.title,
            description: draft.description,
            classification,
            start: draft.start,
            end: draft.end,
            all_day: draft.all_day,
            time_notes: draft.time_notes,
            location: draft.location,
            links: draft.links,
            source: draft.source,
            status,
        })
    }

    /// Lazily finalizes each draft as the returned iterator is pulled.
    pub fn finalize_all<'a, I>(
        &'a self,
        drafts: I,
        now: NaiveDateTime,
    ) -> impl Iterator<Item = Result<Meeting, NormalizeError>> + 'a
    where
        I: IntoIterator<Item = MeetingDraft>,
        I::IntoIter: 'a,
    {
        drafts
            .into_iter()
            .map(move |draft| self.finalize(draft, now))
    }
}
