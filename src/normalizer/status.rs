use crate::meeting::{MeetingDraft, Status};
use chrono::NaiveDateTime;

/// Words that mark a meeting as cancelled when they show up in its text.
const CANCELLATION_MARKERS: [&str; 3] = ["cancel", "rescheduled", "postpone"];

/// Lifecycle status of a meeting relative to `now`.
///
/// Cancellation wins over everything else. A start exactly at `now` counts as
/// passed. Without a start there is nothing proving the meeting happened, so
/// it stays tentative.
pub fn derive_status(draft: &MeetingDraft, now: NaiveDateTime) -> Status {
    if is_cancelled(draft) {
        return Status::Cancelled;
    }

    match draft.start {
        Some(start) if start > now => {
            if draft.confirmed {
                Status::Confirmed
            } else {
                Status::Tentative
            }
        }
        Some(_) => Status::Passed,
        None => Status::Tentative,
    }
}

fn is_cancelled(draft: &MeetingDraft) -> bool {
    if draft.cancelled {
        return true;
    }

    [&draft.title, &draft.description, &draft.status_text]
        .iter()
        .any(|text| mentions_cancellation(text))
}

/// True when the text carries one of the cancellation markers, ignoring case.
pub fn mentions_cancellation(text: &str) -> bool {
    let text = text.to_lowercase();
    CANCELLATION_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}
