use crate::meeting::MeetingDraft;

/// Longest title slug kept in an identifier. Titles that only differ past
/// this point share an identifier.
pub const MAX_TITLE_SLUG_LEN: usize = 100;

/// Stands in for the timestamp segment when a meeting has no start.
pub const MISSING_START_SEGMENT: &str = "000000000000";

/// Stands in for the title segment when nothing alphanumeric is left.
pub const EMPTY_TITLE_SEGMENT: &str = "untitled";

/// Reserved for a same-time disambiguator that is never computed.
pub const SEQUENCE_PLACEHOLDER: &str = "x";

/// Builds `<agency>/<YYYYMMDDHHMM>/x/<title_slug>` for a meeting.
pub fn derive_identifier(agency_slug: &str, draft: &MeetingDraft) -> String {
    let start = draft
        .start
        .map(|start| start.format("%Y%m%d%H%M").to_string())
        .unwrap_or_else(|| MISSING_START_SEGMENT.to_string());

    let mut title = slugify_title(&draft.title);
    if title.is_empty() {
        title = EMPTY_TITLE_SEGMENT.to_string();
    }

    [agency_slug, &start, SEQUENCE_PLACEHOLDER, &title].join("/")
}

/// Lowercases, collapses every non-alphanumeric run into one `_`, trims
/// underscores at both ends and truncates to [`MAX_TITLE_SLUG_LEN`].
pub fn slugify_title(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    // Only ASCII is pushed, so byte truncation is on a char boundary.
    slug.truncate(MAX_TITLE_SLUG_LEN);
    slug.trim_end_matches('_').to_string()
}
