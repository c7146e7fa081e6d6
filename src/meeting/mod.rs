pub(crate) mod record;
pub(crate) mod types;

pub use record::{Meeting, MeetingDraft};
pub use types::{Classification, Link, Location, Status};
