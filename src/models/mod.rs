//! Typed domain model and the raw wire shapes it is decoded from.
//!
//! All raw JSON is decoded exactly once, at the facade boundary. The wire
//! uses epoch seconds for every timestamp and `0` for "not set"; both
//! conventions are normalized here.

mod assignment;
mod course;
mod group;
mod user;

pub use assignment::{Assignment, EventTitle, RawCalendarEvent};
pub use course::{Course, RawCourse};
pub use group::{Group, RawGroup};
pub use user::{RawUser, User, UserPreference};

use chrono::{DateTime, Utc};

pub(crate) fn datetime_from_epoch(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// `0` means "never" on the wire and maps to `None`.
pub(crate) fn optional_datetime(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.filter(|secs| *secs != 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
