use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{datetime_from_epoch, Course, RawCourse};
use crate::error::Result;

/// How a calendar event names itself.
///
/// Module events (assignments, quizzes) carry the bare activity name next to
/// a decorated event name such as "Essay 1 is due"; site and user events
/// only have the event name. The two shapes are told apart by the presence
/// of `activityname`, decided once at decode time.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EventTitle {
    Activity { activityname: String, name: String },
    Plain { name: String },
}

impl EventTitle {
    /// The short title shown to users: the activity name when there is one.
    pub fn display(&self) -> &str {
        match self {
            EventTitle::Activity { activityname, .. } => activityname,
            EventTitle::Plain { name } => name,
        }
    }

    /// The full event name as the calendar renders it.
    pub fn event_name(&self) -> &str {
        match self {
            EventTitle::Activity { name, .. } => name,
            EventTitle::Plain { name } => name,
        }
    }
}

/// Calendar event fields common to the timesort, course, monthly, and day
/// views.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCalendarEvent {
    pub id: i64,
    #[serde(flatten)]
    pub title: EventTitle,
    #[serde(default)]
    pub description: Option<String>,
    pub timestart: i64,
    #[serde(default)]
    pub overdue: bool,
    #[serde(default)]
    pub course: Option<RawCourse>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub overdue: bool,
    pub course: Option<Course>,
    pub url: Option<String>,
    /// The event exactly as the server sent it.
    pub raw: Value,
}

impl Assignment {
    pub(crate) fn from_value(value: Value) -> Result<Self> {
        let raw: RawCalendarEvent = serde_json::from_value(value.clone())?;
        Ok(Self {
            id: raw.id,
            name: raw.title.display().to_string(),
            description: raw.description,
            due_date: datetime_from_epoch(raw.timestart),
            overdue: raw.overdue,
            course: raw.course.map(Course::from),
            url: raw.url,
            raw: value,
        })
    }
}
