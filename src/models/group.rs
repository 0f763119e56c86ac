use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::optional_datetime;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct RawGroup {
    pub id: i64,
    pub courseid: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enrolmentkey: Option<String>,
    #[serde(default)]
    pub idnumber: Option<String>,
    #[serde(default)]
    pub timecreated: Option<i64>,
    #[serde(default)]
    pub timemodified: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub enrolment_key: Option<String>,
    pub id_number: Option<String>,
    pub time_created: Option<DateTime<Utc>>,
    pub time_modified: Option<DateTime<Utc>>,
    /// The group record exactly as the server sent it.
    pub raw: Value,
}

impl Group {
    pub(crate) fn from_value(value: Value) -> Result<Self> {
        let raw: RawGroup = serde_json::from_value(value.clone())?;
        Ok(Self {
            id: raw.id,
            course_id: raw.courseid,
            name: raw.name,
            description: raw.description,
            enrolment_key: raw.enrolmentkey,
            id_number: raw.idnumber,
            time_created: optional_datetime(raw.timecreated),
            time_modified: optional_datetime(raw.timemodified),
            raw: value,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_group_decodes() {
        let group = Group::from_value(json!({
            "id": 3,
            "courseid": 42,
            "name": "Lab group A",
            "description": "Tuesday lab slot",
            "timecreated": 1_650_000_000,
            "timemodified": 0
        }))
        .unwrap();

        assert_eq!(group.course_id, 42);
        assert_eq!(group.name, "Lab group A");
        assert!(group.time_created.is_some());
        assert_eq!(group.time_modified, None);
    }
}
