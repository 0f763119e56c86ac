use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::optional_datetime;

/// Course fields shared by the enrolled-courses, recent-courses, and search
/// endpoints. Fields beyond the common core vary per endpoint, so everything
/// except identity is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCourse {
    pub id: i64,
    pub fullname: String,
    pub shortname: String,
    #[serde(default)]
    pub viewurl: Option<String>,
    #[serde(default)]
    pub startdate: Option<i64>,
    #[serde(default)]
    pub enddate: Option<i64>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub isfavourite: Option<bool>,
    #[serde(default)]
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: i64,
    pub fullname: String,
    pub shortname: String,
    pub url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub progress: Option<f64>,
    pub favourite: bool,
    pub hidden: bool,
}

impl From<RawCourse> for Course {
    fn from(raw: RawCourse) -> Self {
        Self {
            id: raw.id,
            fullname: raw.fullname,
            shortname: raw.shortname,
            url: raw.viewurl,
            start_date: optional_datetime(raw.startdate),
            end_date: optional_datetime(raw.enddate),
            progress: raw.progress,
            favourite: raw.isfavourite.unwrap_or(false),
            hidden: raw.hidden.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_course_from_timeline_payload() {
        let raw: RawCourse = serde_json::from_value(json!({
            "id": 42,
            "fullname": "Linear Algebra",
            "shortname": "MATH201",
            "viewurl": "https://moodle.example/course/view.php?id=42",
            "startdate": 1_700_000_000,
            "enddate": 0,
            "progress": 62.5,
            "isfavourite": true,
            "hidden": false
        }))
        .unwrap();

        let course = Course::from(raw);
        assert_eq!(course.id, 42);
        assert_eq!(course.shortname, "MATH201");
        assert!(course.start_date.is_some());
        assert_eq!(course.end_date, None);
        assert!(course.favourite);
    }

    #[test]
    fn test_course_from_minimal_payload() {
        let raw: RawCourse = serde_json::from_value(json!({
            "id": 7,
            "fullname": "Intro",
            "shortname": "INTRO"
        }))
        .unwrap();

        let course = Course::from(raw);
        assert_eq!(course.url, None);
        assert!(!course.favourite);
        assert!(!course.hidden);
    }
}
