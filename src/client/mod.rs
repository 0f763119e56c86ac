//! High-level typed client.
//!
//! Thin mapping layer over the AJAX dispatcher: one method per remote
//! procedure, raw payloads decoded into the domain model at this boundary
//! and nowhere else. A client is single-writer state (cookie jar plus
//! session key), which the `&mut self` receivers make explicit; share
//! nothing, or wrap the whole client in your own lock.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ajax;
use crate::auth;
use crate::error::{MoodleError, Result};
use crate::http::Transport;
use crate::models::{Assignment, Course, Group, RawCourse, User, UserPreference};
use crate::session::Session;

/// Calendar views without a course filter are scoped to the site course.
const SITE_COURSE_ID: i64 = 1;

const DEFAULT_ASSIGNMENT_LIMIT: u32 = 50;

pub struct MoodleClient {
    transport: Transport,
    session: Option<Session>,
}

/// Time window and size for assignment queries. Unset fields default to
/// now, one year ahead, and 50 events.
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

/// Enrolment timeline buckets understood by the courses endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseClassification {
    All,
    InProgress,
    Past,
    Future,
}

impl CourseClassification {
    fn as_str(self) -> &'static str {
        match self {
            CourseClassification::All => "all",
            CourseClassification::InProgress => "inprogress",
            CourseClassification::Past => "past",
            CourseClassification::Future => "future",
        }
    }
}

impl MoodleClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(base_url)?,
            session: None,
        })
    }

    /// Runs the login handshake and stores the resulting session. Safe to
    /// call again to re-authenticate from scratch.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let session = auth::login(&mut self.transport, username, password).await?;
        self.session = Some(session);
        tracing::info!("login successful, session is ready");
        Ok(())
    }

    /// Current session key, if logged in. Mostly useful for diagnostics.
    pub fn sesskey(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.sesskey())
    }

    async fn call(&mut self, methodname: &str, args: Value) -> Result<Value> {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return Err(MoodleError::NotAuthenticated),
        };
        ajax::call(&mut self.transport, session, methodname, args).await
    }

    // === Courses ===

    pub async fn courses(&mut self, classification: CourseClassification) -> Result<Vec<Course>> {
        let args = json!({
            "classification": classification.as_str(),
            "limit": 0,
            "offset": 0,
            "sort": "fullname",
        });
        let data = self
            .call("core_course_get_enrolled_courses_by_timeline_classification", args)
            .await?;
        let payload: CoursesPayload = serde_json::from_value(data)?;
        Ok(payload.courses.into_iter().map(Course::from).collect())
    }

    pub async fn all_courses(&mut self) -> Result<Vec<Course>> {
        self.courses(CourseClassification::All).await
    }

    pub async fn in_progress_courses(&mut self) -> Result<Vec<Course>> {
        self.courses(CourseClassification::InProgress).await
    }

    pub async fn past_courses(&mut self) -> Result<Vec<Course>> {
        self.courses(CourseClassification::Past).await
    }

    pub async fn future_courses(&mut self) -> Result<Vec<Course>> {
        self.courses(CourseClassification::Future).await
    }

    pub async fn recent_courses(&mut self, limit: u32) -> Result<Vec<Course>> {
        let data = self
            .call("core_course_get_recent_courses", json!({ "limit": limit }))
            .await?;
        let raw: Vec<RawCourse> = serde_json::from_value(data)?;
        Ok(raw.into_iter().map(Course::from).collect())
    }

    /// Looks the course up within the caller's enrolled set; `None` when not
    /// enrolled.
    pub async fn course(&mut self, id: i64) -> Result<Option<Course>> {
        Ok(self
            .all_courses()
            .await?
            .into_iter()
            .find(|course| course.id == id))
    }

    pub async fn search_courses(&mut self, term: &str) -> Result<Vec<Course>> {
        let args = json!({
            "criterianame": "search",
            "criteriavalue": term,
            "page": 0,
            "perpage": 20,
        });
        let data = self.call("core_course_search_courses", args).await?;
        let payload: CoursesPayload = serde_json::from_value(data)?;
        Ok(payload.courses.into_iter().map(Course::from).collect())
    }

    // === Assignments / calendar ===

    pub async fn assignments(&mut self, query: AssignmentQuery) -> Result<Vec<Assignment>> {
        let now = Utc::now();
        let from = query.from.unwrap_or(now);
        let to = query.to.unwrap_or(now + Duration::days(365));
        let limit = query.limit.unwrap_or(DEFAULT_ASSIGNMENT_LIMIT);
        let args = json!({
            "limitnum": limit,
            "timesortfrom": from.timestamp(),
            "timesortto": to.timestamp(),
            "limittononsuspendedevents": true,
        });
        let data = self
            .call("core_calendar_get_action_events_by_timesort", args)
            .await?;
        events_from(data)
    }

    pub async fn all_assignments(&mut self) -> Result<Vec<Assignment>> {
        self.assignments(AssignmentQuery::default()).await
    }

    pub async fn today_assignments(&mut self) -> Result<Vec<Assignment>> {
        let start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        self.assignments(AssignmentQuery {
            from: Some(start),
            to: Some(start + Duration::days(1)),
            limit: None,
        })
        .await
    }

    /// The server's overdue flag is only meaningful for past events, so this
    /// fetches the past year and filters on it.
    pub async fn overdue_assignments(&mut self) -> Result<Vec<Assignment>> {
        let now = Utc::now();
        let past_year = self
            .assignments(AssignmentQuery {
                from: Some(now - Duration::days(365)),
                to: Some(now),
                limit: None,
            })
            .await?;
        Ok(past_year
            .into_iter()
            .filter(|assignment| assignment.overdue)
            .collect())
    }

    pub async fn course_assignments(&mut self, course_id: i64) -> Result<Vec<Assignment>> {
        let args = json!({
            "courseid": course_id,
            "limitnum": DEFAULT_ASSIGNMENT_LIMIT,
        });
        let data = self
            .call("core_calendar_get_action_events_by_course", args)
            .await?;
        events_from(data)
    }

    pub async fn monthly_assignments(
        &mut self,
        year: i32,
        month: u32,
        course_id: Option<i64>,
    ) -> Result<Vec<Assignment>> {
        let args = json!({
            "year": year,
            "month": month,
            "courseid": course_id.unwrap_or(SITE_COURSE_ID),
            "categoryid": 0,
            "includenavigation": false,
            "mini": true,
        });
        let data = self
            .call("core_calendar_get_calendar_monthly_view", args)
            .await?;
        let payload: MonthlyViewPayload = serde_json::from_value(data)?;
        payload
            .weeks
            .into_iter()
            .flat_map(|week| week.days)
            .flat_map(|day| day.events)
            .map(Assignment::from_value)
            .collect()
    }

    pub async fn daily_assignments(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        course_id: Option<i64>,
    ) -> Result<Vec<Assignment>> {
        let args = json!({
            "year": year,
            "month": month,
            "day": day,
            "courseid": course_id.unwrap_or(SITE_COURSE_ID),
            "categoryid": 0,
        });
        let data = self
            .call("core_calendar_get_calendar_day_view", args)
            .await?;
        events_from(data)
    }

    pub async fn assignment_by_id(&mut self, event_id: i64) -> Result<Assignment> {
        let data = self
            .call(
                "core_calendar_get_calendar_event_by_id",
                json!({ "eventid": event_id }),
            )
            .await?;
        let payload: EventPayload = serde_json::from_value(data)?;
        Assignment::from_value(payload.event)
    }

    // === Users ===

    pub async fn user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        self.user_by_field("username", username).await
    }

    pub async fn user_by_id(&mut self, id: i64) -> Result<Option<User>> {
        self.user_by_field("id", &id.to_string()).await
    }

    pub async fn user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        self.user_by_field("email", email).await
    }

    async fn user_by_field(&mut self, field: &str, value: &str) -> Result<Option<User>> {
        let args = json!({ "field": field, "values": [value] });
        let data = self.call("core_user_get_users_by_field", args).await?;
        let records: Vec<Value> = serde_json::from_value(data)?;
        records.into_iter().next().map(User::from_value).transpose()
    }

    pub async fn user_preferences(&mut self) -> Result<Vec<UserPreference>> {
        let data = self
            .call("core_user_get_user_preferences", json!({}))
            .await?;
        let payload: PreferencesPayload = serde_json::from_value(data)?;
        Ok(payload.preferences)
    }

    // === Groups / participants ===

    pub async fn course_groups(&mut self, course_id: i64) -> Result<Vec<Group>> {
        let args = json!({ "courseid": course_id, "userid": 0 });
        let data = self.call("core_group_get_course_user_groups", args).await?;
        let payload: GroupsPayload = serde_json::from_value(data)?;
        payload.groups.into_iter().map(Group::from_value).collect()
    }

    pub async fn search_participants(&mut self, course_id: i64, term: &str) -> Result<Vec<User>> {
        let args = json!({
            "courseid": course_id,
            "search": term,
            "searchanywhere": true,
            "page": 0,
            "perpage": 30,
        });
        let data = self.call("core_enrol_search_users", args).await?;
        let records: Vec<Value> = serde_json::from_value(data)?;
        records.into_iter().map(User::from_value).collect()
    }
}

fn events_from(data: Value) -> Result<Vec<Assignment>> {
    let payload: EventsPayload = serde_json::from_value(data)?;
    payload
        .events
        .into_iter()
        .map(Assignment::from_value)
        .collect()
}

// Per-endpoint response shells. Events stay as `Value` until the model layer
// decodes them so each `Assignment` can keep its raw payload.

#[derive(Debug, Deserialize)]
struct CoursesPayload {
    #[serde(default)]
    courses: Vec<RawCourse>,
}

#[derive(Debug, Deserialize)]
struct EventsPayload {
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    event: Value,
}

#[derive(Debug, Deserialize)]
struct MonthlyViewPayload {
    #[serde(default)]
    weeks: Vec<MonthlyWeek>,
}

#[derive(Debug, Deserialize)]
struct MonthlyWeek {
    #[serde(default)]
    days: Vec<MonthlyDay>,
}

#[derive(Debug, Deserialize)]
struct MonthlyDay {
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PreferencesPayload {
    #[serde(default)]
    preferences: Vec<UserPreference>,
}

#[derive(Debug, Deserialize)]
struct GroupsPayload {
    #[serde(default)]
    groups: Vec<Value>,
}
