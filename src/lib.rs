pub mod ajax;
pub mod auth;
pub mod client;
pub mod error;
pub mod html;
pub mod http;
pub mod models;
pub mod session;

pub use client::{AssignmentQuery, CourseClassification, MoodleClient};
pub use error::{MoodleError, Result};
pub use http::Transport;
pub use models::{
    Assignment, Course, EventTitle, Group, RawCalendarEvent, RawCourse, RawGroup, RawUser, User,
    UserPreference,
};
pub use session::Session;
