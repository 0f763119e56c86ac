use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::optional_datetime;
use crate::error::Result;

/// User fields as returned by the users-by-field and participant-search
/// endpoints. Only `id` and `fullname` are guaranteed; visibility of the
/// rest depends on the caller's permissions and site privacy settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    pub fullname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub idnumber: Option<String>,
    #[serde(default)]
    pub firstaccess: Option<i64>,
    #[serde(default)]
    pub lastaccess: Option<i64>,
    #[serde(default)]
    pub auth: Option<String>,
    #[serde(default)]
    pub suspended: Option<bool>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub profileimageurl: Option<String>,
    #[serde(default)]
    pub profileimageurlsmall: Option<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub fullname: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub institution: Option<String>,
    pub id_number: Option<String>,
    pub first_access: Option<DateTime<Utc>>,
    pub last_access: Option<DateTime<Utc>>,
    pub auth: Option<String>,
    pub suspended: bool,
    pub confirmed: bool,
    pub lang: Option<String>,
    pub timezone: Option<String>,
    pub description: Option<String>,
    pub profile_image_url: Option<String>,
    pub profile_image_url_small: Option<String>,
    /// The user record exactly as the server sent it.
    pub raw: Value,
}

impl User {
    pub(crate) fn from_value(value: Value) -> Result<Self> {
        let raw: RawUser = serde_json::from_value(value.clone())?;
        Ok(Self {
            id: raw.id,
            username: raw.username,
            firstname: raw.firstname,
            lastname: raw.lastname,
            fullname: raw.fullname,
            email: raw.email,
            department: raw.department,
            institution: raw.institution,
            id_number: raw.idnumber,
            first_access: optional_datetime(raw.firstaccess),
            last_access: optional_datetime(raw.lastaccess),
            auth: raw.auth,
            suspended: raw.suspended.unwrap_or(false),
            confirmed: raw.confirmed.unwrap_or(true),
            lang: raw.lang,
            timezone: raw.timezone,
            description: raw.description,
            profile_image_url: raw.profileimageurl,
            profile_image_url_small: raw.profileimageurlsmall,
            raw: value,
        })
    }
}

/// One entry from the user-preferences endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPreference {
    pub name: String,
    pub value: String,
}
