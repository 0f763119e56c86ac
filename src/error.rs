use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoodleError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON in service response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not find login token on the login page")]
    MissingLoginToken,

    #[error("login rejected with HTTP {0}, check username/password or Moodle version")]
    LoginRejected(StatusCode),

    #[error("no redirect URL found after login")]
    MissingRedirect,

    #[error("could not find session key (sesskey) after login")]
    MissingSesskey,

    #[error("failed to refresh session key: {0}")]
    SessionRefresh(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("client is not logged in, call login() first")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, MoodleError>;
