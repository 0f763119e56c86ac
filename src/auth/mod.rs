//! Browser login handshake.
//!
//! Moodle's internal AJAX API has no token issuance endpoint; the only way
//! in is the same three round trips a browser performs. Fetch the login form
//! and lift its one-time `logintoken`, post the credentials with redirects
//! suppressed, then follow the redirect by hand and read the `sesskey` off
//! the dashboard. A successful credential post answers 303 specifically; a
//! 200 means the form was re-displayed with an error.

use reqwest::header::LOCATION;
use reqwest::StatusCode;

use crate::error::{MoodleError, Result};
use crate::html;
use crate::http::Transport;
use crate::session::Session;

const LOGIN_PATH: &str = "/login/index.php";

/// Runs the full three-step handshake. There is no partial resume; every
/// attempt starts from the login page again.
pub async fn login(transport: &mut Transport, username: &str, password: &str) -> Result<Session> {
    let logintoken = fetch_login_token(transport).await?;
    let redirect = post_credentials(transport, username, password, &logintoken).await?;
    let sesskey = fetch_dashboard_sesskey(transport, &redirect).await?;
    Ok(Session::new(sesskey))
}

async fn fetch_login_token(transport: &mut Transport) -> Result<String> {
    let response = transport.get(LOGIN_PATH).await?;
    let page = response.text().await?;
    html::extract_login_token(&page).ok_or(MoodleError::MissingLoginToken)
}

async fn post_credentials(
    transport: &mut Transport,
    username: &str,
    password: &str,
    logintoken: &str,
) -> Result<String> {
    let fields = [
        ("anchor", ""),
        ("logintoken", logintoken),
        ("username", username),
        ("password", password),
    ];
    let response = transport.post_form(LOGIN_PATH, &fields).await?;

    if response.status() != StatusCode::SEE_OTHER {
        return Err(MoodleError::LoginRejected(response.status()));
    }

    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or(MoodleError::MissingRedirect)
}

async fn fetch_dashboard_sesskey(transport: &mut Transport, redirect_url: &str) -> Result<String> {
    let response = transport.get(redirect_url).await?;
    let page = response.text().await?;
    html::extract_sesskey(&page).ok_or(MoodleError::MissingSesskey)
}
