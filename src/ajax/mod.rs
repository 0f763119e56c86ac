//! AJAX service dispatcher.
//!
//! Every data call goes through Moodle's internal `/lib/ajax/service.php`
//! endpoint: a JSON array of request descriptors answered by a parallel
//! array of results. This client only ever sends single-element envelopes,
//! so only element 0 of the response is consulted.
//!
//! Session keys can expire between login and a later call, or rotate
//! server-side. When the server rejects the key, the dispatcher re-reads it
//! from the dashboard and retries the call once; a second rejection (or any
//! other error) surfaces to the caller unchanged. The single-retry budget
//! keeps a persistently broken session from looping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MoodleError, Result};
use crate::html;
use crate::http::Transport;
use crate::session::Session;

const SERVICE_PATH: &str = "/lib/ajax/service.php";
const REFRESH_PATH: &str = "/my/";

/// An expired session key is recovered at most once per call.
const MAX_SESSION_RETRIES: u32 = 1;

#[derive(Debug, Serialize)]
struct AjaxRequest<'a> {
    index: u32,
    methodname: &'a str,
    args: &'a Value,
}

#[derive(Debug, Deserialize)]
struct AjaxReply {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    exception: Option<AjaxException>,
}

#[derive(Debug, Deserialize)]
struct AjaxException {
    #[serde(default)]
    errorcode: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Invokes one named remote procedure and returns its `data` payload
/// verbatim; interpreting the payload is the facade's job.
///
/// The request path embeds the current session key on every attempt, so a
/// refreshed key is picked up by the retry. Performs one round trip, or two
/// on the single permitted refresh path.
pub async fn call(
    transport: &mut Transport,
    session: &mut Session,
    methodname: &str,
    args: Value,
) -> Result<Value> {
    let envelope = serde_json::to_value([AjaxRequest {
        index: 0,
        methodname,
        args: &args,
    }])?;

    let mut retries = 0;
    loop {
        let path = format!(
            "{}?sesskey={}&info={}",
            SERVICE_PATH,
            urlencoding::encode(session.sesskey()),
            urlencoding::encode(methodname)
        );
        let response = transport.post_json(&path, &envelope).await?;
        let body = response.text().await?;
        let replies: Vec<AjaxReply> = serde_json::from_str(&body)?;
        let reply = replies
            .into_iter()
            .next()
            .ok_or_else(|| MoodleError::Api("empty response from the service endpoint".to_string()))?;

        if !reply.error {
            return Ok(reply.data.unwrap_or(Value::Null));
        }

        if is_session_error(reply.exception.as_ref()) && retries < MAX_SESSION_RETRIES {
            tracing::warn!("session key rejected for {}, attempting refresh", methodname);
            refresh_sesskey(transport, session).await?;
            retries += 1;
            continue;
        }

        let message = reply
            .exception
            .and_then(|exception| exception.message)
            .unwrap_or_else(|| "an unknown API error occurred".to_string());
        return Err(MoodleError::Api(message));
    }
}

/// The server's error-code taxonomy is external and only partially
/// documented; match on substrings, case-insensitively, rather than exact
/// codes.
fn is_session_error(exception: Option<&AjaxException>) -> bool {
    match exception.and_then(|exception| exception.errorcode.as_deref()) {
        Some(code) => {
            let code = code.to_lowercase();
            code.contains("invalidsesskey") || code.contains("requirelogin")
        }
        None => false,
    }
}

async fn refresh_sesskey(transport: &mut Transport, session: &mut Session) -> Result<()> {
    let response = transport.get(REFRESH_PATH).await?;
    let page = response.text().await?;
    let sesskey = html::extract_sesskey(&page).ok_or_else(|| {
        MoodleError::SessionRefresh(
            "no session key on the dashboard, the login session may have expired".to_string(),
        )
    })?;
    session.update_sesskey(sesskey);
    Ok(())
}
