//! Login-page token extraction.
//!
//! Moodle embeds two anti-CSRF tokens in plain HTML rather than offering an
//! endpoint for them: a one-time `logintoken` inside the login form, and the
//! per-session `sesskey` inside the inline `M.cfg` script on every
//! authenticated page. Both extractors scan the document as text and return
//! `None` when the token is absent; callers decide how to fail.

use once_cell::sync::Lazy;
use regex::Regex;

static LOGIN_TOKEN_NAME_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<input[^>]*\bname=["']logintoken["'][^>]*\bvalue=["']([^"']+)["']"#).unwrap()
});

static LOGIN_TOKEN_VALUE_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<input[^>]*\bvalue=["']([^"']+)["'][^>]*\bname=["']logintoken["']"#).unwrap()
});

static SESSKEY: Lazy<Regex> = Lazy::new(|| Regex::new(r#""sesskey":"([^"]+)""#).unwrap());

/// Value of the `logintoken` input on the login form, in either attribute
/// order. An empty value counts as missing.
pub fn extract_login_token(html: &str) -> Option<String> {
    LOGIN_TOKEN_NAME_FIRST
        .captures(html)
        .or_else(|| LOGIN_TOKEN_VALUE_FIRST.captures(html))
        .map(|captures| captures[1].to_string())
}

/// First `"sesskey":"<value>"` occurrence anywhere in the document.
pub fn extract_sesskey(html: &str) -> Option<String> {
    SESSKEY
        .captures(html)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_token_name_before_value() {
        let html = r#"<form><input type="hidden" name="logintoken" value="tok1"></form>"#;
        assert_eq!(extract_login_token(html), Some("tok1".to_string()));
    }

    #[test]
    fn test_login_token_value_before_name() {
        let html = r#"<input value="tok2" type="hidden" name="logintoken">"#;
        assert_eq!(extract_login_token(html), Some("tok2".to_string()));
    }

    #[test]
    fn test_login_token_surrounded_by_markup() {
        let html = concat!(
            "<html><body><div class=\"loginform\">",
            "<input name=\"username\" value=\"\">",
            "<input type=\"hidden\" name=\"logintoken\" value=\"a1b2c3\">",
            "</div></body></html>",
        );
        assert_eq!(extract_login_token(html), Some("a1b2c3".to_string()));
    }

    #[test]
    fn test_login_token_missing() {
        assert_eq!(extract_login_token("<html><body>no form here</body></html>"), None);
    }

    #[test]
    fn test_login_token_empty_value_counts_as_missing() {
        let html = r#"<input name="logintoken" value="">"#;
        assert_eq!(extract_login_token(html), None);
    }

    #[test]
    fn test_sesskey_inside_mcfg_script() {
        let html = r#"<script>M.cfg = {"wwwroot":"https:\/\/moodle.example","sesskey":"abc123","sessiontimeout":"7200"};</script>"#;
        assert_eq!(extract_sesskey(html), Some("abc123".to_string()));
    }

    #[test]
    fn test_sesskey_first_occurrence_wins() {
        let html = r#"{"sesskey":"first"} ... {"sesskey":"second"}"#;
        assert_eq!(extract_sesskey(html), Some("first".to_string()));
    }

    #[test]
    fn test_sesskey_missing() {
        assert_eq!(extract_sesskey("<html><head></head><body></body></html>"), None);
    }
}
