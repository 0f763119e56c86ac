//! Cookie-bearing HTTP transport.
//!
//! Moodle's browser login flow spans several endpoints that share state
//! through cookies, and the `MoodleSession` cookie rotates mid-handshake.
//! reqwest's built-in cookie store stays disabled; the transport owns an
//! explicit jar so the login handshake and the AJAX dispatcher see the same
//! accumulated cookies. Redirects are never followed automatically because
//! the authenticator must observe the 303 issued on successful login.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::Response;
use serde_json::Value;

use crate::error::Result;

const USER_AGENT: &str = "Mozilla/5.0 (compatible) moodle-client/0.1";

pub struct Transport {
    base_url: String,
    http: reqwest::Client,
    cookies: HashMap<String, String>,
}

impl Transport {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            base_url,
            http,
            cookies: HashMap::new(),
        })
    }

    pub async fn get(&mut self, path: &str) -> Result<Response> {
        let url = self.resolve(path);
        let request = self.http.get(url).header(COOKIE, self.cookie_header());
        self.execute(request).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Result<Response> {
        let url = self.resolve(path);
        let request = self
            .http
            .post(url)
            .header(COOKIE, self.cookie_header())
            .form(fields);
        self.execute(request).await
    }

    pub async fn post_json(&mut self, path: &str, body: &Value) -> Result<Response> {
        let url = self.resolve(path);
        let request = self
            .http
            .post(url)
            .header(COOKIE, self.cookie_header())
            .header("X-Requested-With", "XMLHttpRequest")
            .json(body);
        self.execute(request).await
    }

    async fn execute(&mut self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        self.absorb_cookies(response.headers());
        Ok(response)
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Folds every `Set-Cookie` header into the jar, last write per name
    /// wins. Attributes after the first `;` are ignored; the jar never
    /// expires or clears entries.
    fn absorb_cookies(&mut self, headers: &HeaderMap) {
        for header in headers.get_all(SET_COOKIE) {
            let raw = match header.to_str() {
                Ok(raw) => raw,
                Err(_) => continue,
            };
            let pair = raw.split(';').next().unwrap_or("");
            if let Some((name, value)) = pair.split_once('=') {
                let (name, value) = (name.trim(), value.trim());
                if !name.is_empty() && !value.is_empty() {
                    self.cookies.insert(name.to_string(), value.to_string());
                }
            }
        }
    }
}
