//! Minimal scripted HTTP responder used by the integration tests.
//!
//! Each expected request gets one canned response, served in order over
//! fresh connections (`Connection: close` keeps reqwest from pooling).
//! Every request is recorded so tests can assert on round-trip counts,
//! paths, headers, and bodies.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

pub struct ScriptedServer {
    addr: SocketAddr,
    listener: Option<TcpListener>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedServer {
    /// Binds to an ephemeral port without accepting yet, so tests can embed
    /// the server's URL in the scripted responses.
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        Self {
            addr,
            listener: Some(listener),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serves one scripted response per incoming request, then stops
    /// accepting.
    pub fn serve(&mut self, responses: Vec<String>) {
        let listener = self.listener.take().expect("server is already serving");
        let log = self.requests.clone();
        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = match listener.accept().await {
                    Ok(connection) => connection,
                    Err(_) => return,
                };
                if let Some(request) = read_request(&mut stream).await {
                    log.lock().unwrap().push(request);
                }
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {}\r\n", status);
    for (name, value) in headers {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push_str("\r\n");
    }
    out.push_str(&format!("Content-Length: {}\r\n", body.len()));
    out.push_str("Connection: close\r\n\r\n");
    out.push_str(body);
    out
}

pub fn login_page(token: &str) -> String {
    format!(
        concat!(
            "<html><body><form action=\"/login/index.php\" method=\"post\">",
            "<input type=\"hidden\" name=\"logintoken\" value=\"{}\">",
            "<input type=\"text\" name=\"username\">",
            "</form></body></html>",
        ),
        token
    )
}

pub fn dashboard_page(sesskey: &str) -> String {
    format!(
        concat!(
            "<html><head><script>",
            "M.cfg = {{\"wwwroot\":\"https:\\/\\/moodle.example\",\"sesskey\":\"{}\",\"sessiontimeout\":\"7200\"}};",
            "</script></head><body>Dashboard</body></html>",
        ),
        sesskey
    )
}

pub fn service_ok(data: &serde_json::Value) -> String {
    let body = serde_json::json!([{ "error": false, "data": data }]).to_string();
    response(
        "200 OK",
        &[("Content-Type", "application/json")],
        &body,
    )
}

pub fn service_error(errorcode: &str, message: &str) -> String {
    let body = serde_json::json!([{
        "error": true,
        "exception": { "errorcode": errorcode, "message": message }
    }])
    .to_string();
    response(
        "200 OK",
        &[("Content-Type", "application/json")],
        &body,
    )
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| {
            line.split_once(':')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
