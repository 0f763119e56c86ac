//! Mutable holder for the per-login session key.

/// Anti-CSRF token required as a query parameter on every AJAX call.
///
/// Created by the login handshake and owned by the client for its whole
/// lifetime. The key can rotate server-side independently of the login
/// session; the AJAX dispatcher is the only writer and replaces the key in
/// place when the server reports it expired.
#[derive(Debug, Clone)]
pub struct Session {
    sesskey: String,
}

impl Session {
    pub(crate) fn new(sesskey: String) -> Self {
        Self { sesskey }
    }

    pub fn sesskey(&self) -> &str {
        &self.sesskey
    }

    pub(crate) fn update_sesskey(&mut self, sesskey: String) {
        tracing::info!("session key has been refreshed");
        self.sesskey = sesskey;
    }
}
