//! Shared application state for the draw server.

use std::sync::Arc;

use luckydraw::io::sms::SmsTransport;

/// SMS backend shared by all request handlers.
pub type SharedSms = Arc<dyn SmsTransport + Send + Sync>;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where `/api/send-sms` forwards validated requests.
    pub sms: SharedSms,
}

impl AppState {
    pub fn new(sms: SharedSms) -> Self {
        Self { sms }
    }
}
