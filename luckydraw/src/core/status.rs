//! Status line with self-clearing messages.
//!
//! Every posted message gets a fresh [`StatusToken`]. A pending clear only
//! removes the message it was scheduled for, so an older timer never wipes a
//! newer message.

use std::time::{Duration, Instant};

pub const DEFAULT_CLEAR_AFTER: Duration = Duration::from_secs(5);
/// Longer delays are clamped to this.
pub const MAX_CLEAR_AFTER: Duration = Duration::from_secs(86_400);

/// Source of the current time for status expiry.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub token: StatusToken,
    pub text: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    clear_after: Duration,
    next_token: u64,
    current: Option<StatusMessage>,
}

impl StatusLine {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            clear_after: clear_after.min(MAX_CLEAR_AFTER),
            next_token: 0,
            current: None,
        }
    }

    /// Replace the current message. Returns the token for its pending clear.
    pub fn post(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> StatusToken {
        let token = StatusToken(self.next_token);
        self.next_token += 1;
        self.current = Some(StatusMessage {
            token,
            text: text.into(),
            severity,
            expires_at: now + self.clear_after,
        });
        token
    }

    /// Clear the message only if `token` still owns the line.
    pub fn clear(&mut self, token: StatusToken) -> bool {
        if self.current.as_ref().is_some_and(|msg| msg.token == token) {
            self.current = None;
            return true;
        }
        false
    }

    /// Drop the current message if its delay has passed.
    pub fn expire(&mut self, now: Instant) {
        if let Some(token) = self
            .current
            .as_ref()
            .filter(|msg| now >= msg.expires_at)
            .map(|msg| msg.token)
        {
            self.clear(token);
        }
    }

    /// The message that would be on screen at `now`.
    pub fn visible(&self, now: Instant) -> Option<&StatusMessage> {
        self.current.as_ref().filter(|msg| now < msg.expires_at)
    }

    /// The latest message regardless of expiry.
    pub fn latest(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(DEFAULT_CLEAR_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_disappears_after_delay() {
        let start = Instant::now();
        let mut line = StatusLine::new(Duration::from_secs(5));
        line.post("hello", Severity::Normal, start);
        assert_eq!(
            line.visible(start + Duration::from_secs(4)).map(|m| m.text.as_str()),
            Some("hello")
        );
        assert!(line.visible(start + Duration::from_secs(5)).is_none());
        line.expire(start + Duration::from_secs(6));
        assert!(line.latest().is_none());
    }

    #[test]
    fn huge_delay_is_clamped() {
        let start = Instant::now();
        let mut line = StatusLine::new(Duration::MAX);
        line.post("sticky", Severity::Normal, start);
        assert!(line.visible(start + Duration::from_secs(3600)).is_some());
        assert!(line.visible(start + MAX_CLEAR_AFTER).is_none());
    }

    #[test]
    fn stale_clear_keeps_newer_message() {
        let start = Instant::now();
        let mut line = StatusLine::default();
        let first = line.post("first", Severity::Normal, start);
        let second = line.post("second", Severity::Error, start + Duration::from_secs(3));
        assert_ne!(first, second);

        assert!(!line.clear(first));
        let shown = line
            .visible(start + Duration::from_secs(6))
            .expect("second still visible");
        assert_eq!(shown.text, "second");
        assert_eq!(shown.severity, Severity::Error);

        line.expire(start + Duration::from_secs(6));
        assert!(line.latest().is_some());
        assert!(line.clear(second));
        assert!(line.latest().is_none());
    }
}
