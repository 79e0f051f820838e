//! Single-slot, auto-expiring user feedback.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// Default lifetime of a notification.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Failure => write!(f, "failure"),
        }
    }
}

/// The message slot. Each `show` replaces the message and restarts the
/// timeout from its own call.
#[derive(Debug, Clone)]
pub struct Notification {
    message: Option<String>,
    severity: Severity,
    clear_at: Option<Instant>,
    timeout: Duration,
}

impl Default for Notification {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Notification {
    pub fn new(timeout: Duration) -> Self {
        Self {
            message: None,
            severity: Severity::Success,
            clear_at: None,
            timeout,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.show_at(message, severity, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        self.message = Some(message.into());
        self.severity = severity;
        self.clear_at = Some(now + self.timeout);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, Severity::Success);
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        self.show(message, Severity::Failure);
    }

    /// The live message, if any.
    pub fn current(&self) -> Option<(&str, Severity)> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<(&str, Severity)> {
        match (&self.message, self.clear_at) {
            (Some(message), Some(clear_at)) if now < clear_at => {
                Some((message.as_str(), self.severity))
            }
            _ => None,
        }
    }

    /// Clears the message if its deadline has passed.
    ///
    /// Returns true if the message was cleared.
    pub fn check_and_clear(&mut self) -> bool {
        if let Some(clear_at) = self.clear_at
            && Instant::now() >= clear_at
        {
            self.clear();
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.clear_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_message_expires_after_timeout() {
        let mut notification = Notification::default();
        notification.success("saved");
        assert_eq!(notification.current(), Some(("saved", Severity::Success)));

        tokio::time::advance(Duration::from_millis(9_999)).await;
        assert!(notification.current().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(notification.current(), None);
        assert!(notification.check_and_clear());
        assert!(!notification.check_and_clear());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_resets_window() {
        let mut notification = Notification::default();
        notification.success("first");

        tokio::time::advance(Duration::from_secs(6)).await;
        notification.failure("second");

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(notification.current(), Some(("second", Severity::Failure)));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(notification.current(), None);
    }

    #[test]
    fn test_empty_by_default() {
        let notification = Notification::default();
        assert_eq!(notification.current(), None);
    }

    #[test]
    fn test_show_at_uses_given_clock() {
        let start = Instant::now();
        let mut notification = Notification::new(Duration::from_secs(2));
        notification.show_at("hi", Severity::Success, start);

        assert!(notification.current_at(start + Duration::from_secs(1)).is_some());
        assert!(notification.current_at(start + Duration::from_secs(2)).is_none());
    }
}
