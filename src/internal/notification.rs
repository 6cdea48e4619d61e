use std::time::{Duration, Instant};

/// Type of notification to display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Warning,
    Error,
}

impl NotificationType {
    fn timeout(&self) -> Duration {
        match self {
            NotificationType::Info => Duration::from_secs(3),
            NotificationType::Warning => Duration::from_secs(5),
            NotificationType::Error => Duration::from_secs(10),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::Info => "Info",
            NotificationType::Warning => "Warning",
            NotificationType::Error => "Error",
        }
    }
}

/// A user-facing message with type and auto-dismiss capability.
///
/// Validation failures and server rejections are warnings; transport failures
/// are errors so the user can tell "rejected" apart from "never arrived".
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub timestamp: Instant,
}

impl Notification {
    /// Create a new info notification with default 3s auto-dismiss
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    /// Create a new warning notification with default 5s auto-dismiss
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    /// Create a new error notification with default 10s auto-dismiss
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            timestamp: Instant::now(),
        }
    }

    /// Check if this notification should be auto-dismissed
    pub fn should_dismiss(&self) -> bool {
        self.timestamp.elapsed() > self.notification_type.timeout()
    }

    pub fn is_error(&self) -> bool {
        self.notification_type == NotificationType::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_notification_is_not_dismissed() {
        let n = Notification::error("boom");
        assert!(!n.should_dismiss());
        assert!(n.is_error());
        assert!(n.notification_type.timeout() > Duration::from_secs(9));
    }

    #[test]
    fn expired_notification_is_dismissed() {
        let mut n = Notification::info("saved");
        n.timestamp = Instant::now() - Duration::from_secs(4);
        assert!(n.should_dismiss());
        assert!(!n.is_error());
    }
}
