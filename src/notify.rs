//! Operator notifications
//!
//! Fire-and-forget: the engine reports outcomes here and never depends on
//! what the surface does with them.

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Operation completed
    Success,
    /// Operation completed with caveats
    Warning,
    /// Operation failed
    Error,
}

/// A message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Human-readable text
    pub message: String,
}

impl Notice {
    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Warning notice
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Notification surface
pub trait Notifier: Send + Sync {
    /// Report a notice to the operator
    fn notify(&self, notice: Notice);
}

/// Notifier that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}
