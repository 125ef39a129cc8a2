use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

/// User-facing toast payload.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_severity(Severity::Info, title, body)
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, title, body)
    }

    fn with_severity(
        severity: Severity,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Sink for user-visible notifications. Publishing is fire-and-forget and
/// must never block the caller.
pub trait NotificationChannel: Send + Sync {
    fn publish(&self, notification: Notification);
}

/// key: toast-hub -> fan-in queue feeding the toast surface
#[derive(Clone)]
pub struct ToastHub {
    sender: UnboundedSender<Notification>,
}

impl ToastHub {
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = unbounded_channel();
        (Self { sender: tx }, rx)
    }
}

impl NotificationChannel for ToastHub {
    fn publish(&self, notification: Notification) {
        if let Err(err) = self.sender.send(notification) {
            debug!(id = %err.0.id, "toast surface gone; notification discarded");
        }
    }
}

/// Discards everything; for embedders without a toast surface.
pub struct NullChannel;

impl NotificationChannel for NullChannel {
    fn publish(&self, _notification: Notification) {}
}
