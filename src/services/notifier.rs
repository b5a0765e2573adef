use crate::domain::notification::NotificationEvent;

/// Best-effort push of events to other viewers.
///
/// Emission never blocks and never reports delivery; callers must not
/// depend on the event arriving.
pub trait NotificationService: Send + Sync {
    fn emit(&self, event: NotificationEvent);
}

/// Used when no realtime endpoint is configured.
pub struct DisabledNotifier;

impl NotificationService for DisabledNotifier {
    fn emit(&self, event: NotificationEvent) {
        tracing::debug!(event = event.name, "realtime channel disabled, dropping event");
    }
}
