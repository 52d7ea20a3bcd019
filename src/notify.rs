use tracing::{debug, warn};

/// Delivery side of a timer going off. Injected into [`Timer::tick`] so the
/// state machine stays independent of the desktop environment.
///
/// Delivery is fire-and-forget: a failed notification must never affect
/// timer state, so implementations do not return errors.
///
/// [`Timer::tick`]: crate::timer::Timer::tick
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// OS-level desktop notifications via `notify-rust`.
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        debug!(title, "sending desktop notification");
        let result = notify_rust::Notification::new()
            .appname(&self.app_name)
            .summary(title)
            .body(message)
            .show();

        if let Err(e) = result {
            // Best effort only. The countdown itself keeps going.
            warn!(error = %e, title, "desktop notification failed");
        }
    }
}
