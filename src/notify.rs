use tracing::{error, info};

/// Fire-and-forget user notifications (toasts in the web UI)
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
    fn show_success(&self, message: &str);
}

/// Notifier that writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str) {
        error!("❌ {}", message);
    }

    fn show_success(&self, message: &str) {
        info!("✅ {}", message);
    }
}
