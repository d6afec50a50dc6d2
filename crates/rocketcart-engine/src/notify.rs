//! # Notification Sinks
//!
//! Implementations of [`NotificationSink`].
//!
//! | Sink               | Use                                             |
//! |--------------------|-------------------------------------------------|
//! | `TracingNotifier`  | Default. Notices become log events.             |
//! | `ChannelNotifier`  | A UI drains notices and renders toasts.         |
//! | `NoOpNotifier`     | Callers that only read the returned results.    |

use rocketcart_core::{Notice, NoticeLevel, NotificationSink};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => info!(target: "rocketcart::notice", "{}", notice.message),
            NoticeLevel::Error => warn!(target: "rocketcart::notice", "{}", notice.message),
        }
    }
}

/// Forwards notices to an unbounded channel.
///
/// Sending never blocks the controller. Notices sent after the receiver is
/// dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, notice: &Notice) {
        let _ = self.tx.send(notice.clone());
    }
}

/// Drops every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl NotificationSink for NoOpNotifier {
    fn notify(&self, _notice: &Notice) {}
}
