//! # Notices
//!
//! User-facing messages produced by cart operations.
//!
//! A [`Notice`] is plain data. The engine hands it to a
//! [`NotificationSink`](crate::ports::NotificationSink) and also returns it to
//! the caller, so the presentation layer decides how it is rendered (toast,
//! log line, status bar).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Shown whenever a requested amount exceeds stock, for any operation.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Creates an informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Notice for a product newly added to the cart.
    pub fn added(title: &str) -> Self {
        Notice::info(format!("Added {} to the cart", title))
    }

    /// Returns true for error notices.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// The cart operations, used to pick failure messages and tag log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    Add,
    Remove,
    SetAmount,
    Clear,
}

impl CartOperation {
    /// Generic failure message for this operation.
    pub fn failure_message(&self) -> &'static str {
        match self {
            CartOperation::Add => "Failed to add product",
            CartOperation::Remove => "Failed to remove product",
            CartOperation::SetAmount => "Failed to change product quantity",
            CartOperation::Clear => "Failed to clear the cart",
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartOperation::Add => write!(f, "add_item"),
            CartOperation::Remove => write!(f, "remove_item"),
            CartOperation::SetAmount => write!(f, "set_item_amount"),
            CartOperation::Clear => write!(f, "clear"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_notice_names_product() {
        let notice = Notice::added("Tênis VR Caminhada");
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "Added Tênis VR Caminhada to the cart");
        assert!(!notice.is_error());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(CartOperation::SetAmount.to_string(), "set_item_amount");
        assert_eq!(CartOperation::Clear.failure_message(), "Failed to clear the cart");
    }
}
