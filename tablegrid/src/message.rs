//! User-facing notifications and confirmation prompts.

use async_trait::async_trait;

/// Trait for the notification surface a grid talks to.
///
/// Implementations bridge to whatever toast/dialog machinery the host UI
/// provides. `confirm` should resolve only after the user has answered.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Shows a warning notification.
    async fn warn(&self, text: &str);

    /// Shows a success notification.
    async fn success(&self, text: &str);

    /// Asks the user to confirm an action; returns `true` on confirmation.
    async fn confirm(&self, text: &str) -> bool;
}

/// Fallback sink that routes notifications to the log.
///
/// `confirm` always declines, so a grid without a wired dialog can never
/// proceed with a destructive action.
#[derive(Debug, Default)]
pub struct LogMessages;

impl LogMessages {
    /// Creates a new logging sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageSink for LogMessages {
    async fn warn(&self, text: &str) {
        log::warn!("{text}");
    }

    async fn success(&self, text: &str) {
        log::info!("{text}");
    }

    async fn confirm(&self, text: &str) -> bool {
        log::warn!("no confirmation dialog wired, declining: {text}");
        false
    }
}

/// Texts used by the delete flow, overridable per grid.
#[derive(Debug, Clone)]
pub struct MessageText {
    /// Warning shown when delete is invoked with nothing selected.
    pub delete_not_selected: String,
    /// Confirmation prompt shown before deleting.
    pub delete_confirm: String,
    /// Toast shown after a successful delete.
    pub delete_success: String,
}

impl Default for MessageText {
    fn default() -> Self {
        Self {
            delete_not_selected: "Please select the rows to delete".to_string(),
            delete_confirm: "Are you sure you want to delete the selected rows?".to_string(),
            delete_success: "Deleted successfully".to_string(),
        }
    }
}
