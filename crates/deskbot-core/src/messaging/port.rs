use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::EditStatus,
    panel::PanelContentSpec,
    Result,
};

/// Port to the remote messaging service.
///
/// Telegram is the first implementation; the shape is narrow on purpose — the
/// relay only ever sends the panel, edits the panel, and acknowledges button
/// presses.
#[async_trait]
pub trait PanelMessenger: Send + Sync {
    /// Send a brand-new panel message (photo + caption when `spec` carries
    /// an image, plain text otherwise; same keyboard either way).
    async fn send_panel(&self, chat_id: ChatId, spec: &PanelContentSpec) -> Result<MessageRef>;

    /// Edit an existing panel message in place to match `spec`.
    ///
    /// Failures are data, not errors: the reconciler drives its fallback path
    /// off the returned `EditStatus`.
    async fn edit_panel(&self, msg: MessageRef, spec: &PanelContentSpec) -> EditStatus;

    /// Acknowledge a callback query. Required by the transport's interaction
    /// model independent of authorization outcome.
    async fn answer_callback(&self, callback_id: &str) -> Result<()>;
}
