use crate::domain::{ChatId, UserId};

/// Cross-messenger incoming update model.
///
/// Telegram-specific fields live in the Telegram adapter; the relay only sees
/// these shapes.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(CommandMessage),
    Text(TextMessage),
    Callback(CallbackEvent),
}

/// A `/command` message (e.g. `/start` requesting the panel).
#[derive(Clone, Debug)]
pub struct CommandMessage {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub text: String,
}

/// An inline-button press.
#[derive(Clone, Debug)]
pub struct CallbackEvent {
    pub user_id: UserId,
    pub username: Option<String>,
    pub callback_id: String,
    pub data: String,
}

/// Inline keyboard rows for the control panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Outcome of a panel edit attempt, as a closed taxonomy.
///
/// The reconciler branches on these variants; adapters must map their
/// library errors structurally (never by matching on error message text).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditStatus {
    /// The remote message was updated to match the requested content.
    Edited,
    /// The remote message already matched; success-no-op.
    NotModified,
    /// The message no longer exists or can no longer be edited.
    NotFound,
    /// Anything else: network failure, permission revoked, chat unreachable.
    Transport(String),
}

impl EditStatus {
    /// Both `Edited` and `NotModified` leave a live, identifier-stable panel.
    pub fn is_reconciled(&self) -> bool {
        matches!(self, Self::Edited | Self::NotModified)
    }
}
