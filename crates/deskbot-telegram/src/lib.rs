//! Telegram adapter (teloxide).
//!
//! This crate implements the `deskbot-core` PanelMessenger port over the
//! Telegram Bot API and hosts the polling dispatcher.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile},
    ApiError, RequestError,
};

pub mod handlers;
pub mod router;

use deskbot_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::PanelMessenger,
        types::{EditStatus, InlineKeyboard},
    },
    panel::PanelContentSpec,
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn tg_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
        let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| {
                        InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone())
                    })
                    .collect()
            })
            .collect();
        InlineKeyboardMarkup::new(rows)
    }

    fn map_err(e: RequestError) -> Error {
        Error::Transport(format!("telegram error: {e}"))
    }

    /// Structured classification of an edit failure; the reconciler branches
    /// on this closed taxonomy rather than on error message text.
    fn classify_edit_error(e: RequestError) -> EditStatus {
        match e {
            RequestError::Api(ApiError::MessageNotModified) => EditStatus::NotModified,
            RequestError::Api(
                ApiError::MessageToEditNotFound
                | ApiError::MessageIdInvalid
                | ApiError::MessageCantBeEdited,
            ) => EditStatus::NotFound,
            other => EditStatus::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl PanelMessenger for TelegramMessenger {
    async fn send_panel(&self, chat_id: ChatId, spec: &PanelContentSpec) -> Result<MessageRef> {
        let markup = Self::tg_markup(&spec.keyboard);

        let msg = match &spec.image {
            Some(image) => self
                .bot
                .send_photo(Self::tg_chat(chat_id), InputFile::file(image.clone()))
                .caption(spec.caption.clone())
                .reply_markup(markup)
                .await
                .map_err(Self::map_err)?,
            None => self
                .bot
                .send_message(Self::tg_chat(chat_id), spec.caption.clone())
                .reply_markup(markup)
                .await
                .map_err(Self::map_err)?,
        };

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn edit_panel(&self, msg: MessageRef, spec: &PanelContentSpec) -> EditStatus {
        let markup = Self::tg_markup(&spec.keyboard);
        let chat = Self::tg_chat(msg.chat_id);
        let id = Self::tg_msg_id(msg.message_id);

        // Photo panels only get their keyboard refreshed; text panels are
        // edited text+keyboard in one call. Editing a photo message through
        // the text path is rejected by the API, which is exactly the staleness
        // signal that routes an image-added/removed transition through the
        // replace path.
        let result = match &spec.image {
            Some(_) => self
                .bot
                .edit_message_reply_markup(chat, id)
                .reply_markup(markup)
                .await
                .map(|_| ()),
            None => self
                .bot
                .edit_message_text(chat, id, spec.caption.clone())
                .reply_markup(markup)
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => EditStatus::Edited,
            Err(e) => Self::classify_edit_error(e),
        }
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}
