use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use deskbot_core::{
    domain::{ChatId, UserId},
    messaging::types::{CommandMessage, IncomingUpdate, TextMessage},
    relay::Relay,
};

pub async fn handle_message(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        // Media and other message kinds carry no command for this bot.
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let user_id = msg.from().map(|u| UserId(u.id.0 as i64));
    let username = msg.from().and_then(|u| u.username.clone());

    let update = match parse_command_name(text) {
        Some(name) => IncomingUpdate::Command(CommandMessage {
            chat_id,
            user_id,
            username,
            name,
        }),
        None => IncomingUpdate::Text(TextMessage {
            chat_id,
            user_id,
            username,
            text: text.to_string(),
        }),
    };

    relay.handle_update(update).await;
    Ok(())
}

/// `/start` and `/start@BotName` both yield `start`.
fn parse_command_name(text: &str) -> Option<String> {
    let rest = text.strip_prefix('/')?;
    let token = rest.split_whitespace().next()?;
    let name = token.split('@').next().unwrap_or(token);
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}
