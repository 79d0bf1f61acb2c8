use std::sync::Arc;

use teloxide::{prelude::*, types::CallbackQuery};

use deskbot_core::{
    domain::UserId,
    messaging::types::{CallbackEvent, IncomingUpdate},
    relay::Relay,
};

pub async fn handle_callback(q: CallbackQuery, relay: Arc<Relay>) -> ResponseResult<()> {
    let event = CallbackEvent {
        user_id: UserId(q.from.id.0 as i64),
        username: q.from.username.clone(),
        callback_id: q.id,
        data: q.data.unwrap_or_default(),
    };

    relay.handle_update(IncomingUpdate::Callback(event)).await;

    Ok(())
}
