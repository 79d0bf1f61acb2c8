//! Telegram update handlers.
//!
//! Each handler is a thin adapter: it maps the teloxide update into the core
//! `IncomingUpdate` model and hands it to the relay, which owns acknowledge /
//! authorization / dispatch ordering.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use deskbot_core::relay::Relay;

mod callback;
mod message;

pub async fn handle_callback(q: CallbackQuery, relay: Arc<Relay>) -> ResponseResult<()> {
    callback::handle_callback(q, relay).await
}

pub async fn handle_message(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    message::handle_message(msg, relay).await
}
