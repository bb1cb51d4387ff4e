//! Telegram update handlers.
//!
//! Each handler converts the teloxide update into core types and calls into
//! the keeper-core ports. Failures are logged here, at the boundary, and
//! never tear down the dispatcher: one bad update must not stop the next.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};
use tracing::error;

use keeper_core::domain::ChatId;

use crate::router::AppState;

mod callback;
mod commands;
mod select;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat = ChatId(msg.chat.id.0);

    if text.starts_with('/') {
        if let Err(e) = commands::handle_command(&state, chat, text).await {
            error!(error = %e, command = text, "command failed");
        }
        return Ok(());
    }

    // Free text is only meaningful while a selection is pending.
    if state.pending.take(chat).await {
        if let Err(e) = select::create_removal_poll(&state, text).await {
            error!(error = %e, selection = text, "poll creation failed");
            let _ = state
                .messenger
                .send_html(chat, &select::failure_notice(&e))
                .await;
        }
    }

    Ok(())
}
