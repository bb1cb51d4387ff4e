use std::sync::Arc;

use teloxide::prelude::*;
use tracing::warn;

use keeper_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::CallbackQuery as PollCallback,
};

use crate::router::AppState;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });

    let query = PollCallback {
        callback_id: q.id.clone(),
        user_id: UserId(q.from.id.0 as i64),
        username: q.from.username.clone(),
        data: q.data.clone().unwrap_or_default(),
        message,
    };

    // Stale messages and unknown answer codes come back as errors after the
    // user was already acknowledged; they are log material, nothing more.
    if let Err(e) = state
        .polls
        .dispatch_answer(state.messenger.as_ref(), &query)
        .await
    {
        warn!(error = %e, "callback dispatch failed");
    }

    Ok(())
}
