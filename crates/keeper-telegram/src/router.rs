use std::{collections::HashSet, sync::Arc};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::Mutex;
use tracing::info;

use keeper_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use keeper_core::{
    catalog::port::CatalogPort, config::Config, domain::ChatId, messaging::port::MessagingPort,
    registry::PollRegistry,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    pub catalog: Arc<dyn CatalogPort>,
    pub polls: Arc<PollRegistry>,
    pub pending: Arc<PendingSelections>,
}

/// Chats whose `/remove` search is awaiting a selection reply.
#[derive(Default)]
pub struct PendingSelections {
    inner: Mutex<HashSet<i64>>,
}

impl PendingSelections {
    pub async fn begin(&self, chat: ChatId) {
        self.inner.lock().await.insert(chat.0);
    }

    /// Consume the pending state, returning whether one existed.
    pub async fn take(&self, chat: ChatId) -> bool {
        self.inner.lock().await.remove(&chat.0)
    }
}

pub async fn run_polling(cfg: Arc<Config>, catalog: Arc<dyn CatalogPort>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        info!(bot = me.username(), "keeper started");
    }
    info!(
        poll_channel = cfg.poll_channel.0,
        timeout_hours = cfg.poll_timeout_hours,
        "poll configuration"
    );

    // Wrap the raw Telegram messenger with a throttling decorator to stay
    // under flood-control limits when a search fans out or timers fire close
    // together. The adapter still retries once on 429 RetryAfter.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let state = Arc::new(AppState {
        cfg,
        messenger,
        catalog,
        polls: Arc::new(PollRegistry::new()),
        pending: Arc::new(PendingSelections::default()),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pending_selection_is_consumed_once() {
        let pending = PendingSelections::default();
        let chat = ChatId(5);

        assert!(!pending.take(chat).await);

        pending.begin(chat).await;
        assert!(pending.take(chat).await);
        assert!(!pending.take(chat).await);
    }
}
