use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use tracing::info;

use crate::{
    domain::MessageRef,
    messaging::{port::MessagingPort, types::CallbackQuery},
    poll::{AnswerOutcome, Poll, PollAnswer, Responder},
    Error, Result,
};

/// Store of outstanding polls, keyed by their prompt message.
///
/// Owned by the router state and passed by reference to handlers. Entries
/// are inserted only after a prompt was successfully sent and purged on
/// terminal resolution, so the map only ever holds polls a button press can
/// still meaningfully reach.
#[derive(Default)]
pub struct PollRegistry {
    inner: Mutex<HashMap<MessageRef, Arc<dyn Poll>>>,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, key: MessageRef, poll: Arc<dyn Poll>) {
        self.inner.lock().await.insert(key, poll);
    }

    pub async fn remove(&self, key: MessageRef) -> Option<Arc<dyn Poll>> {
        self.inner.lock().await.remove(&key)
    }

    pub async fn get(&self, key: MessageRef) -> Option<Arc<dyn Poll>> {
        self.inner.lock().await.get(&key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Route a button press to its poll and acknowledge the responder.
    ///
    /// Defined failures (no registered poll, unknown answer code) are
    /// acknowledged to the user and returned as errors for the handler
    /// boundary to log; they must never tear down the dispatcher.
    pub async fn dispatch_answer(
        &self,
        messenger: &dyn MessagingPort,
        query: &CallbackQuery,
    ) -> Result<()> {
        let Some(msg) = query.message else {
            messenger
                .answer_callback_query(&query.callback_id, Some("This poll is no longer available"))
                .await?;
            return Err(Error::NotFound(
                "button press without a message reference".to_string(),
            ));
        };

        let Some(poll) = self.get(msg).await else {
            messenger
                .answer_callback_query(&query.callback_id, Some("No active poll for this message"))
                .await?;
            return Err(Error::NotFound(format!(
                "no registered poll for message {} in chat {}",
                msg.message_id.0, msg.chat_id.0
            )));
        };

        let Some(answer) = PollAnswer::parse(&query.data) else {
            messenger
                .answer_callback_query(&query.callback_id, Some("Unknown action"))
                .await?;
            return Err(Error::UnknownAnswer(query.data.clone()));
        };

        let responder = Responder {
            user_id: query.user_id,
            username: query.username.clone(),
        };

        match poll.handle_answer(answer, &responder).await? {
            AnswerOutcome::Applied => {
                // Terminal the moment the answer took effect; purge before the
                // visible follow-ups so a re-press cannot reach a settled poll.
                self.remove(msg).await;
                poll.post_answer().await?;
                messenger
                    .answer_callback_query(&query.callback_id, None)
                    .await?;
            }
            AnswerOutcome::Rejected(reason) => {
                info!(data = %query.data, reason = %reason, "poll answer rejected");
                messenger
                    .answer_callback_query(&query.callback_id, Some(&reason))
                    .await?;
            }
        }

        Ok(())
    }
}
