use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use async_trait::async_trait;
use tracing::{error, info};

use crate::{
    catalog::{links::reference_url, port::CatalogPort, types::MediaItem},
    domain::{ChatId, MessageRef, UserId},
    formatting::escape_html,
    messaging::{
        port::MessagingPort,
        types::{InlineButton, InlineKeyboard},
    },
    registry::PollRegistry,
    search::parse_selection,
    timer::{CancelOutcome, DeadlineTimer},
    Error, Result,
};

/// Wire code carried by the keep button.
pub const ANSWER_KEEP: &str = "poll:keep";

/// The fixed set of answers a poll can dispatch on.
///
/// Wire codes that parse to no variant are a defined `UnknownAnswer` error,
/// never a silent no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollAnswer {
    Keep,
}

impl PollAnswer {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            ANSWER_KEEP => Some(Self::Keep),
            _ => None,
        }
    }
}

/// What dispatching an answer did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The action took effect; the post-answer hook should run.
    Applied,
    /// The action no longer applies; the reason is shown to the responder
    /// as an ephemeral acknowledgment.
    Rejected(String),
}

/// Identity of the user answering a poll.
#[derive(Clone, Debug)]
pub struct Responder {
    pub user_id: UserId,
    pub username: Option<String>,
}

/// An outstanding confirmation tied to a scheduled default action.
#[async_trait]
pub trait Poll: Send + Sync {
    async fn handle_answer(&self, answer: PollAnswer, responder: &Responder)
        -> Result<AnswerOutcome>;

    /// Hook run after an applied answer, for polls with a visible prompt to
    /// update. Defaults to doing nothing.
    async fn post_answer(&self) -> Result<()> {
        Ok(())
    }
}

/// A poll whose default action is deleting a catalog item.
///
/// Lifecycle: constructed (item resolved) → armed (`create_poll`) → exactly
/// one of kept (keep answer canceled the timer) or removed (timer fired).
pub struct RemovePoll {
    messenger: Arc<dyn MessagingPort>,
    catalog: Arc<dyn CatalogPort>,
    chat: ChatId,
    /// The selection label the poll was created from, kept for display.
    raw_args: String,
    timeout: Duration,
    item: MediaItem,
    prompt: OnceLock<MessageRef>,
    timer: OnceLock<DeadlineTimer>,
}

impl std::fmt::Debug for RemovePoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemovePoll")
            .field("chat", &self.chat)
            .field("raw_args", &self.raw_args)
            .field("timeout", &self.timeout)
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}

impl RemovePoll {
    /// Resolve a selection label to exactly one catalog item.
    ///
    /// More than one match is an ambiguous target: removal must never guess,
    /// so the poll is not created and the error carries the match count.
    pub async fn resolve(catalog: &dyn CatalogPort, raw_args: &str) -> Result<MediaItem> {
        let selection = parse_selection(raw_args)?;

        let mut matches: Vec<MediaItem> = catalog
            .search(&selection.title)
            .await?
            .into_iter()
            .filter(|item| {
                item.title.eq_ignore_ascii_case(&selection.title)
                    && item.year == Some(selection.year)
            })
            .collect();

        match matches.len() {
            0 => Err(Error::NotFound(format!(
                "no catalog item matches {raw_args:?}"
            ))),
            1 => Ok(matches.swap_remove(0)),
            n => {
                error!(query = %raw_args, matches = n, "cannot remove: ambiguous target");
                Err(Error::AmbiguousTarget {
                    query: raw_args.to_string(),
                    matches: n,
                })
            }
        }
    }

    pub async fn new(
        messenger: Arc<dyn MessagingPort>,
        catalog: Arc<dyn CatalogPort>,
        chat: ChatId,
        raw_args: impl Into<String>,
        timeout: Duration,
    ) -> Result<Arc<Self>> {
        let raw_args = raw_args.into();
        let item = Self::resolve(catalog.as_ref(), &raw_args).await?;

        Ok(Arc::new(Self {
            messenger,
            catalog,
            chat,
            raw_args,
            timeout,
            item,
            prompt: OnceLock::new(),
            timer: OnceLock::new(),
        }))
    }

    /// Send the prompt, register the poll, and arm the deadline.
    ///
    /// A failed send returns before anything is registered or armed, so a
    /// half-built poll is never reachable. Registration happens before the
    /// timer is armed: the fired timer purges the registry entry, and must
    /// not be able to run before that entry exists.
    pub async fn create_poll(
        self: &Arc<Self>,
        registry: &Arc<PollRegistry>,
    ) -> Result<MessageRef> {
        if self.prompt.get().is_some() {
            return Err(Error::Poll("poll already created".to_string()));
        }

        let keyboard = InlineKeyboard::new(vec![InlineButton {
            label: "Yes".to_string(),
            callback_data: ANSWER_KEEP.to_string(),
        }]);

        let msg = self
            .messenger
            .send_inline_keyboard(self.chat, &self.prompt_text(), keyboard)
            .await?;

        self.prompt
            .set(msg)
            .map_err(|_| Error::Poll("prompt already recorded for this poll".to_string()))?;

        registry.insert(msg, Arc::clone(self) as Arc<dyn Poll>).await;

        let poll = Arc::clone(self);
        let timer_registry = Arc::clone(registry);
        let timer = DeadlineTimer::arm(self.timeout, async move {
            if let Err(e) = poll.remove_media().await {
                error!(item = %poll.raw_args, error = %e, "scheduled removal failed");
            }
            timer_registry.remove(msg).await;
        });

        if let Err(duplicate) = self.timer.set(timer) {
            // Lost a create race; disarm the duplicate deadline and take the
            // entry back out.
            duplicate.cancel();
            registry.remove(msg).await;
            return Err(Error::Poll("timer already armed for this poll".to_string()));
        }

        Ok(msg)
    }

    /// The prompt message, once `create_poll` has sent it.
    pub fn prompt_ref(&self) -> Option<MessageRef> {
        self.prompt.get().copied()
    }

    fn prompt_text(&self) -> String {
        let mut text = format!(
            "<b>{}</b> is scheduled for removal within <b>{}</b>. Would you like to keep it?",
            escape_html(&self.raw_args),
            format_timeout(self.timeout),
        );
        if let Some(url) = reference_url(&self.item) {
            text.push('\n');
            text.push_str(&url);
        }
        text
    }

    /// Keep action: cancel the deadline.
    ///
    /// A keep that loses the race against the timer is rejected with an
    /// "already removed" notice instead of silently canceling a timer whose
    /// work is already done.
    async fn answer_keep(&self, responder: &Responder) -> Result<AnswerOutcome> {
        let Some(timer) = self.timer.get() else {
            return Err(Error::Poll(
                "keep answer for a poll that was never armed".to_string(),
            ));
        };

        match timer.cancel() {
            CancelOutcome::Canceled => {
                info!(
                    user_id = responder.user_id.0,
                    username = responder.username.as_deref().unwrap_or("unknown"),
                    item = %self.raw_args,
                    "user wants to keep item"
                );
                Ok(AnswerOutcome::Applied)
            }
            CancelOutcome::AlreadyResolved => Ok(AnswerOutcome::Rejected(format!(
                "{} was already removed",
                self.raw_args
            ))),
        }
    }

    /// Timer-fired action: delete the item and flip the prompt to its
    /// terminal text. The timer's compare-and-swap guarantees this runs at
    /// most once per poll.
    async fn remove_media(&self) -> Result<()> {
        self.catalog.delete(&self.item).await?;
        info!(item = %self.raw_args, rating_key = %self.item.rating_key, "item removed");

        if let Some(&msg) = self.prompt.get() {
            self.messenger
                .edit_html(
                    msg,
                    &format!("<b>{}</b> was removed", escape_html(&self.raw_args)),
                )
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Poll for RemovePoll {
    async fn handle_answer(
        &self,
        answer: PollAnswer,
        responder: &Responder,
    ) -> Result<AnswerOutcome> {
        match answer {
            PollAnswer::Keep => self.answer_keep(responder).await,
        }
    }

    /// Replace the prompt with the postponement acknowledgment.
    async fn post_answer(&self) -> Result<()> {
        let Some(&msg) = self.prompt.get() else {
            return Ok(());
        };
        self.messenger
            .edit_html(
                msg,
                &format!(
                    "<b>{}</b> removal is postponed. Happy watching :)",
                    escape_html(&self.raw_args)
                ),
            )
            .await
    }
}

fn format_timeout(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        let hours = secs / 3600;
        format!("{hours} hour{}", if hours == 1 { "" } else { "s" })
    } else if secs >= 60 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{} seconds", secs.max(1))
    }
}
