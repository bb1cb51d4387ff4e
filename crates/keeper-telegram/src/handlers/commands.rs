use keeper_core::{
    domain::ChatId,
    messaging::types::ReplyKeyboard,
    search::{search_candidates, SearchOutcome},
    Result,
};

use crate::router::AppState;

pub(crate) fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub async fn handle_command(state: &AppState, chat: ChatId, text: &str) -> Result<()> {
    let (cmd, args) = parse_command(text);
    match cmd.as_str() {
        "remove" => remove_search(state, chat, &args).await,
        "cancel" => cancel_selection(state, chat).await,
        _ => {
            state
                .messenger
                .send_html(chat, "Unknown command. Use /remove &lt;title&gt; or /cancel.")
                .await?;
            Ok(())
        }
    }
}

/// `/remove <free text>`: search the catalog and offer the candidates as
/// one-time keyboard buttons; the reply is handled as a selection.
async fn remove_search(state: &AppState, chat: ChatId, args: &str) -> Result<()> {
    match search_candidates(state.catalog.as_ref(), args).await? {
        SearchOutcome::Usage => {
            state
                .messenger
                .send_html(chat, "Usage: /remove &lt;title&gt;")
                .await?;
        }
        SearchOutcome::NoMatches => {
            state.messenger.send_html(chat, "No media found").await?;
        }
        SearchOutcome::Candidates(labels) => {
            state
                .messenger
                .send_reply_keyboard(chat, "Choose media to remove", ReplyKeyboard::new(labels))
                .await?;
            state.pending.begin(chat).await;
        }
    }
    Ok(())
}

async fn cancel_selection(state: &AppState, chat: ChatId) -> Result<()> {
    let notice = if state.pending.take(chat).await {
        "Selection canceled"
    } else {
        "Nothing to cancel"
    };
    state.messenger.send_html(chat, notice).await?;
    Ok(())
}
