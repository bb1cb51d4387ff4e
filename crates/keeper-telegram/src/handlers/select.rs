use tracing::info;

use keeper_core::{poll::RemovePoll, Error, Result};

use crate::router::AppState;

/// Turn a selection reply into an armed, registered removal poll.
///
/// `create_poll` registers the poll itself once the prompt is sent; a failed
/// send leaves the registry untouched.
pub async fn create_removal_poll(state: &AppState, selection: &str) -> Result<()> {
    let poll = RemovePoll::new(
        state.messenger.clone(),
        state.catalog.clone(),
        state.cfg.poll_channel,
        selection,
        state.cfg.poll_timeout(),
    )
    .await?;

    poll.create_poll(&state.polls).await?;
    info!(selection, "removal poll created");
    Ok(())
}

/// What the selecting user is told when their selection went nowhere.
pub(crate) fn failure_notice(e: &Error) -> String {
    match e {
        Error::AmbiguousTarget { matches, .. } => format!(
            "{matches} catalog items match that selection; not removing any of them"
        ),
        Error::NotFound(_) => "No matching media found. Try /remove again.".to_string(),
        _ => "Could not create the removal poll.".to_string(),
    }
}
