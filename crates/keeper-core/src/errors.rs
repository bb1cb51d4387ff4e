/// Core error type for the keeper bot.
///
/// Adapter crates should map their specific errors into this type so the bot
/// core can handle failures consistently (user-facing message vs logged).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("external error: {0}")]
    External(String),

    #[error("ambiguous target: {matches} catalog items match {query:?}")]
    AmbiguousTarget { query: String, matches: usize },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unknown answer code: {0:?}")]
    UnknownAnswer(String),

    #[error("poll state error: {0}")]
    Poll(String),
}

pub type Result<T> = std::result::Result<T, Error>;
