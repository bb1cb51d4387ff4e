use std::{env, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

/// Typed configuration for the keeper bot.
///
/// Loaded once at startup from the environment (plus an optional `.env`)
/// and treated as immutable for the process lifetime.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    /// Channel the removal prompts are posted to.
    pub poll_channel: ChatId,

    // Plex
    pub plex_base_url: String,
    pub plex_token: String,
    pub plex_request_timeout: Duration,

    // Polls
    pub poll_timeout_hours: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").and_then(non_empty);
        let Some(telegram_bot_token) = telegram_bot_token else {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        };

        let Some(poll_channel) = env_i64("POLL_CHANNEL") else {
            return Err(Error::Config(
                "POLL_CHANNEL environment variable is required (numeric chat id)".to_string(),
            ));
        };

        let plex_base_url = env_str("PLEX_BASE_URL").and_then(non_empty);
        let Some(plex_base_url) = plex_base_url else {
            return Err(Error::Config(
                "PLEX_BASE_URL environment variable is required".to_string(),
            ));
        };
        let plex_base_url = plex_base_url.trim_end_matches('/').to_string();

        let plex_token = env_str("PLEX_TOKEN").and_then(non_empty);
        let Some(plex_token) = plex_token else {
            return Err(Error::Config(
                "PLEX_TOKEN environment variable is required".to_string(),
            ));
        };

        let poll_timeout_hours = env_u64("POLL_TIMEOUT_HOURS").unwrap_or(12);
        if poll_timeout_hours == 0 {
            return Err(Error::Config(
                "POLL_TIMEOUT_HOURS must be positive".to_string(),
            ));
        }

        let plex_request_timeout =
            Duration::from_millis(env_u64("PLEX_REQUEST_TIMEOUT_MS").unwrap_or(10_000));

        Ok(Self {
            telegram_bot_token,
            poll_channel: ChatId(poll_channel),
            plex_base_url,
            plex_token,
            plex_request_timeout,
            poll_timeout_hours,
        })
    }

    /// Deadline armed on each removal poll.
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_hours * 3600)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_i64(key: &str) -> Option<i64> {
    env_str(key).and_then(|s| s.trim().parse::<i64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
