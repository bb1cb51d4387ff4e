//! Core domain + application logic for the keeper media-removal bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / Plex live
//! behind ports (traits) implemented in adapter crates.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod poll;
pub mod registry;
pub mod search;
pub mod timer;

pub use errors::{Error, Result};
