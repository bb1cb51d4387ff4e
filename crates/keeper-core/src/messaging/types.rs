use crate::domain::{MessageRef, UserId};

/// An inbound button press, already stripped of transport specifics.
#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub callback_id: String,
    pub user_id: UserId,
    pub username: Option<String>,
    /// Wire answer code carried by the pressed button.
    pub data: String,
    /// The message the button was attached to, when the transport knows it.
    pub message: Option<MessageRef>,
}

/// Inline keyboard (callback buttons attached to a message).
#[derive(Clone, Debug)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }
}

/// One-time reply keyboard: each label is sent back as a plain text message.
#[derive(Clone, Debug)]
pub struct ReplyKeyboard {
    pub labels: Vec<String>,
}

impl ReplyKeyboard {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_html: bool,
    pub supports_edit: bool,
    pub supports_inline_keyboards: bool,
    pub supports_reply_keyboards: bool,
    pub max_message_len: usize,
}
