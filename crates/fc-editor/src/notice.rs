//! User-facing messages for the host's notification sink.

use fc_core::error::EditError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Error,
}

/// A queued notice. `key` is looked up by the host's localization layer;
/// `message` is the English fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub key: &'static str,
    pub message: String,
}

impl Notice {
    pub fn info(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            key,
            message: message.into(),
        }
    }
}

impl From<&EditError> for Notice {
    fn from(err: &EditError) -> Self {
        Self {
            kind: NoticeKind::Error,
            key: err.notice_key(),
            message: err.to_string(),
        }
    }
}
