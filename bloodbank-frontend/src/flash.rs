use serde::{Deserialize, Serialize};
use tower_sessions::Session;

pub const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash flash-success",
            FlashKind::Error => "flash flash-error",
        }
    }
}

pub async fn push(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(FLASH_KEY, &flash).await {
        tracing::warn!(error = %e, "Could not store flash message");
    }
}

pub async fn take(session: &Session) -> Option<Flash> {
    session.remove::<Flash>(FLASH_KEY).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Dropping unreadable flash message");
        None
    })
}
