//! ehw-notify
//!
//! Outbound message delivery. The runtime only sees [`Notifier`]; it never
//! retries and never lets a delivery failure abort a run.

use std::fmt;

mod stdout;
mod telegram;

pub use stdout::StdoutNotifier;
pub use telegram::{TelegramNotifier, TelegramNotifierConfig, DEFAULT_TELEGRAM_TIMEOUT};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Request never completed (connect failure, timeout).
    Transport(String),
    /// The messaging API rejected the request.
    Api { status: u16, description: String },
    /// Notifier could not be constructed from its settings.
    Config(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Transport(msg) => write!(f, "delivery transport error: {msg}"),
            NotifyError::Api {
                status,
                description,
            } => write!(f, "delivery rejected status={status}: {description}"),
            NotifyError::Config(msg) => write!(f, "notifier config error: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

// ---------------------------------------------------------------------------
// Notifier trait
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, text: &str) -> Result<(), NotifyError>;
}
