//! Telegram Bot API `sendMessage`.
//!
//! Bot token and chat id are resolved by the caller and passed in; the token
//! is part of the request path, so it never appears in logs or `Debug`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Notifier, NotifyError};

pub const DEFAULT_TELEGRAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TelegramNotifierConfig {
    pub api_base: String,
    pub token: String,
    pub chat_id: String,
    /// `Markdown` for the legacy flavor the reports are written in.
    pub parse_mode: String,
    pub timeout: Duration,
}

impl fmt::Debug for TelegramNotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifierConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<REDACTED>")
            .field("chat_id", &self.chat_id)
            .field("parse_mode", &self.parse_mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    cfg: TelegramNotifierConfig,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    parse_mode: &'a str,
}

fn is_blank(s: &&str) -> bool {
    s.trim().is_empty()
}

/// Error envelope: `{"ok": false, "error_code": 400, "description": "..."}`.
#[derive(Deserialize)]
struct ApiReply {
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(cfg: TelegramNotifierConfig) -> Result<Self, NotifyError> {
        if cfg.token.trim().is_empty() || cfg.chat_id.trim().is_empty() {
            return Err(NotifyError::Config(
                "telegram token and chat id must be non-empty".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| NotifyError::Config(format!("http client build failed: {e}")))?;
        Ok(Self { cfg, http })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.cfg.api_base.trim_end_matches('/'),
            self.cfg.token
        )
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        let body = SendMessage {
            chat_id: &self.cfg.chat_id,
            text,
            parse_mode: &self.cfg.parse_mode,
        };

        // reqwest errors embed the URL; strip it so the token stays out of messages.
        let resp = self
            .http
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if status.is_success() {
            debug!(chars = text.chars().count(), "telegram message delivered");
            return Ok(());
        }

        let raw = resp.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiReply>(&raw)
            .ok()
            .and_then(|r| r.description)
            .unwrap_or(raw);
        warn!(status = status.as_u16(), %description, "telegram rejected message");
        Err(NotifyError::Api {
            status: status.as_u16(),
            description,
        })
    }
}
