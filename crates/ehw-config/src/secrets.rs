//! Runtime secret resolution.
//!
//! # Contract
//! - Config YAML stores only **env var NAMES** (`telegram.token_env`, `telegram.chat_id_env`).
//! - Callers invoke [`resolve_secrets`] once at startup and pass the result
//!   into constructors; nothing else reads the environment for secrets.
//! - `Debug` redacts values. Errors name the env var, never its value.

use anyhow::{bail, Result};

use crate::WatchConfig;

#[derive(Clone)]
pub struct ResolvedSecrets {
    /// Telegram bot token. `None` if the named env var was absent or empty.
    pub telegram_token: Option<String>,
    /// Telegram chat id. `None` if the named env var was absent or empty.
    pub telegram_chat_id: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field(
                "telegram_token",
                &self.telegram_token.as_ref().map(|_| "<REDACTED>"),
            )
            .field(
                "telegram_chat_id",
                &self.telegram_chat_id.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

impl ResolvedSecrets {
    /// Both token and chat id, if present.
    pub fn telegram(&self) -> Option<(&str, &str)> {
        Some((self.telegram_token.as_deref()?, self.telegram_chat_id.as_deref()?))
    }
}

/// Returns `None` if the variable is unset or blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Resolve Telegram credentials from the env vars named in `cfg`.
///
/// With `require_telegram` (a real run, not `--dry-run`) a missing variable
/// is an error naming that variable.
pub fn resolve_secrets(cfg: &WatchConfig, require_telegram: bool) -> Result<ResolvedSecrets> {
    let token_var = cfg.telegram.token_env.trim();
    let chat_var = cfg.telegram.chat_id_env.trim();

    let telegram_token = resolve_env(token_var);
    let telegram_chat_id = resolve_env(chat_var);

    if require_telegram {
        if telegram_token.is_none() {
            bail!(
                "SECRETS_MISSING: required env var '{}' (telegram bot token) is not set or empty",
                token_var
            );
        }
        if telegram_chat_id.is_none() {
            bail!(
                "SECRETS_MISSING: required env var '{}' (telegram chat id) is not set or empty",
                chat_var
            );
        }
    }

    Ok(ResolvedSecrets {
        telegram_token,
        telegram_chat_id,
    })
}
