//! Typed view of the merged configuration.
//!
//! Every section is optional; absent keys take the defaults below, which
//! reproduce the single-fund setup (00981A on ezmoney.com.tw, Telegram).

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_FUND_CODE: &str = "00981A";
pub const DEFAULT_SOURCE_URL: &str = "https://www.ezmoney.com.tw/ETF/Fund/Info?fundCode=49YTW";
pub const DEFAULT_ELEMENT_ID: &str = "DataAsset";
pub const DEFAULT_ATTRIBUTE: &str = "data-content";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_STORE_PATH: &str = "00981a_holdings.csv";
pub const DEFAULT_TIMEZONE: &str = "Asia/Taipei";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FundConfig {
    /// Exchange ticker of the fund, used in titles and notices.
    pub code: String,
}

impl Default for FundConfig {
    fn default() -> Self {
        Self {
            code: DEFAULT_FUND_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub url: String,
    /// `id` of the element carrying the asset list.
    pub element_id: String,
    /// Attribute on that element holding the HTML-escaped JSON.
    pub attribute: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            element_id: DEFAULT_ELEMENT_ID.to_string(),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Overrides the "<fund code> Holdings Report" title.
    pub title: Option<String>,
    /// IANA zone used to date the report.
    pub timezone: String,
    pub min_abs_share_delta: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            min_abs_share_delta: 0,
        }
    }
}

/// Telegram delivery. Holds env var NAMES; values come from [`crate::resolve_secrets`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelegramConfig {
    pub api_base: String,
    pub parse_mode: String,
    pub token_env: String,
    pub chat_id_env: String,
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            parse_mode: "Markdown".to_string(),
            token_env: "TG_TOKEN".to_string(),
            chat_id_env: "TG_CHAT_ID".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub fund: FundConfig,
    pub source: SourceConfig,
    pub store: StoreConfig,
    pub report: ReportConfig,
    pub telegram: TelegramConfig,
}

impl WatchConfig {
    /// Deserialize from merged config JSON and validate.
    pub fn from_json(config_json: &Value) -> Result<Self> {
        let cfg: WatchConfig =
            serde_json::from_value(config_json.clone()).context("invalid watch config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fund.code.trim().is_empty() {
            bail!("CONFIG_INVALID /fund/code must not be empty");
        }
        if self.source.url.trim().is_empty() {
            bail!("CONFIG_INVALID /source/url must not be empty");
        }
        if self.source.element_id.trim().is_empty() || self.source.attribute.trim().is_empty() {
            bail!("CONFIG_INVALID /source/element_id and /source/attribute must not be empty");
        }
        if self.source.timeout_secs == 0 || self.telegram.timeout_secs == 0 {
            bail!("CONFIG_INVALID timeouts must be > 0 seconds");
        }
        if self.store.path.trim().is_empty() {
            bail!("CONFIG_INVALID /store/path must not be empty");
        }
        if self.report.min_abs_share_delta < 0 {
            bail!(
                "CONFIG_INVALID /report/min_abs_share_delta must be >= 0, got {}",
                self.report.min_abs_share_delta
            );
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.report
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("CONFIG_INVALID /report/timezone: {e}"))
    }

    pub fn report_title(&self) -> String {
        match self.report.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("{} Holdings Report", self.fund.code.trim()),
        }
    }
}
