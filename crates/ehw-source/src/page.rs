//! Production source: GET the disclosure page and extract the asset list.

use std::time::Duration;

use ehw_model::RawAsset;
use tracing::{debug, info};

use crate::extract::extract_asset_list;
use crate::{HoldingsSource, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSourceConfig {
    pub url: String,
    pub element_id: String,
    pub attribute: String,
    pub user_agent: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PageSource {
    cfg: PageSourceConfig,
    http: reqwest::Client,
}

impl PageSource {
    pub fn new(cfg: PageSourceConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| SourceError::Transport(format!("http client build failed: {e}")))?;
        Ok(Self { cfg, http })
    }

    async fn fetch_page(&self) -> Result<String, SourceError> {
        let resp = self
            .http
            .get(&self.cfg.url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| SourceError::Transport(format!("reading body failed: {e}")))
    }
}

#[async_trait::async_trait]
impl HoldingsSource for PageSource {
    fn name(&self) -> &str {
        "page"
    }

    async fn fetch_assets(&self) -> Result<Vec<RawAsset>, SourceError> {
        let html = self.fetch_page().await?;
        debug!(url = %self.cfg.url, bytes = html.len(), "fetched disclosure page");

        let assets = extract_asset_list(&html, &self.cfg.element_id, &self.cfg.attribute)?;
        info!(url = %self.cfg.url, assets = assets.len(), "asset list extracted");
        Ok(assets)
    }
}
