//! ehw-source
//!
//! Where the raw asset list comes from. [`HoldingsSource`] is the seam the
//! runtime depends on; [`PageSource`] is the production implementation that
//! scrapes the fund's public disclosure page.

use std::fmt;

use ehw_model::RawAsset;

mod extract;
mod page;

pub use extract::{extract_asset_list, extract_attribute};
pub use page::{PageSource, PageSourceConfig};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network failure or timeout before a response arrived.
    Transport(String),
    /// The server answered with a non-2xx status.
    HttpStatus { status: u16 },
    /// The page has no element with the expected id, or it lacks the attribute.
    MissingElement { element_id: String, attribute: String },
    /// The attribute value is not a valid asset list.
    Decode(String),
}

impl SourceError {
    /// `true` for failures to obtain the page at all, `false` when the page
    /// arrived but its content could not be read.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, SourceError::Transport(_) | SourceError::HttpStatus { .. })
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Transport(msg) => write!(f, "fetch failed: {msg}"),
            SourceError::HttpStatus { status } => write!(f, "fetch failed: http status {status}"),
            SourceError::MissingElement {
                element_id,
                attribute,
            } => write!(
                f,
                "page has no element id='{element_id}' with attribute '{attribute}'"
            ),
            SourceError::Decode(msg) => write!(f, "asset list decode failed: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Supplier of the current raw asset list.
#[async_trait::async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn fetch_assets(&self) -> Result<Vec<RawAsset>, SourceError>;
}
