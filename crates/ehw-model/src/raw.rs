//! Raw asset list boundary.
//!
//! Shape of the JSON embedded in the disclosure page:
//!
//! ```text
//! [
//!   { "AssetCode": "NAV",  "Value": "1234567890" },
//!   { "AssetCode": "CASH", "Value": "45678901" },
//!   { "AssetCode": "ST",   "Details": [
//!       { "DetailCode": "2330", "DetailName": "TSMC", "NavRate": 9.07, "Share": "2722000" }
//!   ] }
//! ]
//! ```
//!
//! Numeric fields are published either as JSON numbers or as numeric strings,
//! so they are kept as [`RawScalar`] here and coerced by the normalizer.

use serde::{Deserialize, Serialize};

use crate::normalizer::NormalizeError;

/// A scalar that may be published as a JSON number or as text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(serde_json::Number),
    Text(String),
}

impl RawScalar {
    /// `true` for blank text. Blank is treated the same as absent.
    pub fn is_blank(&self) -> bool {
        matches!(self, RawScalar::Text(s) if s.trim().is_empty())
    }

    /// Parse as a finite float. Thousands separators in text are tolerated.
    pub fn to_f64(&self) -> Option<f64> {
        let v = match self {
            RawScalar::Number(n) => n.as_f64()?,
            RawScalar::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Text form used for instrument codes. Integral JSON numbers render without a fraction.
    pub fn to_code_text(&self) -> String {
        match self {
            RawScalar::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => i.to_string(),
                (_, Some(u), _) => u.to_string(),
                (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                _ => n.to_string(),
            },
            RawScalar::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawScalar {
    fn from(s: &str) -> Self {
        RawScalar::Text(s.to_string())
    }
}

impl From<i64> for RawScalar {
    fn from(v: i64) -> Self {
        RawScalar::Number(v.into())
    }
}

impl From<f64> for RawScalar {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(RawScalar::Number)
            .unwrap_or_else(|| RawScalar::Text(v.to_string()))
    }
}

/// One per-instrument record inside an `ST` asset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDetail {
    #[serde(default)]
    pub detail_code: Option<RawScalar>,
    #[serde(default)]
    pub detail_name: Option<String>,
    #[serde(default)]
    pub nav_rate: Option<RawScalar>,
    #[serde(default)]
    pub share: Option<RawScalar>,
}

/// One top-level asset record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAsset {
    pub asset_code: String,
    #[serde(default)]
    pub value: Option<RawScalar>,
    #[serde(default)]
    pub details: Option<Vec<RawDetail>>,
}

impl RawAsset {
    pub fn scalar(asset_code: impl Into<String>, value: impl Into<RawScalar>) -> Self {
        Self {
            asset_code: asset_code.into(),
            value: Some(value.into()),
            details: None,
        }
    }

    pub fn stocks(details: Vec<RawDetail>) -> Self {
        Self {
            asset_code: crate::normalizer::ASSET_CODE_STOCKS.to_string(),
            value: None,
            details: Some(details),
        }
    }
}

impl RawDetail {
    pub fn new(
        code: impl Into<RawScalar>,
        name: &str,
        nav_rate: impl Into<RawScalar>,
        share: impl Into<RawScalar>,
    ) -> Self {
        Self {
            detail_code: Some(code.into()),
            detail_name: Some(name.to_string()),
            nav_rate: Some(nav_rate.into()),
            share: Some(share.into()),
        }
    }
}

/// Strictly deserialize the asset list JSON.
pub fn parse_asset_list(json: &str) -> Result<Vec<RawAsset>, NormalizeError> {
    serde_json::from_str(json).map_err(|e| NormalizeError::Malformed(e.to_string()))
}
