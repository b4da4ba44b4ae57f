//! Pull the embedded asset list out of the disclosure page HTML.
//!
//! The page carries the list as JSON inside an attribute, HTML-escaped
//! (`&quot;`, `&amp;`, numeric references). The HTML parser decodes entity
//! references in attribute values, so what [`extract_attribute`] returns is
//! already plain JSON text.

use ehw_model::{parse_asset_list, RawAsset};
use scraper::{ElementRef, Html};

use crate::SourceError;

/// Value of `attribute` on the first element whose `id` is `element_id`.
///
/// `None` if no such element exists or it lacks the attribute.
pub fn extract_attribute(html: &str, element_id: &str, attribute: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(element_id))
        .and_then(|el| el.value().attr(attribute))
        .map(str::to_string)
}

pub fn extract_asset_list(
    html: &str,
    element_id: &str,
    attribute: &str,
) -> Result<Vec<RawAsset>, SourceError> {
    let payload =
        extract_attribute(html, element_id, attribute).ok_or_else(|| SourceError::MissingElement {
            element_id: element_id.to_string(),
            attribute: attribute.to_string(),
        })?;

    if payload.trim().is_empty() {
        return Err(SourceError::Decode(format!(
            "attribute '{attribute}' on '#{element_id}' is empty"
        )));
    }

    parse_asset_list(&payload).map_err(|e| SourceError::Decode(e.to_string()))
}
