//! Manifest locator: find the manifest URL inside a portal page.
//!
//! The player bootstrap script carries the manifest address as a
//! percent-encoded `json_url=` query parameter. The page is parsed into a
//! tree and walked depth-first, pre-order; the first qualifying script wins.

mod unescape;

pub use unescape::{query_unescape, UnescapeError};

use scraper::{ElementRef, Html};

use crate::error::ArtedlError;

/// Marker identifying the player bootstrap script.
const CLASS_IDS_MARKER: &str = "window.__CLASS_IDS__";
/// Query parameter holding the manifest URL.
const JSON_URL_KEY: &str = "json_url=";
/// Tokens containing this are site-factory references, never the manifest.
const SITEFACTORY_EXCLUSION: &str = "arte_sitefactory";

/// Returns the manifest URL referenced by the page, or `NotFound`.
pub fn locate_manifest_url(page_html: &str) -> Result<String, ArtedlError> {
    let document = Html::parse_document(page_html);
    // The first matching token ends the search even when its value is empty.
    find_in_element(document.root_element())
        .filter(|url| !url.is_empty())
        .ok_or(ArtedlError::NotFound)
}

fn find_in_element(element: ElementRef<'_>) -> Option<String> {
    if element.value().name() == "script" {
        if let Some(found) = script_text(element).and_then(manifest_url_from_script) {
            return Some(found);
        }
    }
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find_map(find_in_element)
}

/// Text of the script's first child, if that child is a non-empty text node.
fn script_text(script: ElementRef<'_>) -> Option<&str> {
    let first = script.first_child()?;
    let text: &str = first.value().as_text()?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn manifest_url_from_script(text: &str) -> Option<String> {
    let text = text.trim();
    if !text.contains(CLASS_IDS_MARKER) || !text.contains(JSON_URL_KEY) {
        return None;
    }
    text.split_whitespace()
        .filter_map(|token| match query_unescape(token) {
            Ok(word) => Some(word),
            Err(e) => {
                tracing::trace!(token, error = %e, "skipping undecodable token");
                None
            }
        })
        .find_map(|word| manifest_url_from_token(&word))
}

fn manifest_url_from_token(word: &str) -> Option<String> {
    if !word.contains(JSON_URL_KEY) || word.contains(SITEFACTORY_EXCLUSION) {
        return None;
    }
    let part = word.split('"').find(|part| part.contains(JSON_URL_KEY))?;
    let (_, value) = part.split_once('=')?;
    Some(value.to_string())
}
