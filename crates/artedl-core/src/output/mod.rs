//! Output file naming.
//!
//! The name is built from two fixed positions of the source URL split on
//! `/`: index 6 (the title slug) and index 5 (the programme id), e.g.
//! `https://www.arte.tv/fr/videos/12345/some-title/` gives
//! `some-title-12345`. The version code of the chosen variant is appended
//! when there is one.

mod sanitize;

pub use sanitize::sanitize_component;

use std::path::{Path, PathBuf};

use crate::error::ArtedlError;

/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = "mp4";

const ID_SEGMENT: usize = 5;
const TITLE_SEGMENT: usize = 6;

/// Derives `<title>-<id>[-<version_code>]` from `source_url`.
pub fn derive_output_name(
    source_url: &str,
    version_code: Option<&str>,
) -> Result<String, ArtedlError> {
    let segments: Vec<&str> = source_url.split('/').collect();
    if segments.len() <= TITLE_SEGMENT {
        return Err(malformed(
            source_url,
            format!(
                "expected at least {} '/'-separated segments, found {}",
                TITLE_SEGMENT + 1,
                segments.len()
            ),
        ));
    }

    let title = sanitize_component(segments[TITLE_SEGMENT]);
    let id = sanitize_component(segments[ID_SEGMENT]);
    if title.is_empty() || id.is_empty() {
        return Err(malformed(
            source_url,
            "empty title or id path segment".to_string(),
        ));
    }

    let mut name = format!("{}-{}", title, id);
    if let Some(code) = version_code.map(sanitize_component).filter(|c| !c.is_empty()) {
        name.push('-');
        name.push_str(&code);
    }
    Ok(name)
}

/// `<destination>/<name>.mp4`
pub fn output_path(destination: &Path, name: &str) -> PathBuf {
    destination.join(format!("{}.{}", name, OUTPUT_EXTENSION))
}

fn malformed(url: &str, reason: String) -> ArtedlError {
    ArtedlError::MalformedUrl {
        url: url.to_string(),
        reason,
    }
}
