//! Video manifest: decode the player JSON and pick one variant.
//!
//! Decoding is tolerant: the `videoJsonPlayer.VSR` object is read as a map of
//! variant records keyed by arbitrary strings, and records that do not look
//! like variants are dropped instead of failing the whole manifest. Which
//! record wins is decided by a [`SelectionPolicy`].

mod policy;

pub use policy::{ManifestKeyRule, SelectionPolicy, VariantRule, VersionCodeRule};

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ArtedlError;
use crate::fetch;

/// One encoding of the video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoVariant {
    pub id: String,
    pub quality: String,
    pub mime_type: String,
    pub bitrate: i64,
    pub media_type: String,
    pub version_code: String,
    pub version_libelle: String,
    pub url: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default, rename = "videoJsonPlayer")]
    player: Player,
}

#[derive(Debug, Default, Deserialize)]
struct Player {
    #[serde(default, rename = "VSR")]
    vsr: BTreeMap<String, serde_json::Value>,
}

/// Decoded manifest: variant records by manifest key, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoManifest {
    pub variants: BTreeMap<String, VideoVariant>,
}

impl VideoManifest {
    /// Decodes a manifest body. Fails only if the body is not a JSON object
    /// of the expected envelope; a missing `VSR` yields an empty manifest.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        let mut variants = BTreeMap::new();
        for (key, value) in envelope.player.vsr {
            match serde_json::from_value::<VideoVariant>(value) {
                Ok(variant) => {
                    variants.insert(key, variant);
                }
                Err(e) => tracing::debug!(key = %key, error = %e, "ignoring malformed variant"),
            }
        }
        Ok(Self { variants })
    }

    /// Distinct non-empty version codes present in the manifest, sorted.
    pub fn version_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .variants
            .values()
            .filter(|v| !v.version_code.is_empty())
            .map(|v| v.version_code.clone())
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }
}

/// The variant chosen for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVariant {
    /// Manifest key of the chosen record.
    pub key: String,
    pub url: String,
    /// Appended to the output name when present.
    pub version_code: Option<String>,
}

/// Fetches the manifest at `manifest_url` and applies `policy` to it.
pub fn resolve_manifest(
    manifest_url: &str,
    policy: &SelectionPolicy,
) -> Result<SelectedVariant, ArtedlError> {
    let body = fetch::fetch_bytes(manifest_url)?;
    let manifest = VideoManifest::from_json(&body).map_err(|source| {
        ArtedlError::ManifestDecode {
            url: manifest_url.to_string(),
            source,
        }
    })?;
    tracing::debug!(variants = manifest.variants.len(), "manifest decoded");
    policy.select(&manifest)
}
