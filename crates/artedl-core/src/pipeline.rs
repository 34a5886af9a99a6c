//! The full run: page → manifest URL → variant → output file.

use std::path::PathBuf;

use crate::config::RunConfig;
use crate::download;
use crate::error::ArtedlError;
use crate::fetch;
use crate::locate;
use crate::manifest::{self, SelectionPolicy};
use crate::output;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub manifest_url: String,
    pub variant_url: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Runs every step once, in order. Nothing is written unless a variant was
/// selected and the output name could be derived.
pub fn run(cfg: &RunConfig, policy: &SelectionPolicy) -> Result<RunReport, ArtedlError> {
    debug_value(cfg, "URL", &cfg.source_url);

    let page = fetch::fetch_text(&cfg.source_url)?;
    let manifest_url = locate::locate_manifest_url(&page)?;
    debug_value(cfg, "JSON url", &manifest_url);

    let selected = manifest::resolve_manifest(&manifest_url, policy)?;
    debug_value(cfg, "MPG url", &selected.url);

    let name = output::derive_output_name(&cfg.source_url, selected.version_code.as_deref())?;
    let path = output::output_path(&cfg.destination, &name);
    debug_value(cfg, "DEST", &path.display().to_string());

    let bytes = download::download_to(&path, &selected.url)?;

    Ok(RunReport {
        manifest_url,
        variant_url: selected.url,
        path,
        bytes,
    })
}

fn debug_value(cfg: &RunConfig, label: &str, value: &str) {
    tracing::debug!("{}: {}", label, value);
    if cfg.debug {
        println!("{} : {}", label, value);
    }
}
