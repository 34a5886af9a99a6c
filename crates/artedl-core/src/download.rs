//! Single-stream GET of the chosen variant straight into the output file.
//!
//! The file is created (or truncated) when the first body bytes arrive, so a
//! request that fails before the response leaves nothing on disk. A transfer
//! that breaks mid-body leaves the partial file in place.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::ArtedlError;

/// Downloads `url` to `path`, overwriting any existing file. Returns bytes written.
pub fn download_to(path: &Path, url: &str) -> Result<u64, ArtedlError> {
    let mut file: Option<File> = None;
    let mut write_error: Option<io::Error> = None;
    let mut written: u64 = 0;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| ArtedlError::transport(url, e))?;
    easy.follow_location(true)
        .map_err(|e| ArtedlError::transport(url, e))?;
    easy.fail_on_error(true)
        .map_err(|e| ArtedlError::transport(url, e))?;

    let outcome = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                if file.is_none() {
                    match File::create(path) {
                        Ok(f) => file = Some(f),
                        Err(e) => {
                            write_error = Some(e);
                            return Ok(0); // abort transfer
                        }
                    }
                }
                let Some(out) = file.as_mut() else {
                    return Ok(0);
                };
                match out.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_error = Some(e);
                        Ok(0)
                    }
                }
            })
            .map_err(|e| ArtedlError::transport(url, e))?;
        transfer.perform()
    };

    if let Some(source) = write_error {
        return Err(ArtedlError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    if let Err(e) = outcome {
        if written > 0 {
            tracing::warn!(path = %path.display(), written, "transfer failed, partial file left");
        }
        return Err(ArtedlError::transport(url, e));
    }

    // Empty body: the callback never ran.
    let file = match file {
        Some(f) => f,
        None => File::create(path).map_err(|source| ArtedlError::Io {
            path: path.to_path_buf(),
            source,
        })?,
    };
    file.sync_all().map_err(|source| ArtedlError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = written, "download complete");
    Ok(written)
}
