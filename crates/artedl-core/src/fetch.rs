//! Blocking HTTP GET of a whole response body into memory.
//!
//! Used for the portal page and the manifest. No timeout and no retry;
//! libcurl defaults apply apart from redirect following.

use crate::error::ArtedlError;

/// GETs `url` and returns the full body, whatever its size or content type.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, ArtedlError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| ArtedlError::transport(url, e))?;
    easy.follow_location(true)
        .map_err(|e| ArtedlError::transport(url, e))?;
    easy.fail_on_error(true)
        .map_err(|e| ArtedlError::transport(url, e))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(|e| ArtedlError::transport(url, e))?;
        transfer
            .perform()
            .map_err(|e| ArtedlError::transport(url, e))?;
    }

    tracing::debug!(url, bytes = body.len(), "fetched");
    Ok(body)
}

/// GETs `url` and returns the body as text. Invalid UTF-8 is replaced, not rejected.
pub fn fetch_text(url: &str) -> Result<String, ArtedlError> {
    let body = fetch_bytes(url)?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}
