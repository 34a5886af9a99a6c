//! Error type shared by every pipeline step.

use std::path::PathBuf;

/// Failure of one pipeline step. Every variant is terminal for the run.
#[derive(Debug, thiserror::Error)]
pub enum ArtedlError {
    /// Required input missing (e.g. no `--url`).
    #[error("configuration: {0}")]
    Config(String),

    /// HTTP GET failed: connection, read, or non-2xx status.
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// No script node on the page carried a manifest reference.
    #[error("missing script node with manifest reference")]
    NotFound,

    /// Manifest decoded but no variant satisfied the selection policy.
    #[error("no variant matches the selection policy (version codes present: {seen:?})")]
    NoMatch { seen: Vec<String> },

    /// Manifest body is not the expected JSON envelope.
    #[error("manifest {url} could not be decoded: {source}")]
    ManifestDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Source URL lacks the path segments the output name is built from.
    #[error("malformed source url {url}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// Local file creation or write failure.
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtedlError {
    /// Process exit code for this failure; distinct per kind, never 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArtedlError::Config(_) => 2,
            ArtedlError::Transport { .. } => 3,
            ArtedlError::NotFound => 4,
            ArtedlError::NoMatch { .. } => 5,
            ArtedlError::ManifestDecode { .. } => 6,
            ArtedlError::MalformedUrl { .. } => 7,
            ArtedlError::Io { .. } => 8,
        }
    }

    pub(crate) fn transport(url: &str, source: curl::Error) -> Self {
        ArtedlError::Transport {
            url: url.to_string(),
            source,
        }
    }
}
