use std::path::PathBuf;

/// Why a snapshot could not be loaded. Every variant is handled the same
/// way at the load site: log it and show an empty dataset.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to fetch snapshot {url}: {source}")]
    Fetch {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Snapshot {origin} is not valid: {reason}")]
    Parse { origin: String, reason: String },
}
