use std::io::Read;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use url::Url;

use super::SnapshotError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Largest snapshot body accepted over HTTP.
const MAX_SNAPSHOT_BYTES: u64 = 64 * 1024 * 1024;

/// Where a snapshot comes from: a local file or an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SnapshotSource {
    File(PathBuf),
    Url(Url),
}

impl SnapshotSource {
    /// Anything that parses as an `http`/`https` URL is fetched; everything
    /// else is a path, with a leading `~/` expanded.
    pub(crate) fn parse(s: &str) -> Self {
        let s = s.trim();
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(expand_home(s)),
        }
    }

    pub(crate) fn read_to_string(&self) -> Result<String, SnapshotError> {
        match self {
            Self::File(path) => std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
                path: path.clone(),
                source,
            }),
            Self::Url(url) => fetch(url),
        }
    }
}

impl std::fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

pub(crate) fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(rest)
        }
        None => PathBuf::from(path),
    }
}

fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build()
    })
}

fn fetch(url: &Url) -> Result<String, SnapshotError> {
    let fetch_err = |source: Box<dyn std::error::Error + Send + Sync>| SnapshotError::Fetch {
        url: url.to_string(),
        source,
    };

    tracing::debug!("GET {url}");
    let response = agent()
        .get(url.as_str())
        .call()
        .map_err(|e| fetch_err(Box::new(e)))?;

    let mut body = String::new();
    response
        .into_reader()
        .take(MAX_SNAPSHOT_BYTES + 1)
        .read_to_string(&mut body)
        .map_err(|e| fetch_err(Box::new(e)))?;
    if body.len() as u64 > MAX_SNAPSHOT_BYTES {
        return Err(fetch_err(
            format!("response exceeded {MAX_SNAPSHOT_BYTES} bytes").into(),
        ));
    }
    Ok(body)
}
