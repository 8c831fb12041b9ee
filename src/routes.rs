use url::Url;

use crate::snapshot::Dataset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Route {
    /// `/`
    Overview,
    /// `/projects` lists the ledger, `/public-projects` the public works.
    Projects(Dataset),
    /// `/map`, optionally `?project=<id>` to focus one marker.
    Map { project: Option<String> },
    /// `/reports`
    Reports,
    /// Anything else; holds the path as typed.
    NotFound(String),
}

impl Route {
    pub(crate) fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::Overview;
        }
        let joined = Url::parse("http://localhost/").and_then(|base| base.join(input));
        let Ok(url) = joined else {
            return Self::NotFound(input.to_string());
        };
        if url.host_str() != Some("localhost") {
            return Self::NotFound(input.to_string());
        }

        let path = url.path().trim_end_matches('/').to_lowercase();
        match path.as_str() {
            "" => Self::Overview,
            "/projects" => Self::Projects(Dataset::Ledger),
            "/public-projects" => Self::Projects(Dataset::PublicWorks),
            "/map" => Self::Map {
                project: url
                    .query_pairs()
                    .find(|(key, _)| key == "project")
                    .map(|(_, value)| value.trim().to_string())
                    .filter(|value| !value.is_empty()),
            },
            "/reports" => Self::Reports,
            _ => Self::NotFound(input.to_string()),
        }
    }

    pub(crate) fn to_path(&self) -> String {
        match self {
            Self::Overview => "/".into(),
            Self::Projects(Dataset::Ledger) => "/projects".into(),
            Self::Projects(Dataset::PublicWorks) => "/public-projects".into(),
            Self::Map { project: None } => "/map".into(),
            Self::Map { project: Some(id) } => {
                let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
                format!("/map?project={encoded}")
            }
            Self::Reports => "/reports".into(),
            Self::NotFound(path) => path.clone(),
        }
    }

    pub(crate) fn known() -> &'static [&'static str] {
        &["/", "/projects", "/public-projects", "/map", "/reports"]
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod routes_tests;
