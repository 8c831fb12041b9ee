mod error;
mod loader;
mod source;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::ingest::{self, lenient};
use crate::models::{BudgetRecord, NormalizedProject};
use crate::summary::{check_upstream, summarize, BudgetSummary, Discrepancy, UpstreamSummary};

pub(crate) use error::SnapshotError;
pub(crate) use loader::{Dataset, LoadOutcome, Loader};
pub(crate) use source::{expand_home, SnapshotSource};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct SnapshotMetadata {
    /// Free-form; upstream writes both `2025-03-31` and Thai short dates.
    pub(crate) date: String,
    pub(crate) source: Option<String>,
    pub(crate) total_projects: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    pub(crate) metadata: SnapshotMetadata,
    /// The exporter's own pre-aggregated figures, when the file has them.
    pub(crate) upstream: Option<UpstreamSummary>,
    pub(crate) records: Vec<BudgetRecord>,
    pub(crate) projects: Vec<NormalizedProject>,
    pub(crate) summary: BudgetSummary,
}

impl Snapshot {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_json_str(text: &str, origin: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text).map_err(|e| SnapshotError::Parse {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_value(&value, origin)
    }

    /// Build from an already-parsed document. Only a non-object root is an
    /// error; a missing `budget_data` reads as no records.
    pub(crate) fn from_value(value: &Value, origin: &str) -> Result<Self, SnapshotError> {
        let Some(root) = value.as_object() else {
            return Err(SnapshotError::Parse {
                origin: origin.to_string(),
                reason: "top level is not a JSON object".into(),
            });
        };

        let metadata = root
            .get("metadata")
            .and_then(Value::as_object)
            .map(|m| SnapshotMetadata {
                date: lenient::text_field(m, "date").unwrap_or_default(),
                source: lenient::text_field(m, "source"),
                total_projects: m
                    .get("total_projects")
                    .and_then(Value::as_u64)
                    .and_then(|n| usize::try_from(n).ok()),
            })
            .unwrap_or_default();

        let rows: &[Value] = match root.get("budget_data") {
            Some(Value::Array(rows)) => rows,
            Some(Value::Null) | None => &[],
            Some(_) => {
                return Err(SnapshotError::Parse {
                    origin: origin.to_string(),
                    reason: "budget_data is not an array".into(),
                })
            }
        };

        let (records, projects) = ingest::adapt_all(rows);
        let summary = summarize(&records);
        let upstream = root
            .get("summary")
            .filter(|v| v.is_object())
            .map(UpstreamSummary::from_value);

        Ok(Self {
            metadata,
            upstream,
            records,
            projects,
            summary,
        })
    }

    /// Figures in the embedded summary that disagree with the records.
    /// Empty when the snapshot carries no summary.
    pub(crate) fn discrepancies(&self) -> Vec<Discrepancy> {
        self.upstream
            .as_ref()
            .map(|upstream| check_upstream(&self.records, &self.summary, upstream))
            .unwrap_or_default()
    }

    pub(crate) fn find_project(&self, id: &str) -> Option<&NormalizedProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub(crate) fn mapped_projects(&self) -> impl Iterator<Item = &NormalizedProject> {
        self.projects.iter().filter(|p| p.has_location())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read, parse and cross-check one snapshot.
pub(crate) fn load(source: &SnapshotSource) -> Result<Snapshot, SnapshotError> {
    let text = source.read_to_string()?;
    let origin = source.to_string();
    let snapshot = Snapshot::from_json_str(&text, &origin)?;

    tracing::info!(
        "Loaded {} records from {} (dated '{}')",
        snapshot.records.len(),
        origin,
        snapshot.metadata.date
    );
    if let Some(declared) = snapshot.metadata.total_projects {
        if declared != snapshot.records.len() {
            tracing::warn!(
                "{origin}: metadata declares {declared} projects, found {}",
                snapshot.records.len()
            );
        }
    }
    for discrepancy in snapshot.discrepancies() {
        tracing::warn!("{origin}: summary mismatch: {discrepancy}");
    }
    Ok(snapshot)
}

/// Load for display: any failure is logged and yields an empty snapshot, so
/// views render zeros instead of aborting.
pub(crate) fn load_or_empty(source: &SnapshotSource) -> Arc<Snapshot> {
    match load(source) {
        Ok(snapshot) => Arc::new(snapshot),
        Err(e) => {
            tracing::error!("{e}");
            Arc::new(Snapshot::empty())
        }
    }
}
