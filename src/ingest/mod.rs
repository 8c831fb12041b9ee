mod convert;
mod detect;
pub(crate) mod lenient;
mod raw;

use serde_json::Value;

use crate::models::{BudgetRecord, NormalizedProject};

pub(crate) use convert::{convert_csv, ConvertOptions};
use raw::RawRecord;
use raw::SourceKind;
pub(crate) use raw::PUBLIC_WORKS_CATEGORY;

/// Adapt one `budget_data` entry. `position` is its index in the array and
/// becomes the project id when the source supplies none.
pub(crate) fn adapt(value: &Value, position: usize) -> Option<(BudgetRecord, NormalizedProject)> {
    let record = RawRecord::from_value(value)?.into_record();
    let project = NormalizedProject::from_record(&record, position);
    Some((record, project))
}

/// Adapt a whole `budget_data` array. Entries that are not objects are
/// skipped; positions still count them, so ids match the source array.
pub(crate) fn adapt_all(rows: &[Value]) -> (Vec<BudgetRecord>, Vec<NormalizedProject>) {
    let mut records = Vec::with_capacity(rows.len());
    let mut projects = Vec::with_capacity(rows.len());
    for (position, value) in rows.iter().enumerate() {
        match adapt(value, position) {
            Some((record, project)) => {
                records.push(record);
                projects.push(project);
            }
            None => tracing::warn!("Skipping budget_data[{position}]: not an object"),
        }
    }
    (records, projects)
}
