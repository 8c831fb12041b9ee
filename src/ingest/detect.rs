use super::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Amount,
}

/// Where one snapshot field comes from in a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnMapping {
    pub(crate) key: &'static str,
    pub(crate) column: usize,
    pub(crate) kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CsvFormat {
    pub(crate) name: &'static str,
    pub(crate) source: SourceKind,
    pub(crate) columns: Vec<ColumnMapping>,
}

type FieldSpec = (&'static str, &'static [&'static str], FieldKind);

/// Snapshot key, accepted header names, kind.
const LEDGER_FIELDS: &[FieldSpec] = &[
    ("category_1", &["category_1"], FieldKind::Text),
    ("type", &["type"], FieldKind::Text),
    ("category_2", &["category_2"], FieldKind::Text),
    ("project", &["project"], FieldKind::Text),
    ("location", &["location"], FieldKind::Text),
    ("approved", &["approved"], FieldKind::Amount),
    ("increase", &["increase"], FieldKind::Amount),
    ("decrease", &["decrease"], FieldKind::Amount),
    ("committed", &["committed"], FieldKind::Amount),
    ("disbursed", &["disbursed"], FieldKind::Amount),
    ("remaining", &["remaining"], FieldKind::Amount),
];

const PUBLIC_WORKS_FIELDS: &[FieldSpec] = &[
    ("id", &["no", "id"], FieldKind::Text),
    ("name", &["project", "name"], FieldKind::Text),
    ("location", &["location"], FieldKind::Text),
    ("budget", &["budget"], FieldKind::Amount),
    ("decrease", &["decrease"], FieldKind::Amount),
    ("increase", &["increase"], FieldKind::Amount),
    ("disbursed", &["disbursement", "disbursed"], FieldKind::Amount),
    ("remaining", &["remaining"], FieldKind::Amount),
];

/// Recognize one of the two upstream CSV exports by its header row.
pub(crate) fn detect_csv_format(headers: &[String]) -> Option<CsvFormat> {
    let h: Vec<String> = headers
        .iter()
        .map(|s| s.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();

    if has(&h, "category_1") && has(&h, "approved") {
        return Some(build("Budget ledger", SourceKind::Ledger, LEDGER_FIELDS, &h));
    }

    if has(&h, "budget") && (has(&h, "disbursement") || has(&h, "disbursed")) {
        return Some(build(
            "Public works",
            SourceKind::PublicWorks,
            PUBLIC_WORKS_FIELDS,
            &h,
        ));
    }

    None
}

fn build(name: &'static str, source: SourceKind, fields: &[FieldSpec], h: &[String]) -> CsvFormat {
    let columns = fields
        .iter()
        .filter_map(|(key, aliases, kind)| {
            aliases
                .iter()
                .find_map(|alias| col_index(h, alias))
                .map(|column| ColumnMapping {
                    key: *key,
                    column,
                    kind: *kind,
                })
        })
        .collect();
    CsvFormat {
        name,
        source,
        columns,
    }
}

fn has(headers: &[String], name: &str) -> bool {
    col_index(headers, name).is_some()
}

fn col_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}
