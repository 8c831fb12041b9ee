use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{self, Config};
use crate::ingest::{self, ConvertOptions};
use crate::models::{NormalizedProject, ProjectStatus};
use crate::snapshot::{self, expand_home, Dataset, Loader, Snapshot, SnapshotSource};
use crate::summary::{status_counts, top_n, BudgetSummary, CategorySummary};
use crate::ui::listing::StatusFilter;
use crate::ui::util::{format_count, format_currency, format_number, format_percentage, truncate};

/// Upper bound on a CLI load; HTTP timeouts normally fire well before it.
const LOAD_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], config),
        "top" => cli_top(&args[2..], config),
        "projects" | "p" => cli_projects(&args[2..], config),
        "locations" => cli_locations(&args[2..], config),
        "export" => cli_export(&args[2..], config),
        "convert" => cli_convert(&args[2..]),
        "config" => cli_config(config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetdash {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("budgetdash - read-only budget transparency dashboard");
    println!();
    println!("Usage: budgetdash [command]");
    println!();
    println!("A [snapshot] is a file path, an http(s) URL, or one of the configured");
    println!("datasets: 'ledger' (default) or 'public-works'.");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  open <route>                  Launch the TUI on a route (/, /projects,");
    println!("                                /public-projects, /map?project=<id>, /reports)");
    println!("  summary [snapshot]            Totals, completion and per-category figures");
    println!("    --check                     Compare against the snapshot's embedded summary");
    println!("    --json                      Print the summary as JSON");
    println!("  top [snapshot]                Largest projects of one category");
    println!("    --category <name>           Category (default: featured_category)");
    println!("    -n <count>                  How many (default: top_projects)");
    println!("  projects [snapshot]           List projects");
    println!("    --status <status>           completed, outstanding, planned or in-progress");
    println!("    --search <text>             Match name, category or location");
    println!("  locations [snapshot]          Projects with map coordinates (default: both datasets)");
    println!("  export <out.csv> [snapshot]   Write normalized projects as CSV");
    println!("  convert <in.csv> [out.json]   Build a snapshot from an upstream CSV export");
    println!("    --date <date>               metadata.date (default: today)");
    println!("    --source <label>            metadata.source");
    println!("  config                        Show config path and effective settings");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument helpers ─────────────────────────────────────────

/// Value following `flag`, if present.
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor the value of one of `valued`.
pub(crate) fn positionals<'a>(args: &'a [String], valued: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
        } else if valued.contains(&arg.as_str()) {
            skip = true;
        } else if !arg.starts_with('-') {
            out.push(arg.as_str());
        }
    }
    out
}

/// Resolve a snapshot argument: a configured dataset name, else a path or URL.
pub(crate) fn resolve_source(arg: &str, config: &Config) -> SnapshotSource {
    match arg.to_lowercase().as_str() {
        "ledger" | "budget" => config.ledger_source(),
        "public-works" | "public" | "pw" | "eplan" => config.public_works_source(),
        _ => SnapshotSource::parse(arg),
    }
}

fn load_arg(arg: Option<&str>, config: &Config) -> Arc<Snapshot> {
    let source = arg.map_or_else(|| config.ledger_source(), |a| resolve_source(a, config));
    snapshot::load_or_empty(&source)
}

// ── summary ──────────────────────────────────────────────────

fn cli_summary(args: &[String], config: &Config) -> Result<()> {
    let snapshot = load_arg(positionals(args, &[]).first().copied(), config);
    let summary = &snapshot.summary;

    if has_flag(args, "--json") {
        let out = serde_json::to_string_pretty(summary).context("Failed to encode summary")?;
        println!("{out}");
    } else {
        print_summary(&snapshot, summary, config);
    }

    if has_flag(args, "--check") {
        println!();
        match &snapshot.upstream {
            None => println!("No embedded summary to check against"),
            Some(_) => {
                let found = snapshot.discrepancies();
                if found.is_empty() {
                    println!("Embedded summary matches the records");
                } else {
                    println!("Embedded summary disagrees with the records:");
                    let show = |v: Option<Decimal>| v.map_or_else(|| "missing".to_string(), format_number);
                    for d in &found {
                        println!(
                            "  {} {}: computed {}, reported {}",
                            d.scope,
                            d.field,
                            show(d.computed),
                            show(d.reported)
                        );
                    }
                    anyhow::bail!("{} discrepancies", found.len());
                }
            }
        }
    }
    Ok(())
}

fn print_summary(snapshot: &Snapshot, summary: &BudgetSummary, config: &Config) {
    let symbol = &config.currency_symbol;
    let totals = &summary.totals;
    let total = Some(totals.approved);
    let counts = status_counts(&snapshot.projects);

    println!(
        "budgetdash - FY {} - snapshot dated '{}'",
        config.fiscal_year, snapshot.metadata.date
    );
    println!("{}", "─".repeat(60));
    if snapshot.is_empty() {
        println!("  (no budget records)");
    }
    println!("  Approved:    {}", format_currency(totals.approved, symbol));
    println!(
        "  Disbursed:   {}  ({})",
        format_currency(totals.disbursed, symbol),
        format_percentage(Some(totals.disbursed), total)
    );
    println!("  Committed:   {}", format_currency(totals.committed, symbol));
    println!("  Remaining:   {}", format_currency(totals.remaining, symbol));
    println!("  Increase:    {}", format_currency(totals.increase, symbol));
    println!("  Decrease:    {}", format_currency(totals.decrease, symbol));
    println!(
        "  Projects:    {}  ({} completed, {} in progress, {} planned)",
        format_count(summary.record_count),
        format_count(counts.completed),
        format_count(counts.in_progress),
        format_count(counts.planned)
    );

    print_groups("By category", &summary.categories_by_approved(), totals.approved, symbol);
    print_groups("By type", &summary.types_by_approved(), totals.approved, symbol);
}

fn print_groups(title: &str, groups: &[(&str, &CategorySummary)], total: Decimal, symbol: &str) {
    if groups.is_empty() {
        return;
    }
    println!();
    println!("{title}:");
    for (name, group) in groups {
        println!(
            "  {:<36} {:>6} {:>22} {:>9}",
            truncate(name, 36),
            format_count(group.count),
            format_currency(group.amounts.approved, symbol),
            format_percentage(Some(group.amounts.approved), Some(total))
        );
    }
}

// ── top ──────────────────────────────────────────────────────

fn cli_top(args: &[String], config: &Config) -> Result<()> {
    let valued = ["--category", "-n"];
    let snapshot = load_arg(positionals(args, &valued).first().copied(), config);
    let category = flag_value(args, "--category").unwrap_or(config.featured_category.as_str());
    let n = match flag_value(args, "-n") {
        Some(v) => v
            .parse::<usize>()
            .with_context(|| format!("Invalid count: {v}"))?,
        None => config.top_projects,
    };

    let top = top_n(&snapshot.projects, category, n);
    if top.is_empty() {
        println!("No projects in category '{category}'");
        return Ok(());
    }
    println!("Top {} in '{category}'", top.len());
    println!("{}", "─".repeat(60));
    for (i, p) in top.iter().enumerate() {
        println!(
            "{:>3}. {:<44} {:>20}  {}",
            i + 1,
            truncate(&p.name, 44),
            format_currency(p.budget, &config.currency_symbol),
            p.status
        );
    }
    Ok(())
}

// ── projects / locations ─────────────────────────────────────

/// Status argument: one of the three exact statuses, else a tab filter
/// (`all`, `outstanding`).
pub(crate) fn status_matches(arg: &str, project: &NormalizedProject) -> Option<bool> {
    if let Some(status) = ProjectStatus::parse(arg) {
        return Some(project.status == status);
    }
    StatusFilter::parse(arg).map(|filter| filter.accepts(project))
}

fn cli_projects(args: &[String], config: &Config) -> Result<()> {
    let valued = ["--status", "--search"];
    let snapshot = load_arg(positionals(args, &valued).first().copied(), config);
    let status = flag_value(args, "--status");
    let query = flag_value(args, "--search").unwrap_or("");

    let mut shown = 0;
    for p in &snapshot.projects {
        if let Some(status) = status {
            match status_matches(status, p) {
                Some(true) => {}
                Some(false) => continue,
                None => anyhow::bail!(
                    "Unknown status '{status}' (completed, outstanding, planned, in-progress)"
                ),
            }
        }
        if !p.matches(query) {
            continue;
        }
        print_project_line(p, config);
        shown += 1;
    }
    println!("{} of {} projects", format_count(shown), format_count(snapshot.projects.len()));
    Ok(())
}

fn print_project_line(p: &NormalizedProject, config: &Config) {
    println!(
        "{:>6}  {:<44} {:<20} {:>20}  {}",
        p.id,
        truncate(&p.name, 44),
        truncate(p.location_label(), 20),
        format_currency(p.budget, &config.currency_symbol),
        p.status
    );
}

/// Load both configured datasets side by side, public works first.
fn load_both(config: &Config) -> Vec<(String, Arc<Snapshot>)> {
    let mut loader = Loader::new();
    let order = [Dataset::PublicWorks, Dataset::Ledger];
    for dataset in order {
        let source = match dataset {
            Dataset::Ledger => config.ledger_source(),
            Dataset::PublicWorks => config.public_works_source(),
        };
        loader.request(dataset, source);
    }

    let mut loaded: Vec<(Dataset, Arc<Snapshot>)> = Vec::new();
    while loaded.len() < order.len() {
        let Some(outcome) = loader.wait(LOAD_TIMEOUT) else {
            tracing::error!("Timed out waiting for snapshots");
            break;
        };
        let snapshot = match outcome.result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("{e}");
                Snapshot::empty()
            }
        };
        loaded.push((outcome.dataset, Arc::new(snapshot)));
    }

    order
        .iter()
        .map(|d| {
            let snapshot = loaded
                .iter()
                .find(|(loaded, _)| loaded == d)
                .map_or_else(|| Arc::new(Snapshot::empty()), |(_, s)| Arc::clone(s));
            (d.to_string(), snapshot)
        })
        .collect()
}

fn cli_locations(args: &[String], config: &Config) -> Result<()> {
    let snapshots: Vec<(String, Arc<Snapshot>)> = match positionals(args, &[]).first().copied() {
        Some(arg) => vec![(arg.to_string(), load_arg(Some(arg), config))],
        None => load_both(config),
    };

    for (label, snapshot) in &snapshots {
        let mapped: Vec<&NormalizedProject> = snapshot.mapped_projects().collect();
        println!("{label}: {} mapped of {}", mapped.len(), snapshot.projects.len());
        for p in mapped {
            if let Some(c) = p.coordinate {
                println!(
                    "  {:>6}  {:>10.5} {:>10.5}  {}",
                    p.id,
                    c.lat,
                    c.lng,
                    truncate(&p.name, 50)
                );
            }
        }
    }
    Ok(())
}

// ── export ───────────────────────────────────────────────────

pub(crate) fn write_projects_csv<W: Write>(writer: W, projects: &[NormalizedProject]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "id", "name", "category", "status", "budget", "disbursed", "committed", "remaining",
        "increase", "decrease", "location", "lat", "lng",
    ])?;
    for p in projects {
        let (lat, lng) = p
            .coordinate
            .map(|c| (c.lat.to_string(), c.lng.to_string()))
            .unwrap_or_default();
        wtr.write_record([
            p.id.clone(),
            p.name.clone(),
            p.category.clone(),
            p.status.to_string(),
            p.budget.to_string(),
            p.disbursed.to_string(),
            p.committed.to_string(),
            p.remaining.to_string(),
            p.increase.to_string(),
            p.decrease.to_string(),
            p.location.clone().unwrap_or_default(),
            lat,
            lng,
        ])?;
    }
    wtr.flush()?;
    Ok(projects.len())
}

fn cli_export(args: &[String], config: &Config) -> Result<()> {
    let positional = positionals(args, &[]);
    let Some(output) = positional.first() else {
        anyhow::bail!("Usage: budgetdash export <out.csv> [snapshot]");
    };
    let snapshot = load_arg(positional.get(1).copied(), config);
    let path = expand_home(output);

    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_projects_csv(file, &snapshot.projects)?;
    println!("Exported {count} projects to {}", path.display());
    Ok(())
}

// ── convert ──────────────────────────────────────────────────

fn cli_convert(args: &[String]) -> Result<()> {
    let valued = ["--date", "--source"];
    let positional = positionals(args, &valued);
    let Some(input) = positional.first() else {
        anyhow::bail!("Usage: budgetdash convert <in.csv> [out.json] [--date <d>] [--source <s>]");
    };
    let input = expand_home(input);
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let mut options = ConvertOptions::default();
    if let Some(date) = flag_value(args, "--date") {
        options.date = date.to_string();
    }
    options.source_label = flag_value(args, "--source").map(str::to_string);

    let report = ingest::convert_csv(&input, &options)?;
    let json = serde_json::to_string_pretty(&report.document).context("Failed to encode snapshot")?;

    match positional.get(1) {
        Some(out) => {
            let out = expand_home(out);
            write_new_file(&out, &json)?;
            println!(
                "Wrote {} {} rows to {}",
                report.rows,
                report.format,
                out.display()
            );
        }
        None => println!("{json}"),
    }
    if report.coerced > 0 {
        eprintln!("Warning: {} amount cells could not be read and were written as 0", report.coerced);
    }
    Ok(())
}

/// Snapshots are never rewritten in place.
fn write_new_file(path: &Path, contents: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Refusing to overwrite or failed to create {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ── config ───────────────────────────────────────────────────

fn cli_config(config: &Config) -> Result<()> {
    match config::config_path() {
        Ok(path) => {
            let state = if path.exists() { "" } else { " (not present, using defaults)" };
            println!("# {}{state}", path.display());
        }
        Err(e) => println!("# {e}"),
    }
    print!("{}", config.to_toml());
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
