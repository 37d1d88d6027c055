//! Offline check of a company file: loads it the same way the page does and
//! prints what the table and map would show.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use companymap_core::{LoadSummary, PageSession, SourceFile, TableView, ViewerConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Load a company CSV/XLSX file and report what the map page would show")]
struct Cli {
    /// CSV, XLSX or XLSM file to load
    file: PathBuf,

    /// Restrict the view to rows where COLUMN equals VALUE (repeatable, all must match)
    #[arg(short, long = "filter", value_name = "COLUMN=VALUE", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Only show these columns in marker popups (repeatable; default is every column)
    #[arg(short, long = "popup", value_name = "COLUMN")]
    popup: Vec<String>,

    /// Viewer configuration (map and coordinate column names)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the first N rows of the filtered table
    #[arg(long, value_name = "N", default_value_t = 0)]
    preview: usize,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_filter(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((column, value)) if !column.is_empty() => Ok((column.to_string(), value.to_string())),
        _ => Err(format!("expected COLUMN=VALUE, got '{arg}'")),
    }
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    summary: &'a LoadSummary,
    headers: &'a [String],
    filters: &'a [(String, String)],
    popup_columns: Vec<&'a str>,
    view_rows: usize,
    view_markers: usize,
    view_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<TableView>,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig, String> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    toml::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = load_config(cli.config.as_deref())?;
    let bytes = std::fs::read(&cli.file).map_err(|e| format!("{}: {e}", cli.file.display()))?;
    let name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let (session, summary) = inspect(cli, config, SourceFile::new(name, bytes))?;
    let report = build_report(cli, &session, &summary);

    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Load `file` and apply the popup and filter options, as the page would.
fn inspect(
    cli: &Cli,
    config: ViewerConfig,
    file: SourceFile,
) -> Result<(PageSession, LoadSummary), String> {
    let mut session = PageSession::new(config.coordinates);
    let summary = session
        .load(Some(&file))
        .map_err(|e| format!("{}: {e}", file.name))?
        .ok_or("nothing loaded")?;

    if !cli.popup.is_empty() {
        for column in &cli.popup {
            if !session.headers().contains(column) {
                tracing::warn!(column = %column, "Unknown popup column ignored");
            }
        }
        session.set_popup_selection(&cli.popup);
    }

    for (column, value) in &cli.filters {
        let id = session.add_filter().ok_or("file has no columns to filter on")?;
        if !session.set_filter_column(id, column) {
            return Err(format!("unknown filter column '{column}'"));
        }
        session.set_filter_value(id, Some(value.clone()));
    }
    session.apply_filters();
    Ok((session, summary))
}

fn build_report<'a>(cli: &'a Cli, session: &'a PageSession, summary: &'a LoadSummary) -> Report<'a> {
    Report {
        summary,
        headers: session.headers().as_slice(),
        filters: &cli.filters,
        popup_columns: session.popup_columns().iter().collect(),
        view_rows: session.view_len(),
        view_markers: session.markers().len(),
        view_skipped: session.markers().skipped,
        preview: (cli.preview > 0).then(|| session.table().head(cli.preview)),
    }
}

fn print_report(report: &Report<'_>) {
    let summary = report.summary;
    println!(
        "{} ({}): {} rows, {} columns",
        summary.source, summary.kind, summary.rows, summary.columns
    );
    println!("columns: {}", report.headers.join(", "));
    if !report.filters.is_empty() {
        let filters: Vec<String> = report.filters.iter().map(|(c, v)| format!("{c}={v}")).collect();
        println!("filters: {}", filters.join(" AND "));
    }
    println!("view: {} of {} rows", report.view_rows, summary.rows);
    println!(
        "markers: {} ({} rows without coordinates)",
        report.view_markers, report.view_skipped
    );
    println!("popup: {}", report.popup_columns.join(", "));

    if let Some(table) = &report.preview {
        println!();
        println!("{}", table.preview(table.row_count()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPANIES: &str = "\
name,city,lat,lng
Acme,Milano,45.46,9.19
Beta,Roma,,
Gamma,Milano,45.07,7.68
Delta,Milano,45.07,7.69
";

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["companymap-validate", "companies.csv"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn report_json(cli: &Cli) -> serde_json::Value {
        let file = SourceFile::new("companies.csv", COMPANIES.as_bytes().to_vec());
        let (session, summary) = inspect(cli, ViewerConfig::default(), file).unwrap();
        serde_json::to_value(build_report(cli, &session, &summary)).unwrap()
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("a=b"), Ok(("a".to_string(), "b".to_string())));
        assert_eq!(parse_filter("a="), Ok(("a".to_string(), String::new())));
        assert_eq!(parse_filter("a=b=c"), Ok(("a".to_string(), "b=c".to_string())));
        assert!(parse_filter("=b").is_err());
        assert!(parse_filter("a").is_err());
    }

    #[test]
    fn test_json_preview_is_truncated() {
        let json = report_json(&cli(&["--json", "--preview", "2", "-f", "city=Milano"]));
        assert_eq!(json["view_rows"], 3);
        let rows = json["preview"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Acme");
        assert_eq!(json["preview"]["headers"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_no_preview_by_default() {
        let json = report_json(&cli(&["--json"]));
        assert!(json.get("preview").is_none());
        assert_eq!(json["view_markers"], 3);
        assert_eq!(json["view_skipped"], 1);
        assert_eq!(json["rows"], 4);
    }

    #[test]
    fn test_popup_option_keeps_only_named_columns() {
        let json = report_json(&cli(&["-p", "lng", "-p", "name"]));
        assert_eq!(json["popup_columns"], serde_json::json!(["name", "lng"]));
    }

    #[test]
    fn test_unknown_filter_column_is_an_error() {
        let file = SourceFile::new("companies.csv", COMPANIES.as_bytes().to_vec());
        let result = inspect(&cli(&["-f", "ghost=1"]), ViewerConfig::default(), file);
        assert!(result.is_err_and(|e| e.contains("ghost")));
    }
}
