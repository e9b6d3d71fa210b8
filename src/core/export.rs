//! Calendar and article export.
//!
//! Calendars are written as CSV (the primary export) or JSON, and either
//! form can be read back so articles can be generated in a later run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use serde_json::Value;

use super::article::Article;
use super::calendar::{calendar_from_value, CalendarEntry, CALENDAR_FIELDS};
use super::error::{PlanError, PlanResult};

/// Calendar export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Timestamped calendar file name: `blog_calendar_<YYYYMMDD>_<HHMMSS>.<ext>`.
pub fn calendar_file_name<Tz: TimeZone>(now: &DateTime<Tz>, format: ExportFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("blog_calendar_{}.{}", now.format("%Y%m%d_%H%M%S"), format.extension())
}

/// Render a calendar in the given format.
pub fn render_calendar(entries: &[CalendarEntry], format: ExportFormat) -> PlanResult<String> {
    match format {
        ExportFormat::Csv => Ok(calendar_to_csv(entries)),
        ExportFormat::Json => serde_json::to_string_pretty(entries)
            .map_err(|e| PlanError::Io(std::io::Error::other(e))),
    }
}

/// Render a calendar as CSV with a header row.
pub fn calendar_to_csv(entries: &[CalendarEntry]) -> String {
    let mut csv = CALENDAR_FIELDS.join(",");
    csv.push('\n');

    for entry in entries {
        let row: Vec<String> = CALENDAR_FIELDS
            .iter()
            .map(|name| escape_csv(entry.field(name).unwrap_or_default()))
            .collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split CSV text into records of fields.
fn parse_csv_records(text: &str) -> PlanResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(PlanError::Parse("unterminated quoted field in CSV".into()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

/// Read a calendar back from CSV produced by [`calendar_to_csv`].
///
/// Columns are matched by header name, so column order does not matter.
pub fn calendar_from_csv(text: &str) -> PlanResult<Vec<CalendarEntry>> {
    // Spreadsheet tools prepend a byte order mark when saving as UTF-8
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = parse_csv_records(text)?.into_iter();
    let header = records.next().ok_or_else(|| PlanError::Parse("empty CSV".into()))?;

    let rows: Vec<Value> = records
        .filter(|r| !(r.len() == 1 && r[0].is_empty()))
        .map(|record| {
            let object = header
                .iter()
                .zip(record)
                .map(|(name, value)| (name.trim().to_string(), Value::String(value)))
                .collect();
            Value::Object(object)
        })
        .collect();

    calendar_from_value(&Value::Array(rows))
}

/// Read a calendar from an exported CSV or JSON file.
pub fn load_calendar(path: &Path) -> PlanResult<Vec<CalendarEntry>> {
    let text = std::fs::read_to_string(path)?;
    match ExportFormat::from_path(path) {
        ExportFormat::Json => {
            let value: Value =
                serde_json::from_str(&text).map_err(|e| PlanError::Parse(e.to_string()))?;
            calendar_from_value(&value)
        }
        ExportFormat::Csv => calendar_from_csv(&text),
    }
}

/// Write the calendar into `dir` and return the file path.
pub fn write_calendar<Tz: TimeZone>(
    entries: &[CalendarEntry],
    dir: &Path,
    format: ExportFormat,
    now: &DateTime<Tz>,
) -> PlanResult<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    std::fs::create_dir_all(dir)?;
    let path = dir.join(calendar_file_name(now, format));
    std::fs::write(&path, render_calendar(entries, format)?)?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "calendar written");
    Ok(path)
}

/// Write an article as Markdown into `dir` and return the file path.
pub fn write_article(article: &Article, dir: &Path) -> PlanResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(article.file_name());
    std::fs::write(&path, article.to_markdown())?;
    tracing::debug!(path = %path.display(), index = article.index, "article written");
    Ok(path)
}

/// Render a calendar as a plain-text table for the terminal.
pub fn calendar_table(entries: &[CalendarEntry]) -> String {
    let date_width = entries.iter().map(|e| e.date.chars().count()).max().unwrap_or(4).max(4);
    let mut out = String::new();

    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<date_width$}  {}  [{}]\n",
            i + 1,
            entry.date,
            entry.title,
            entry.primary_keyword,
        ));
    }

    out
}
