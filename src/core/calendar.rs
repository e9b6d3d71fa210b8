//! Publishing calendar types, response parsing and auditing.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config as NucleoConfig, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{PlanError, PlanResult};
use super::inputs::Inputs;

/// Date format used in prompts and expected back from the model.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields every calendar entry must carry, in export column order.
pub const CALENDAR_FIELDS: [&str; 4] = ["date", "title", "primary_keyword", "description"];

/// A single planned blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Target publishing date, as returned by the model
    pub date: String,

    /// Blog post title
    pub title: String,

    /// Primary keyword the post targets
    pub primary_keyword: String,

    /// Short description of the post
    pub description: String,
}

impl CalendarEntry {
    /// The publishing date, if it is a `YYYY-MM-DD` date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    /// Field value by export column name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "date" => Some(&self.date),
            "title" => Some(&self.title),
            "primary_keyword" => Some(&self.primary_keyword),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

/// Parameters of a calendar synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRequest {
    pub start_date: NaiveDate,
    pub duration_months: u32,
    pub posts_per_week: u32,
}

impl CalendarRequest {
    /// Accepted calendar lengths, in months.
    pub const MONTHS: std::ops::RangeInclusive<u32> = 1..=12;

    /// Accepted posting frequencies, in posts per week.
    pub const POSTS_PER_WEEK: std::ops::RangeInclusive<u32> = 1..=7;

    /// Create a validated request.
    pub fn new(start_date: NaiveDate, duration_months: u32, posts_per_week: u32) -> PlanResult<Self> {
        if !Self::MONTHS.contains(&duration_months) {
            return Err(PlanError::InvalidRequest(format!(
                "duration must be between 1 and 12 months, got {duration_months}"
            )));
        }
        if !Self::POSTS_PER_WEEK.contains(&posts_per_week) {
            return Err(PlanError::InvalidRequest(format!(
                "posts per week must be between 1 and 7, got {posts_per_week}"
            )));
        }
        Ok(Self { start_date, duration_months, posts_per_week })
    }

    /// Start date formatted for prompts.
    pub fn start(&self) -> String {
        self.start_date.format(DATE_FORMAT).to_string()
    }
}

/// The next Monday on or after `today`.
pub fn next_monday(today: NaiveDate) -> NaiveDate {
    let offset = (7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(i64::from(offset))
}

/// Slice out the JSON array embedded in a free-text model reply.
///
/// Takes everything from the first `[` to the last `]`, inclusive.
pub fn extract_json_array(text: &str) -> PlanResult<&str> {
    let start = text.find('[').ok_or_else(|| PlanError::Parse("no '[' in response".into()))?;
    let end = text.rfind(']').ok_or_else(|| PlanError::Parse("no ']' in response".into()))?;

    if end < start {
        return Err(PlanError::Parse("']' appears before '['".into()));
    }

    Ok(&text[start..=end])
}

/// Parse a calendar out of a model reply.
pub fn parse_calendar_response(text: &str) -> PlanResult<Vec<CalendarEntry>> {
    let json = extract_json_array(text)?;
    let value: Value = serde_json::from_str(json).map_err(|e| PlanError::Parse(e.to_string()))?;
    calendar_from_value(&value)
}

/// Check a parsed JSON value against the calendar shape.
pub fn calendar_from_value(value: &Value) -> PlanResult<Vec<CalendarEntry>> {
    let items = value.as_array().ok_or_else(|| PlanError::Parse("expected a JSON array".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or_else(|| PlanError::Validation {
                index,
                field: "*".to_string(),
                reason: "entry is not an object".to_string(),
            })?;

            let field = |name: &str| -> PlanResult<String> {
                match object.get(name) {
                    Some(Value::String(s)) => Ok(s.clone()),
                    Some(other) => Err(PlanError::Validation {
                        index,
                        field: name.to_string(),
                        reason: format!("expected a string, found {}", json_kind(other)),
                    }),
                    None => Err(PlanError::Validation {
                        index,
                        field: name.to_string(),
                        reason: "missing".to_string(),
                    }),
                }
            };

            Ok(CalendarEntry {
                date: field("date")?,
                title: field("title")?,
                primary_keyword: field("primary_keyword")?,
                description: field("description")?,
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A model-quality signal about one calendar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditFinding {
    /// Primary keyword is not part of the supplied keyword set.
    OffSetKeyword { index: usize, keyword: String },
    /// Publishing date falls before the requested start date.
    BeforeStart { index: usize, date: NaiveDate },
    /// Publishing date is on a weekend.
    Weekend { index: usize, date: NaiveDate },
    /// Publishing date is not `YYYY-MM-DD`.
    UnparseableDate { index: usize, date: String },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffSetKeyword { index, keyword } => {
                write!(f, "Topic {}: keyword '{}' is not in the keyword list", index + 1, keyword)
            }
            Self::BeforeStart { index, date } => {
                write!(f, "Topic {}: date {} is before the start date", index + 1, date)
            }
            Self::Weekend { index, date } => {
                write!(f, "Topic {}: date {} falls on a weekend", index + 1, date)
            }
            Self::UnparseableDate { index, date } => {
                write!(f, "Topic {}: date '{}' is not YYYY-MM-DD", index + 1, date)
            }
        }
    }
}

/// Inspect a calendar for entries that drift from the request.
///
/// Findings are advisory; the calendar is used as-is either way.
pub fn audit_calendar(
    entries: &[CalendarEntry],
    inputs: &Inputs,
    request: &CalendarRequest,
) -> Vec<AuditFinding> {
    let mut findings = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        if !inputs.has_keyword(&entry.primary_keyword) {
            findings.push(AuditFinding::OffSetKeyword {
                index,
                keyword: entry.primary_keyword.clone(),
            });
        }

        match entry.parsed_date() {
            Some(date) => {
                if date < request.start_date {
                    findings.push(AuditFinding::BeforeStart { index, date });
                }
                if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                    findings.push(AuditFinding::Weekend { index, date });
                }
            }
            None => findings.push(AuditFinding::UnparseableDate { index, date: entry.date.clone() }),
        }
    }

    findings
}

/// Find the calendar entry whose title best matches `query`.
pub fn find_topic(entries: &[CalendarEntry], query: &str) -> Option<usize> {
    if query.trim().is_empty() {
        return None;
    }

    let mut matcher = Matcher::new(NucleoConfig::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

    let mut best: Option<(usize, u32)> = None;
    for (index, entry) in entries.iter().enumerate() {
        let mut buf = vec![];
        let haystack = Utf32Str::new(&entry.title, &mut buf);
        if let Some(score) = pattern.score(haystack, &mut matcher) {
            // Ties keep the earliest entry
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }
    }

    best.map(|(index, _)| index)
}
