//! Core types and functionality for BloggerAI.
//!
//! This module contains the planning pipeline: input loading, calendar and
//! article generation, the session that holds their results, export, and
//! configuration.

mod article;
mod calendar;
mod config;
mod error;
mod export;
mod inputs;
mod pipeline;
mod prompts;
mod session;

pub use article::Article;
pub use calendar::{
    audit_calendar, calendar_from_value, extract_json_array, find_topic, next_monday,
    parse_calendar_response, AuditFinding, CalendarEntry, CalendarRequest, CALENDAR_FIELDS,
    DATE_FORMAT,
};
pub use config::{
    AiConfig, ArticleConfig, CalendarConfig, Config, GeneralConfig, OllamaConfig,
    LOCAL_CONFIG_FILE,
};
pub use error::{Artifact, PlanError, PlanResult};
pub use export::{
    calendar_file_name, calendar_from_csv, calendar_table, calendar_to_csv, load_calendar,
    render_calendar, write_article, write_calendar, ExportFormat,
};
pub use inputs::{
    parse_icp, parse_keywords, parse_seo_insights, InputLoader, Inputs, ALL_KEYWORDS_FIELD,
};
pub use pipeline::Pipeline;
pub use prompts::{article_prompt, calendar_prompt};
pub use session::{Notice, NoticeLevel, Session};
