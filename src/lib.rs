//! # BloggerAI
//!
//! Content-planning assistant for your blog - turn keywords, SEO notes and a
//! customer profile into a publishing calendar and full articles.
//!
//! BloggerAI asks a generative model for a multi-week calendar of blog topics,
//! then expands any topic you pick into a long-form Markdown article.
//!
//! ## Features
//!
//! - **Calendar Planning**: Dated topics with a primary keyword and summary each
//! - **Article Drafting**: One Markdown post per topic, on demand and in any order
//! - **Topic Search**: Pick topics by number or fuzzy title match (powered by nucleo)
//! - **Multiple Providers**: Gemini, OpenAI, Claude, or a local Ollama model
//! - **Export**: Calendars as CSV or JSON, articles as Markdown files
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install bloggerai
//!
//! # Plan six months of posts, two per week
//! blog calendar --keywords keywords.json --seo seo.txt --icp icp.json
//!
//! # Write the third post from the exported calendar
//! blog article 3 --calendar blog_calendar_20250106_090000.csv \
//!     --keywords keywords.json --seo seo.txt --icp icp.json
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::format_push_string)]

pub mod ai;
pub mod core;

pub use ai::{create_provider, AIError, AIProvider, GenerationOptions};

// Re-export commonly used types
pub use core::{
    Article, CalendarEntry, CalendarRequest, Config, Inputs, Notice, NoticeLevel, PlanError,
    PlanResult, Session,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "bloggerai";

/// Short alias
pub const APP_ALIAS: &str = "blog";
