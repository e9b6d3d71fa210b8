//! Per-invocation planning session.
//!
//! A [`Session`] owns everything produced during one run: the loaded inputs,
//! the current calendar and the log of generated articles. It also records
//! the user-facing notices each action produces, which the front end drains
//! and prints.

use std::path::Path;

use uuid::Uuid;

use crate::ai::AIProvider;

use super::article::Article;
use super::calendar::{audit_calendar, CalendarEntry, CalendarRequest};
use super::error::{PlanError, PlanResult};
use super::inputs::{InputLoader, Inputs};
use super::pipeline::Pipeline;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-visible status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
}

/// State held for the duration of one planning session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    inputs: Option<Inputs>,
    calendar: Vec<CalendarEntry>,
    articles: Vec<Article>,
    notices: Vec<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start an empty session.
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "session started");
        Self { id, inputs: None, calendar: Vec::new(), articles: Vec::new(), notices: Vec::new() }
    }

    pub fn inputs(&self) -> Option<&Inputs> {
        self.inputs.as_ref()
    }

    pub fn calendar(&self) -> &[CalendarEntry] {
        &self.calendar
    }

    /// Generated articles in generation order, duplicates included.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Notices recorded so far, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain recorded notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Load the three artifacts from files.
    ///
    /// Fail-fast: on error the previously loaded inputs (if any) are kept.
    pub fn load_inputs(&mut self, keywords: &Path, seo: &Path, icp: &Path) -> PlanResult<()> {
        let mut loader = InputLoader::new();
        let result = loader.load_files(keywords, seo, icp);
        self.finish_load(&loader, result)
    }

    /// Load the three artifacts from already-read contents.
    pub fn load_input_bytes(&mut self, keywords: &[u8], seo: &[u8], icp: &[u8]) -> PlanResult<()> {
        let mut loader = InputLoader::new();
        let result = loader.load_bytes(keywords, seo, icp);
        self.finish_load(&loader, result)
    }

    fn finish_load(&mut self, loader: &InputLoader, result: PlanResult<Inputs>) -> PlanResult<()> {
        for artifact in loader.loaded() {
            self.success(format!("Successfully loaded {artifact}"));
        }

        match result {
            Ok(inputs) => {
                self.inputs = Some(inputs);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Replace the calendar with one imported from an earlier export.
    pub fn set_calendar(&mut self, entries: Vec<CalendarEntry>) {
        self.info(format!("Loaded a blog calendar with {} topics", entries.len()));
        self.calendar = entries;
    }

    /// Generate a new calendar, replacing the current one on success.
    ///
    /// On failure the existing calendar is left untouched.
    pub async fn generate_calendar(
        &mut self,
        provider: &dyn AIProvider,
        request: CalendarRequest,
    ) -> PlanResult<&[CalendarEntry]> {
        let Some(inputs) = self.inputs.as_ref() else {
            return Err(self.fail(missing_inputs()));
        };

        let result = Pipeline::new(provider).generate_calendar(&request, inputs).await;
        let entries = match result {
            Ok(entries) => entries,
            Err(e) => return Err(self.fail(e)),
        };

        let findings = audit_calendar(&entries, inputs, &request);
        self.calendar = entries;
        self.success(format!(
            "Successfully generated a blog calendar with {} topics",
            self.calendar.len()
        ));
        for finding in findings {
            self.warning(finding.to_string());
        }

        Ok(&self.calendar)
    }

    /// Generate the article for calendar entry `index` (zero-based).
    ///
    /// Returns `Ok(None)` with a warning notice when there is no calendar or
    /// the index is past its end. Every success is appended to the article
    /// log, so regenerating an index yields a second entry.
    pub async fn generate_article(
        &mut self,
        provider: &dyn AIProvider,
        index: usize,
        extra_keywords: usize,
    ) -> PlanResult<Option<&Article>> {
        if self.calendar.is_empty() {
            self.warning("No blog calendar generated yet.");
            return Ok(None);
        }
        let Some(entry) = self.calendar.get(index) else {
            self.warning("No more blog topics in the calendar.");
            return Ok(None);
        };
        let Some(inputs) = self.inputs.as_ref() else {
            return Err(self.fail(missing_inputs()));
        };

        let result =
            Pipeline::new(provider).generate_article(index, entry, inputs, extra_keywords).await;
        let article = match result {
            Ok(article) => article,
            Err(e) => return Err(self.fail(e)),
        };

        self.success(format!(
            "Generated blog post {}: {} ({} words)",
            index + 1,
            article.title,
            article.word_count()
        ));
        self.articles.push(article);
        Ok(self.articles.last())
    }

    fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(session = %self.id, "{message}");
        self.notices.push(Notice::new(NoticeLevel::Success, message));
    }

    fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(session = %self.id, "{message}");
        self.notices.push(Notice::new(NoticeLevel::Info, message));
    }

    fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(session = %self.id, "{message}");
        self.notices.push(Notice::new(NoticeLevel::Warning, message));
    }

    fn fail(&mut self, error: PlanError) -> PlanError {
        tracing::error!(session = %self.id, "{error}");
        self.notices.push(Notice::new(NoticeLevel::Error, error.to_string()));
        error
    }
}

fn missing_inputs() -> PlanError {
    PlanError::InvalidRequest("load keywords, SEO insights and ICP data first".to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;

    /// Provider that replays canned replies in order.
    struct Scripted {
        replies: Mutex<VecDeque<anyhow::Result<String>>>,
    }

    impl Scripted {
        fn new(replies: Vec<anyhow::Result<String>>) -> Self {
            Self { replies: Mutex::new(replies.into()) }
        }
    }

    #[async_trait]
    impl AIProvider for Scripted {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    const CALENDAR: &str = r#"Here you go:
[{"date": "2025-01-06", "title": "Rust for Beginners", "primary_keyword": "rust", "description": "Intro"},
 {"date": "2025-01-08", "title": "Async Deep Dive", "primary_keyword": "async", "description": "Futures"}]"#;

    fn loaded_session() -> Session {
        let mut session = Session::new();
        session
            .load_input_bytes(br#"["rust", "async", "tokio"]"#, b"Use short titles.", br#"{"role": "dev"}"#)
            .unwrap();
        session.take_notices();
        session
    }

    fn request() -> CalendarRequest {
        CalendarRequest::new(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), 1, 2).unwrap()
    }

    #[test]
    fn test_load_notices() {
        let mut session = Session::new();
        session.load_input_bytes(br#"{"all_keywords": ["a"]}"#, b"seo", b"{}").unwrap();

        let messages: Vec<_> = session.take_notices().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "Successfully loaded keywords",
                "Successfully loaded SEO insights",
                "Successfully loaded ICP data"
            ]
        );
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_failed_load_keeps_previous_inputs() {
        let mut session = loaded_session();

        let err = session.load_input_bytes(br#"["x"]"#, b"seo", b"[1]").unwrap_err();
        assert!(matches!(err, PlanError::Load { .. }));
        assert_eq!(session.inputs().unwrap().keywords, vec!["rust", "async", "tokio"]);

        let notices = session.take_notices();
        assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
        assert!(notices.last().unwrap().message.contains("ICP data"));
    }

    #[tokio::test]
    async fn test_generate_calendar() {
        let mut session = loaded_session();
        let provider = Scripted::new(vec![Ok(CALENDAR.to_string())]);

        let calendar = session.generate_calendar(&provider, request()).await.unwrap();
        assert_eq!(calendar.len(), 2);
        assert_eq!(calendar[1].title, "Async Deep Dive");

        let notices = session.take_notices();
        assert_eq!(notices[0].message, "Successfully generated a blog calendar with 2 topics");
        assert_eq!(notices.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_calendar_keeps_previous() {
        let mut session = loaded_session();
        let provider = Scripted::new(vec![
            Ok(CALENDAR.to_string()),
            Ok("Sorry, I cannot help".to_string()),
            Err(anyhow::anyhow!("quota exceeded")),
        ]);

        session.generate_calendar(&provider, request()).await.unwrap();

        let err = session.generate_calendar(&provider, request()).await.unwrap_err();
        assert!(matches!(err, PlanError::Parse(_)));
        assert_eq!(session.calendar().len(), 2);

        let err = session.generate_calendar(&provider, request()).await.unwrap_err();
        assert!(matches!(err, PlanError::Generation(ref m) if m.contains("quota exceeded")));
        assert_eq!(session.calendar().len(), 2);
        assert_eq!(session.notices().last().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_calendar_requires_inputs() {
        let mut session = Session::new();
        let provider = Scripted::new(vec![]);

        let err = session.generate_calendar(&provider, request()).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_article_soft_failures() {
        let mut session = loaded_session();
        let provider = Scripted::new(vec![Ok(CALENDAR.to_string())]);

        assert!(session.generate_article(&provider, 0, 5).await.unwrap().is_none());
        assert_eq!(session.take_notices()[0].message, "No blog calendar generated yet.");

        session.generate_calendar(&provider, request()).await.unwrap();
        session.take_notices();

        assert!(session.generate_article(&provider, 2, 5).await.unwrap().is_none());
        let notices = session.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].message, "No more blog topics in the calendar.");
        assert!(session.articles().is_empty());
    }

    #[tokio::test]
    async fn test_article_log_keeps_duplicates() {
        let mut session = loaded_session();
        let provider = Scripted::new(vec![
            Ok(CALENDAR.to_string()),
            Ok("first draft".to_string()),
            Ok("second draft".to_string()),
        ]);
        session.generate_calendar(&provider, request()).await.unwrap();

        let article = session.generate_article(&provider, 1, 5).await.unwrap().unwrap();
        assert_eq!(article.title, "Async Deep Dive");
        session.generate_article(&provider, 1, 5).await.unwrap();

        let articles = session.articles();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.index == 1));
        assert_eq!(articles[0].content, "first draft");
        assert_eq!(articles[1].content, "second draft");
    }

    #[tokio::test]
    async fn test_failed_article_appends_nothing() {
        let mut session = loaded_session();
        session.set_calendar(vec![CalendarEntry {
            date: "2025-01-06".to_string(),
            title: "Imported".to_string(),
            primary_keyword: "rust".to_string(),
            description: "From CSV".to_string(),
        }]);
        let provider = Scripted::new(vec![Err(anyhow::anyhow!("API error (500): boom"))]);

        let err = session.generate_article(&provider, 0, 5).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(session.articles().is_empty());
    }
}
