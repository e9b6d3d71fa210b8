//! Generated articles.

use serde::{Deserialize, Serialize};

use super::calendar::CalendarEntry;

/// Longest title fragment used in an article file name.
const FILE_TITLE_CHARS: usize = 30;

/// A full blog post generated for one calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Zero-based position of the source entry in the calendar
    pub index: usize,

    /// Publishing date copied from the calendar entry
    pub date: String,

    /// Title copied from the calendar entry
    pub title: String,

    /// Primary keyword copied from the calendar entry
    pub primary_keyword: String,

    /// Markdown body, exactly as returned by the model
    pub content: String,
}

impl Article {
    /// Create an article for a calendar entry.
    pub fn from_entry(index: usize, entry: &CalendarEntry, content: impl Into<String>) -> Self {
        Self {
            index,
            date: entry.date.clone(),
            title: entry.title.clone(),
            primary_keyword: entry.primary_keyword.clone(),
            content: content.into(),
        }
    }

    /// Render as a standalone Markdown document.
    pub fn to_markdown(&self) -> String {
        format!("# {}\n\nDate: {}\n\n{}", self.title, self.date, self.content)
    }

    /// Download file name: `blog_<n><Title>.md`.
    ///
    /// `n` is the 1-based calendar position. The title has its spaces removed
    /// (along with characters file systems reject) and is cut to 30 chars.
    pub fn file_name(&self) -> String {
        let title: String = self
            .title
            .chars()
            .filter(|c| !matches!(c, ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
            .take(FILE_TITLE_CHARS)
            .collect();
        format!("blog_{}{}.md", self.index + 1, title)
    }

    /// Approximate word count of the body.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(index: usize, title: &str) -> Article {
        Article {
            index,
            date: "2024-06-03".to_string(),
            title: title.to_string(),
            primary_keyword: "SEO".to_string(),
            content: "## Intro\n\nHello world.".to_string(),
        }
    }

    #[test]
    fn test_markdown_layout() {
        let md = article(0, "Why SEO Matters").to_markdown();
        assert_eq!(md, "# Why SEO Matters\n\nDate: 2024-06-03\n\n## Intro\n\nHello world.");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(article(0, "Why SEO Matters").file_name(), "blog_1WhySEOMatters.md");
        assert_eq!(
            article(9, "The Complete Guide to Long Tail Keyword Research in 2024").file_name(),
            "blog_10TheCompleteGuidetoLongTailKeyw.md"
        );
    }

    #[test]
    fn test_file_name_drops_path_separators() {
        assert_eq!(article(2, "SEO/SEM: What?").file_name(), "blog_3SEOSEMWhat.md");
    }

    #[test]
    fn test_from_entry() {
        let entry = CalendarEntry {
            date: "2024-06-05".to_string(),
            title: "Title".to_string(),
            primary_keyword: "kw".to_string(),
            description: "d".to_string(),
        };
        let article = Article::from_entry(4, &entry, "one two three");
        assert_eq!(article.index, 4);
        assert_eq!(article.title, "Title");
        assert_eq!(article.word_count(), 3);
    }
}
