//! Prompt construction for both generation stages.

use super::calendar::{CalendarEntry, CalendarRequest};
use super::inputs::Inputs;

/// Build the calendar synthesis prompt.
pub fn calendar_prompt(request: &CalendarRequest, inputs: &Inputs) -> String {
    let start = request.start();
    format!(
        r#"Create a {months}-month blog content calendar with {per_week} blog posts per week starting from {start}.

Here are the important keywords that must be incorporated into the blog topics:
{keywords}

Here are the SEO insights to consider:
{seo}

Here is the Ideal Customer Profile information:
{icp}

For each blog post, provide:
1. Publishing date (starting from {start}, typically on working days)
2. Blog title
3. Primary target keyword
4. Brief description (2-3 sentences)

Return the information as a valid JSON array with objects containing these fields:
"date", "title", "primary_keyword", "description""#,
        months = request.duration_months,
        per_week = request.posts_per_week,
        keywords = inputs.keywords_json(),
        seo = inputs.seo_insights,
        icp = inputs.icp_json(),
    )
}

/// Build the article synthesis prompt for one calendar entry.
pub fn article_prompt(entry: &CalendarEntry, inputs: &Inputs, extra_keywords: usize) -> String {
    let secondary = inputs.secondary_keywords(&entry.primary_keyword, extra_keywords);
    let secondary = serde_json::to_string_pretty(&secondary).unwrap_or_else(|_| "[]".to_string());

    format!(
        r"Write a complete blog post based on the following information:

Blog title: {title}
Primary keyword: {keyword}
Description: {description}
Publishing date: {date}

Consider these SEO insights:
{seo}

Consider this Ideal Customer Profile:
{icp}

Additional keywords to incorporate:
{secondary}

Create a comprehensive blog post with:
1. Engaging introduction
2. 4-6 structured sections with subheadings (H2s and H3s)
3. Actionable tips or insights
4. Conclusion with call-to-action
5. Total word count: 1200-1500 words

Format the blog post in Markdown.",
        title = entry.title,
        keyword = entry.primary_keyword,
        description = entry.description,
        date = entry.date,
        seo = inputs.seo_insights,
        icp = inputs.icp_json(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn inputs() -> Inputs {
        Inputs {
            keywords: ["SEO", "content marketing", "a", "b", "c", "d", "e"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seo_insights: "Focus on long-tail keywords.".to_string(),
            icp: json!({"role": "marketer"}).as_object().unwrap().clone(),
        }
    }

    #[test]
    fn test_calendar_prompt_embeds_inputs() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let request = CalendarRequest::new(start, 1, 2).unwrap();
        let prompt = calendar_prompt(&request, &inputs());

        assert!(prompt.starts_with(
            "Create a 1-month blog content calendar with 2 blog posts per week starting from 2024-06-03."
        ));
        assert!(prompt.contains("[\n  \"SEO\",\n  \"content marketing\","));
        assert!(prompt.contains("Focus on long-tail keywords."));
        assert!(prompt.contains("\"role\": \"marketer\""));
        assert!(prompt.contains("typically on working days"));
        assert!(prompt.ends_with("\"date\", \"title\", \"primary_keyword\", \"description\""));
    }

    #[test]
    fn test_article_prompt_secondary_keywords() {
        let entry = CalendarEntry {
            date: "2024-06-05".to_string(),
            title: "Content Marketing 101".to_string(),
            primary_keyword: "content marketing".to_string(),
            description: "Basics.".to_string(),
        };
        let prompt = article_prompt(&entry, &inputs(), 5);

        assert!(prompt.contains("Blog title: Content Marketing 101"));
        assert!(prompt.contains("Primary keyword: content marketing"));
        assert!(prompt.contains("Publishing date: 2024-06-05"));
        assert!(prompt.contains(
            "Additional keywords to incorporate:\n[\n  \"SEO\",\n  \"a\",\n  \"b\",\n  \"c\",\n  \"d\"\n]"
        ));
        assert!(!prompt.contains("\"e\""));
        assert!(prompt.contains("Format the blog post in Markdown."));
    }

    #[test]
    fn test_article_prompt_without_secondary_keywords() {
        let entry = CalendarEntry {
            date: "2024-06-05".to_string(),
            title: "T".to_string(),
            primary_keyword: "SEO".to_string(),
            description: "D".to_string(),
        };
        let prompt = article_prompt(&entry, &inputs(), 0);
        assert!(prompt.contains("Additional keywords to incorporate:\n[]"));
    }
}
