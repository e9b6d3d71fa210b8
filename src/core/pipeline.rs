//! The two model round-trips: calendar synthesis and article synthesis.

use crate::ai::AIProvider;

use super::article::Article;
use super::calendar::{parse_calendar_response, CalendarEntry, CalendarRequest};
use super::error::{PlanError, PlanResult};
use super::inputs::Inputs;
use super::prompts::{article_prompt, calendar_prompt};

/// Stateless generation pipeline over a borrowed provider.
pub struct Pipeline<'a> {
    provider: &'a dyn AIProvider,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline that sends its prompts to `provider`.
    pub fn new(provider: &'a dyn AIProvider) -> Self {
        Self { provider }
    }

    /// Ask the model for a publishing calendar and parse its reply.
    pub async fn generate_calendar(
        &self,
        request: &CalendarRequest,
        inputs: &Inputs,
    ) -> PlanResult<Vec<CalendarEntry>> {
        let prompt = calendar_prompt(request, inputs);
        let reply = self.send(&prompt).await?;
        parse_calendar_response(&reply)
    }

    /// Ask the model for the article of calendar entry `index`.
    pub async fn generate_article(
        &self,
        index: usize,
        entry: &CalendarEntry,
        inputs: &Inputs,
        extra_keywords: usize,
    ) -> PlanResult<Article> {
        let prompt = article_prompt(entry, inputs, extra_keywords);
        let reply = self.send(&prompt).await?;
        Ok(Article::from_entry(index, entry, reply))
    }

    async fn send(&self, prompt: &str) -> PlanResult<String> {
        tracing::debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            prompt_chars = prompt.len(),
            "sending generation request"
        );

        let reply = self
            .provider
            .generate(prompt)
            .await
            .map_err(|e| PlanError::Generation(format!("{e:#}")))?;

        tracing::debug!(reply_chars = reply.len(), "received generation reply");
        Ok(reply)
    }
}
