use serde::Deserialize;
use serde_json::json;

use crate::generator::PlanPreferences;

pub(crate) const SYSTEM_PROMPT: &str = "You are a meal planning assistant. \
Respond with exactly one JSON object and no prose, matching this shape: \
{\"week_start\":\"YYYY-MM-DD\",\"days\":[{\"day\":1,\"meals\":[{\"title\":\"...\",\
\"slot\":\"breakfast|lunch|dinner|snack\",\"ingredients\":[{\"name\":\"...\",\
\"quantity\":0,\"unit\":\"...\",\"section\":\"...\"}]}]}],\
\"totals\":{\"calories\":0,\"protein\":0,\"carbs\":0,\"fat\":0}}. \
The days array must hold exactly 7 entries, day 1 through day 7.";

/// Client for an OpenAI-compatible chat-completions endpoint. Fallible and
/// unbounded in latency; callers own the fallback.
#[derive(Clone)]
pub struct TextClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl TextClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// One completion round trip; returns the raw assistant text.
    pub async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("completion returned no text");
        }

        Ok(text)
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub(crate) fn build_prompt(preferences: &PlanPreferences, week_start: &str) -> String {
    let mut prompt = format!("Build a 7-day meal plan starting {week_start}.");

    if let Some(calories) = preferences.target_calories {
        prompt.push_str(&format!(" Target roughly {calories} kcal per day."));
    }
    if !preferences.tags.is_empty() {
        prompt.push_str(&format!(
            " Dietary preferences: {}.",
            preferences.tags.join(", ")
        ));
    }
    if let Some(notes) = preferences.notes.as_deref() {
        prompt.push_str(&format!(" Notes: {notes}."));
    }

    prompt
}
