use crate::error::SummarizeError;
use crate::summarizer::config::AiConfig;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

const PROMPT_TEMPLATE: &str = "Summarize the following text concisely. \
Write the summary in the same language as the text. \
Do not add any information, opinions, or commentary that is not in the text. \
Reply with the summary only.\n\nText:\n";

const MAX_ERROR_BODY_CHARS: usize = 2_000;

pub trait Completer {
    fn complete(&self, model: &str, prompt: &str) -> Result<String, SummarizeError>;
}

pub fn build_prompt(input_text: &str) -> String {
    format!("{PROMPT_TEMPLATE}{input_text}")
}

pub struct ChatCompleter {
    client: Client,
    endpoint: String,
    api_key: String,
    referer: Option<String>,
    title: String,
}

impl ChatCompleter {
    pub fn from_config(cfg: &AiConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("ai api key missing; set SUMMARIZER_AI_API_KEY or use --dry-run")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("failed to build ai http client")?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            api_key,
            referer: cfg.referer.clone(),
            title: cfg.title.clone(),
        })
    }
}

impl Completer for ChatCompleter {
    fn complete(&self, model: &str, prompt: &str) -> Result<String, SummarizeError> {
        let payload = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Title", &self.title)
            .json(&payload);
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }

        let response = request.send().map_err(SummarizeError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummarizeError::AiService {
                status: status.as_u16(),
                body: clip(&body),
            });
        }

        let raw = response.text().map_err(SummarizeError::from_transport)?;
        let json: Value = serde_json::from_str(&raw)
            .map_err(|err| SummarizeError::InvalidAiResponse(format!("body is not json: {err}")))?;
        extract_generated_text(&json)
    }
}

fn clip(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Pull `choices[0].message.content`. Content may be a plain string or a list
/// of text parts.
pub fn extract_generated_text(json: &Value) -> Result<String, SummarizeError> {
    let missing = |what: &str| SummarizeError::InvalidAiResponse(what.to_string());

    let choices = json
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| missing("no choices array"))?;
    let first = choices.first().ok_or_else(|| missing("choices is empty"))?;
    let content = first
        .get("message")
        .and_then(|m| m.get("content"))
        .ok_or_else(|| missing("choices[0].message.content absent"))?;

    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(missing("generated text is empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_embeds_input_after_instructions() {
        let prompt = build_prompt("Le ciel est bleu.");
        assert!(prompt.contains("same language"));
        assert!(prompt.contains("Do not add"));
        assert!(prompt.ends_with("Le ciel est bleu."));
    }

    #[test]
    fn extracts_string_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": " Paris is the capital. "}}]});
        assert_eq!(
            extract_generated_text(&body).expect("text"),
            "Paris is the capital."
        );
    }

    #[test]
    fn extracts_text_parts() {
        let body = json!({"choices": [{"message": {"content": [{"type": "text", "text": "one"}, {"type": "text", "text": "two"}]}}]});
        assert_eq!(extract_generated_text(&body).expect("text"), "one\ntwo");
    }

    #[test]
    fn empty_choices_is_invalid_response() {
        let err = extract_generated_text(&json!({"choices": []})).expect_err("invalid");
        assert!(matches!(err, SummarizeError::InvalidAiResponse(_)));
    }

    #[test]
    fn null_or_blank_content_is_invalid_response() {
        for body in [
            json!({"choices": [{"message": {"content": null}}]}),
            json!({"choices": [{"message": {"content": "   "}}]}),
            json!({"error": {"message": "rate limited"}}),
        ] {
            let err = extract_generated_text(&body).expect_err("invalid");
            assert_eq!(err.kind(), "invalid_ai_response");
        }
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let cfg = AiConfig::default();
        let err = ChatCompleter::from_config(&cfg)
            .err()
            .expect("missing key should fail");
        assert!(err.to_string().contains("SUMMARIZER_AI_API_KEY"));
    }
}
