use briefly_errors::AppError;
use futures::{future, stream, Stream, StreamExt};

use super::stream::SseDeltaDecoder;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

// Model choice is configuration, not protocol: the cheap text model handles
// summaries and insights, the multimodal one handles vision and the live chat.
pub const TEXT_MODEL: &str = "gpt-4o-mini";
pub const VISION_MODEL: &str = "gpt-4o";
pub const CHAT_MODEL: &str = "gpt-4o";

pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
        }
    }

    /// One-shot completion: returns the assistant message text.
    pub async fn complete(&self, request: ChatCompletionRequest) -> Result<String, AppError> {
        let response = self
            .http_client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI error: {} - {}", status, body);
            return Err(AppError::AiError(format!("API error: {status}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiError(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::AiError("No response from AI".to_string()))
    }

    /// Streaming completion: yields assistant text deltas as they arrive.
    pub async fn complete_streaming(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<impl Stream<Item = Result<String, AppError>>, AppError> {
        let response = self
            .http_client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI stream error: {} - {}", status, body);
            return Err(AppError::AiError(format!("API error: {status}")));
        }

        let deltas = response
            .bytes_stream()
            .scan(SseDeltaDecoder::new(), |decoder, chunk| {
                let items: Vec<Result<String, AppError>> = match chunk {
                    Ok(bytes) => decoder.feed(&bytes).into_iter().map(Ok).collect(),
                    Err(e) => vec![Err(AppError::AiError(e.to_string()))],
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten();

        Ok(deltas)
    }
}

/// Drop the markdown code fences models love to wrap JSON in.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n[\"#00A57C\"]\n```"), "[\"#00A57C\"]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  [\"plain\"] "), "[\"plain\"]");
    }
}
