use briefly_errors::AppError;
use futures::Stream;

use crate::domain::{ChatMessage, DemoContext};
use crate::infrastructure::openai::{
    prompt, ChatCompletionRequest, Message, OpenAiClient, CHAT_MODEL,
};

const CHAT_MAX_TOKENS: u32 = 1024;
const CHAT_TEMPERATURE: f32 = 0.7;

/// Streams consultant replies for the demo chat, seeded with the prospect's
/// generated brand context.
pub struct DemoChat {
    ai: OpenAiClient,
}

impl DemoChat {
    pub fn new(openai_api_key: String) -> Self {
        Self {
            ai: OpenAiClient::new(openai_api_key),
        }
    }

    pub async fn stream(
        &self,
        context: &DemoContext,
        messages: &[ChatMessage],
    ) -> Result<impl Stream<Item = Result<String, AppError>>, AppError> {
        let mut chat = Vec::with_capacity(messages.len() + 1);
        chat.push(Message::system(prompt::build_consultant_prompt(context)));
        chat.extend(
            messages
                .iter()
                .map(|m| Message::new(&m.role, m.content.clone())),
        );

        let request = ChatCompletionRequest::streaming(
            CHAT_MODEL,
            chat,
            CHAT_MAX_TOKENS,
            CHAT_TEMPERATURE,
        );

        self.ai.complete_streaming(request).await
    }
}
