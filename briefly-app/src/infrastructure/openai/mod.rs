mod client;
mod stream;
mod types;

pub mod prompt;

pub use client::{strip_code_fences, OpenAiClient, CHAT_MODEL, TEXT_MODEL, VISION_MODEL};
pub use types::{ChatCompletionRequest, ContentPart, ImageUrl, Message};
