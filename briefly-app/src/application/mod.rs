mod demo_chat;
mod generate_context;

pub use demo_chat::DemoChat;
pub use generate_context::GenerateDemoContext;
