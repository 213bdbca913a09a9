use serde::{Deserialize, Serialize};

/// One turn of the demo chat transcript, sent back by the client on every
/// chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}
