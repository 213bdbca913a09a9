use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to reach website: {0}")]
    ScrapingFailed(String),

    #[error("AI provider error: {0}")]
    AiError(String),

    #[error("Demo context is missing")]
    MissingContext,

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidUrl(_) => "That URL doesn't look valid. Please try again.",
            Self::ScrapingFailed(_) => "We couldn't reach that website. Make sure the URL is accessible.",
            Self::AiError(_) => "Our AI assistant is busy right now. Please try again shortly.",
            Self::MissingContext => "Start the demo from the beginning so we can set up your brand context.",
            Self::RateLimited(_) => "Too many requests. Please wait a moment before trying again.",
            Self::Timeout => "The request took too long. Please try again.",
            Self::Internal(_) => "Something went wrong on our side. Please try again later.",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidUrl(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ScrapingFailed(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::AiError(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::MissingContext => (StatusCode::BAD_REQUEST, "Missing demo context".to_string()),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            AppError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "Timeout".to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}
