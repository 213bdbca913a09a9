use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use briefly_app::domain::{fallback_context, ChatMessage, DemoContext, FALLBACK_WEBSITE};
use briefly_app::infrastructure::security::InputSanitizer;
use briefly_app::AppContext;
use briefly_errors::AppError;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;

#[derive(Deserialize)]
struct GenerateContextRequest {
    website: Option<String>,
}

#[derive(Serialize)]
struct GenerateContextResponse {
    success: bool,
    context: DemoContext,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    messages: Vec<ChatMessage>,
    context: Option<DemoContext>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let app_context = AppContext::from_env();

    let app = Router::new()
        .route("/api/demo/generate-context", post(handle_generate_context))
        .route("/api/demo/chat", post(handle_chat))
        .layer(CompressionLayer::new())
        .with_state(app_context.clone());

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        "Security: Rate limit 5/min, 20/hour. Daily budget: {} requests",
        app_context.cost_tracker.get_remaining_requests()
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

fn check_limits(ctx: &AppContext, addr: SocketAddr) -> Result<(), AppError> {
    ctx.rate_limiter
        .check_rate_limit(addr.ip())
        .map_err(|e| AppError::RateLimited(e.message()))?;
    ctx.cost_tracker
        .check_and_increment()
        .map_err(|e| AppError::RateLimited(e.message().to_string()))?;
    Ok(())
}

async fn handle_generate_context(
    State(ctx): State<AppContext>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<GenerateContextRequest>,
) -> Result<Json<GenerateContextResponse>, AppError> {
    check_limits(&ctx, addr)?;

    let website = request
        .website
        .filter(|w| !w.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_WEBSITE.to_string());

    // The demo never blocks on a bad URL: an address we refuse to scrape
    // still gets a usable static context.
    let context = match InputSanitizer::validate_url(&website) {
        Ok(validated) => ctx.generate_context.execute(validated).await,
        Err(e) => {
            tracing::warn!("Rejected website {:?}: {}", website, e);
            fallback_context(&website)
        }
    };

    Ok(Json(GenerateContextResponse {
        success: true,
        context,
    }))
}

async fn handle_chat(
    State(ctx): State<AppContext>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, AppError> {
    check_limits(&ctx, addr)?;

    let context = request.context.ok_or(AppError::MissingContext)?;

    let deltas = ctx.demo_chat.stream(&context, &request.messages).await?;

    let response = Response::builder()
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Cache-Control", "no-cache")
        .body(Body::from_stream(deltas))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response.into_response())
}
