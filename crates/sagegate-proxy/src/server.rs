//! Axum HTTP server for the OpenAI-compatible gateway.
//!
//! Routing table:
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/v1/models` | [`list_models`] |
//! | POST | `/v1/chat/completions` | [`chat_completions`] |
//! | POST | `/v1/completions` | [`completions`] |
//! | GET | `/health` | [`health_check`] |
//! | OPTIONS | any | answered by [`crate::cors`] |
//! | other | any | 404 envelope |
//!
//! Routing looks at method and path only; bodies are parsed inside the
//! completion handlers.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::BytesRejection},
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use sagegate_core::{
    BackendInvoker, CompletionRequest, GatewayConfig, GatewayError, InferenceBackend,
};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::cors::cors_headers;
use crate::error::ApiError;
use crate::models::{
    ChatCompletionRequest, ChatCompletionResponse, ModelsResponse, TextCompletionRequest,
    TextCompletionResponse,
};

/// Shared application state for the gateway.
///
/// Immutable after construction; every request works on its own data.
#[derive(Clone)]
pub struct AppState {
    /// Invoker bound to the configured endpoint.
    invoker: BackendInvoker,
    /// Model identifier reported in every response.
    model: Arc<str>,
}

impl AppState {
    pub fn new(config: &GatewayConfig, backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            invoker: BackendInvoker::new(backend, config),
            model: Arc::from(config.endpoint_name.as_str()),
        }
    }
}

/// Build the complete gateway router.
pub fn create_router(config: &GatewayConfig, backend: Arc<dyn InferenceBackend>) -> Router {
    let state = AppState::new(config, backend);

    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/models", get(list_models))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/completions", post(completions))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state);

    with_gateway_layers(routes)
}

/// Wrap `router` in the gateway middleware stack.
///
/// From the outside in: request tracing, CORS, panic-to-500 conversion.
pub fn with_gateway_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(cors_headers))
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway on a pre-bound listener.
///
/// Runs until `cancel` is triggered.
pub async fn serve(
    listener: TcpListener,
    config: &GatewayConfig,
    backend: Arc<dyn InferenceBackend>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(
        endpoint = %config.endpoint_name,
        backend_url = %config.effective_backend_url(),
        timeout_secs = config.timeout.as_secs(),
        "Gateway starting on {addr}"
    );

    let app = create_router(config, backend);

    info!("Configure OpenAI clients to use: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// List the single configured endpoint in OpenAI format.
async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    debug!("GET /v1/models");
    Json(ModelsResponse::for_endpoint(&state.model))
}

/// Handle chat completions: flatten messages, invoke, wrap as assistant reply.
async fn chat_completions(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatCompletionResponse>, ApiError> {
    debug!("POST /v1/chat/completions");

    let request: ChatCompletionRequest = parse_body(&read_body(body)?)?;
    info!(
        messages = request.messages.len(),
        max_tokens = ?request.max_tokens,
        stream = ?request.stream,
        "Processing chat completion request"
    );

    let request = CompletionRequest::from(request);
    let completion = state.invoker.complete(&request).await?;
    Ok(Json(ChatCompletionResponse::from_completion(
        &completion,
        &state.model,
    )))
}

/// Handle text completions: prompt is forwarded verbatim.
async fn completions(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TextCompletionResponse>, ApiError> {
    debug!("POST /v1/completions");

    let request: TextCompletionRequest = parse_body(&read_body(body)?)?;
    info!(
        max_tokens = ?request.max_tokens,
        stream = ?request.stream,
        "Processing text completion request"
    );

    let request = CompletionRequest::from(request);
    let completion = state.invoker.complete(&request).await?;
    Ok(Json(TextCompletionResponse::from_completion(
        &completion,
        &state.model,
    )))
}

/// Any unmatched method/path combination.
async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError(GatewayError::NotFound(format!("{method} {}", uri.path())))
}

/// Turn a body extraction failure into a classified error.
///
/// Bodies over the router's limit are reported as `request_too_large`.
fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, GatewayError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::validation(
                "request_too_large",
                format!("Request body too large: {}", rejection.body_text()),
            )
        } else {
            GatewayError::validation(
                "invalid_request_body",
                format!("Could not read request body: {}", rejection.body_text()),
            )
        }
    })
}

/// Parse a JSON body; an empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, GatewayError> {
    let bytes: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };

    serde_json::from_slice(bytes).map_err(|e| {
        GatewayError::validation("invalid_request_body", format!("Invalid JSON: {e}"))
    })
}

/// Convert a handler panic into a generic 500 envelope.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(panic = detail, "Handler panicked");

    ApiError(GatewayError::Internal(
        "unexpected error while handling the request".to_string(),
    ))
    .into_response()
}
