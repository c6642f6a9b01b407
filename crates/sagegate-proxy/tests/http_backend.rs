//! `HttpInferenceBackend` against a fake endpoint container on loopback.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use sagegate_core::{BackendError, BackendInvoker, CompletionRequest, GatewayConfig, InferenceBackend};
use sagegate_proxy::HttpInferenceBackend;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Echoes the prompt back in the list-shaped response format.
async fn echo_invocation(Path(endpoint): Path<String>, Json(payload): Json<Value>) -> Json<Value> {
    let inputs = payload["inputs"].as_str().unwrap_or_default();
    let max = &payload["parameters"]["max_new_tokens"];
    Json(json!([{ "generated_text": format!("[{endpoint}|{max}] {inputs}") }]))
}

async fn failing_invocation() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "model is loading")
}

async fn slow_invocation() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"generated_text": "too late"}))
}

async fn spawn_fake_endpoint() -> SocketAddr {
    let app = Router::new()
        .route("/endpoints/{endpoint}/invocations", post(echo_invocation))
        .route("/broken/endpoints/{endpoint}/invocations", post(failing_invocation))
        .route("/slow/endpoints/{endpoint}/invocations", post(slow_invocation));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn posts_payload_to_invocation_path() {
    let addr = spawn_fake_endpoint().await;
    let backend = HttpInferenceBackend::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();

    let body = backend
        .invoke("gpt2-ep", &json!({"inputs": "hello", "parameters": {"max_new_tokens": 7}}))
        .await
        .unwrap();

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!([{"generated_text": "[gpt2-ep|7] hello"}]));
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let addr = spawn_fake_endpoint().await;
    let backend =
        HttpInferenceBackend::new(format!("http://{addr}/broken"), Duration::from_secs(5)).unwrap();

    let err = backend.invoke("ep", &json!({"inputs": "x"})).await.unwrap_err();

    assert_eq!(
        err,
        BackendError::Status {
            status: 503,
            body: "model is loading".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpInferenceBackend::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let err = backend.invoke("ep", &json!({"inputs": "x"})).await.unwrap_err();

    assert!(matches!(err, BackendError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn client_deadline_is_a_timeout() {
    let addr = spawn_fake_endpoint().await;
    let backend =
        HttpInferenceBackend::new(format!("http://{addr}/slow"), Duration::from_millis(100)).unwrap();

    let err = backend.invoke("ep", &json!({"inputs": "x"})).await.unwrap_err();

    assert_eq!(err, BackendError::Timeout);
}

#[tokio::test]
async fn invoker_round_trip_over_http() {
    let addr = spawn_fake_endpoint().await;
    let config = GatewayConfig::new("llama-ep").with_backend_url(format!("http://{addr}"));
    let backend = HttpInferenceBackend::from_config(&config).unwrap();
    let invoker = BackendInvoker::new(std::sync::Arc::new(backend), &config);

    let completion = invoker
        .complete(&CompletionRequest::text("ping").with_max_tokens(3))
        .await
        .unwrap();

    assert_eq!(completion.text(), "[llama-ep|3] ping");
    assert_eq!(completion.usage().prompt_tokens, 1);
}
