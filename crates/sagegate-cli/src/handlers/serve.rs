//! `sagegate serve`: run the HTTP gateway until Ctrl-C.

use std::future::Future;
use std::io;
use std::sync::Arc;

use anyhow::Context;
use sagegate_core::GatewayConfig;
use sagegate_proxy::HttpInferenceBackend;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn execute(config: &GatewayConfig) -> anyhow::Result<()> {
    let backend = HttpInferenceBackend::from_config(config)
        .context("Failed to build the inference endpoint client")?;

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), cancel.clone()));

    sagegate_proxy::serve(listener, config, Arc::new(backend), cancel).await
}

/// Cancel `cancel` once `signal` fires.
///
/// If the signal cannot be listened for, the token is left alone and the
/// server keeps running.
async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Received Ctrl-C, shutting down");
            cancel.cancel();
        }
        Err(e) => warn!("Failed to listen for Ctrl-C, shutdown must be external: {e}"),
    }
}
