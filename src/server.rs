//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the
//! memory directory, the co-visitation recorder, and the MCP tool handler into
//! a running server.

use crate::config::MemdirConfig;
use crate::files::guard::PathGuard;
use crate::files::MemoryFiles;
use crate::recall::{IndexStore, MemoryAccessRecorder, RecorderOptions};
use crate::tools::MemdirTools;
use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;

/// Recorder for the memory directory behind `guard`.
pub fn recorder_for(guard: &PathGuard, config: &MemdirConfig) -> MemoryAccessRecorder {
    let store = IndexStore::in_dir(guard.root(), &config.storage.index_file);
    MemoryAccessRecorder::new(
        guard.root(),
        store,
        RecorderOptions::from(&config.recall),
    )
}

/// Shared setup: create the memory directory and the recorder behind it.
/// The co-visitation document itself is loaded on first access.
fn setup_shared_state(config: &MemdirConfig) -> Result<Arc<MemoryFiles>> {
    let guard = PathGuard::new(config.resolved_memory_dir())?;
    tracing::info!(root = %guard.root().display(), "memory directory ready");

    let recorder = Arc::new(recorder_for(&guard, config));
    tracing::info!(
        index = %recorder.store().path().display(),
        max_recommendations = config.recall.max_recommendations,
        cleanup_threshold = config.recall.session_cleanup_threshold,
        "co-visitation recorder ready"
    );

    Ok(Arc::new(MemoryFiles::new(
        guard,
        recorder,
        config.files.clone(),
    )))
}

/// Start the server with the transport named in the config.
pub async fn serve(config: MemdirConfig) -> Result<()> {
    match config.server.transport.as_str() {
        "stdio" => serve_stdio(config).await,
        "http" => serve_http(config).await,
        other => anyhow::bail!("unknown transport: {other}. Supported: stdio, http"),
    }
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MemdirConfig) -> Result<()> {
    tracing::info!("starting memdir MCP server on stdio");

    let files = setup_shared_state(&config)?;

    let tools = MemdirTools::new(files);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport. Each client session
/// gets its own tool handler and therefore its own co-visitation session.
pub async fn serve_http(config: MemdirConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting memdir MCP server on HTTP");

    let files = setup_shared_state(&config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(MemdirTools::new(files.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
