use std::net::SocketAddr;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use marquee_api::AppState;
use tracing::info;

use super::Context;
use crate::output::Output;

pub async fn run_serve(
    context: &Context,
    host: Option<String>,
    port: Option<u16>,
    in_memory: bool,
    output: &Output,
) -> Result<()> {
    let host = host.unwrap_or_else(|| context.config.server.host.clone());
    let port = port.unwrap_or(context.config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| eyre!("Invalid bind address {}:{}: {}", host, port, e))?;

    let provider = context.provider()?;
    let store = context.store(in_memory).await?;
    let state = AppState::new(provider, store, context.config.import.default_language_id);

    if in_memory {
        output.warn("Catalog is in memory; imports are lost when the server stops");
    }
    output.success(format!("Serving the import API on http://{}", addr));
    info!(%addr, in_memory, "Starting API server");

    marquee_api::serve(addr, state)
        .await
        .wrap_err("API server stopped with an error")?;

    output.info("Server stopped");
    Ok(())
}
