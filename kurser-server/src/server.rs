use std::{env, net::SocketAddr};

use anyhow::Result;
use tokio::net::TcpListener;

use crate::handlers::create_app;

const DEFAULT_PORT: u16 = 3000;

/// Port to listen on given the `PORT` value, falling back to the default
/// when unset or malformed
fn listen_port(value: Option<&str>) -> u16 {
    let Some(value) = value else {
        return DEFAULT_PORT;
    };
    value.trim().parse().unwrap_or_else(|e| {
        tracing::warn!("Ignoring PORT={:?} ({}), using {}", value, e, DEFAULT_PORT);
        DEFAULT_PORT
    })
}

pub async fn start_server() -> Result<()> {
    let port = listen_port(env::var("PORT").ok().as_deref());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Kurser preview server listening on {}", addr);

    axum::serve(listener, create_app()).await?;

    Ok(())
}
