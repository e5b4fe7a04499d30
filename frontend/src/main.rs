// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::net::SocketAddr;

use frontend::api::ApiClient;
use frontend::handlers::AppState;
use frontend::routes;

// Defaults match a local upstream started with its stock configuration.
const DEFAULT_UPSTREAM_API_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting up the front end...");

    let upstream_url = std::env::var("UPSTREAM_API_URL")
        .unwrap_or_else(|_| DEFAULT_UPSTREAM_API_URL.to_string());
    let api = ApiClient::new(&upstream_url);

    // A missing upstream is an operational state, not a startup error:
    // pages render their failed-load state until it comes back.
    match api.health().await {
        Ok(()) => tracing::info!("Upstream API at {} is reachable.", upstream_url),
        Err(e) => tracing::warn!(
            "Upstream API at {} is not reachable yet: {}",
            upstream_url,
            e
        ),
    }

    let state = AppState::new(api);
    let app = routes::create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR));
    tracing::info!("The front end listens on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
