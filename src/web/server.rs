//! Web server for the launch dashboard
//!
//! Provides an HTTP server using Axum to serve the dashboard page
//! and JSON API endpoints.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::dataset::LaunchDataset;
use crate::layout::{PageLayout, build_layout};

use super::routes;

/// Shared application state
///
/// Built once at startup and only ever read afterwards.
pub struct AppState {
    pub dataset: LaunchDataset,
    pub layout: PageLayout,
    pub api_endpoint: Option<String>,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, api_endpoint: Option<String>) -> Self {
        let layout = build_layout(&dataset);
        Self {
            dataset,
            layout,
            api_endpoint,
        }
    }
}

/// Configuration for the web server
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub open_browser: bool,
    pub api_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8050,
            open_browser: false,
            api_endpoint: None,
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let cross_origin = state.api_endpoint.is_some();
    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::static_routes())
        .with_state(state);

    // A separately deployed frontend calls the API from another origin
    if cross_origin {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the web server and serve the dashboard
pub async fn start_server(
    dataset: LaunchDataset,
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(AppState::new(dataset, config.api_endpoint.clone()));
    let app = router(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;

    let url = format!("http://{}", addr);
    info!("Dashboard running at {}", url);

    if config.open_browser {
        info!("Opening browser...");
        if let Err(e) = open::that(&url) {
            warn!("Could not open browser: {}", e);
            warn!("Please open {} manually", url);
        }
    }

    info!("Press Ctrl+C to stop the server");

    axum::serve(listener, app).await?;

    Ok(())
}
