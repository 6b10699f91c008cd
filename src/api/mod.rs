// src/api/mod.rs

pub mod handlers;
pub mod request_builder;

use axum::routing::any;
use axum::Router;
use std::sync::Arc;

use crate::config::ConfigManager;
use crate::endpoints::EndpointRegistry;
use crate::source::Source;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigManager>,
    pub source: Arc<dyn Source>,
    pub endpoints: Arc<EndpointRegistry>,
}

/// `/b/{endpoint}/{zone_id}` 按协议 codename 分发
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/b/{endpoint}/{zone_id}", any(handlers::handle_endpoint))
        .with_state(state)
}
