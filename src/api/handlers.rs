// src/api/handlers.rs

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::request_builder::{build_request, http_context};
use crate::api::AppState;

/// **处理广告投放请求**
pub async fn handle_endpoint(
    State(state): State<Arc<AppState>>,
    Path((codename, zone_id)): Path<(String, u64)>,
    Query(params): Query<BTreeMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(endpoint) = state.endpoints.get(&codename) else {
        warn!(endpoint = %codename, "unknown endpoint");
        return StatusCode::NOT_FOUND.into_response();
    };

    let zone = state.config.zone(zone_id);
    if zone.is_none() && endpoint.requires_zone() {
        warn!(endpoint = %codename, zone_id, "unknown zone");
        return StatusCode::NOT_FOUND.into_response();
    }

    let http = http_context(&method, &uri, &headers, params);
    let request = build_request(&state.config, &codename, zone, http);
    debug!(
        endpoint = %codename,
        zone_id,
        request_id = %request.id,
        auction_id = %request.auction_id,
        robot = request.robot,
        debug_mode = request.debug,
        "handle request"
    );

    endpoint.handle(state.source.as_ref(), request).await
}
