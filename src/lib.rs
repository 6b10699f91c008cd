// src/lib.rs

pub mod api;
pub mod bidding;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod source;
pub mod urlgen;

use std::sync::Arc;

use crate::api::AppState;
use crate::config::ConfigManager;
use crate::endpoints::{DirectEndpoint, DynamicEndpoint, EndpointRegistry, ProxyEndpoint};
use crate::events::EventStream;
use crate::source::Source;
use crate::urlgen::{TemplateUrlGenerator, UrlGenerator};

/// 根据配置组装三个投放协议和共享状态
pub fn build_state(
    config: ConfigManager,
    source: Arc<dyn Source>,
    events: Arc<dyn EventStream>,
) -> Arc<AppState> {
    let server = config.server();
    let url_gen: Arc<dyn UrlGenerator> = Arc::new(TemplateUrlGenerator::new(
        &server.tracker_base_url,
        &server.click_base_url,
        &server.cdn_base_url,
        &server.lib_base_url,
    ));

    let endpoints = EndpointRegistry::new()
        .register(Arc::new(DirectEndpoint::new(
            config.direct_formats(),
            &server.superfailover_url,
            events,
        )))
        .register(Arc::new(DynamicEndpoint::new(
            url_gen.clone(),
            server.asset_dedup,
            server.meta.clone(),
        )))
        .register(Arc::new(ProxyEndpoint::new(url_gen)));

    Arc::new(AppState {
        config: Arc::new(config),
        source,
        endpoints: Arc::new(endpoints),
    })
}
