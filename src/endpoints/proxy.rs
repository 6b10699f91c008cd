// src/endpoints/proxy.rs

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::endpoints::templates::ad_render_dynamic_proxy_banner;
use crate::endpoints::{Endpoint, Payload};
use crate::model::BidRequest;
use crate::source::Source;
use crate::urlgen::UrlGenerator;

/// proxy 协议：返回嵌入加载脚本的 HTML，广告由脚本通过 dynamic 协议拉取
pub struct ProxyEndpoint {
    url_gen: Arc<dyn UrlGenerator>,
}

impl ProxyEndpoint {
    pub fn new(url_gen: Arc<dyn UrlGenerator>) -> Self {
        Self { url_gen }
    }

    pub fn render(&self, request: &BidRequest) -> Payload {
        let html = ad_render_dynamic_proxy_banner(
            request.target_id(),
            request.debug,
            &request.service_domain,
            &self.url_gen.lib_url("/embedded.js"),
        );
        Payload::new(StatusCode::OK, "text/html; charset=UTF-8", html.into_bytes())
    }
}

#[async_trait]
impl Endpoint for ProxyEndpoint {
    fn codename(&self) -> &'static str {
        "proxy"
    }

    async fn handle(&self, _source: &dyn Source, request: BidRequest) -> Response {
        self.render(&request).into_response()
    }
}
