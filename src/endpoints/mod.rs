// src/endpoints/mod.rs

pub mod direct;
pub mod dynamic;
pub mod proxy;
pub mod templates;

use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::Arc;

use crate::model::BidRequest;
use crate::source::Source;

pub use direct::DirectEndpoint;
pub use dynamic::DynamicEndpoint;
pub use proxy::ProxyEndpoint;

/// 广告投放协议
#[async_trait]
pub trait Endpoint: Send + Sync {
    fn codename(&self) -> &'static str;

    /// 未配置的 zone 是否直接返回 404
    fn requires_zone(&self) -> bool {
        true
    }

    async fn handle(&self, source: &dyn Source, request: BidRequest) -> Response;
}

/// 按 codename 注册的协议表
#[derive(Default, Clone)]
pub struct EndpointRegistry {
    endpoints: HashMap<&'static str, Arc<dyn Endpoint>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, endpoint: Arc<dyn Endpoint>) -> Self {
        self.endpoints.insert(endpoint.codename(), endpoint);
        self
    }

    pub fn get(&self, codename: &str) -> Option<Arc<dyn Endpoint>> {
        self.endpoints.get(codename).cloned()
    }
}

/// 已编码的响应体
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Payload {
    pub fn new(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }
}

impl IntoResponse for Payload {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type))],
            self.body,
        )
            .into_response()
    }
}
