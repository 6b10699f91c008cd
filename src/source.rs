// src/source.rs

use async_trait::async_trait;
use std::sync::Arc;

use crate::model::{BidRequest, BidResponse};

/// 外部竞价源：根据请求产出获胜广告（0 个、1 个或多个）
#[async_trait]
pub trait Source: Send + Sync {
    async fn bid(&self, request: Arc<BidRequest>) -> BidResponse;
}

/// 不返回任何广告的竞价源
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySource;

#[async_trait]
impl Source for EmptySource {
    async fn bid(&self, request: Arc<BidRequest>) -> BidResponse {
        BidResponse::empty(request)
    }
}
