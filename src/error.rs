// src/error.rs

use std::io;

/// 渲染阶段错误（direct / dynamic 共用）
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("direct: multiple direct responses not supported")]
    MultipleDirectNotSupported,
    #[error("direct: invalid response type")]
    InvalidResponseType,
    #[error("direct: link is not a valid redirect target: {0:?}")]
    InvalidLink(String),
    #[error("response: ad {ad} refers to unknown impression {impression}")]
    UnknownImpression { ad: String, impression: String },
    #[error("response: bundle for impression {bundle} contains item {item} of impression {impression}")]
    BundleImpressionMismatch {
        bundle: String,
        item: String,
        impression: String,
    },
    #[error("encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// URL 生成错误，调用方只记录不上抛
#[derive(thiserror::Error, Debug)]
pub enum UrlError {
    #[error("url generator: {0} base url is not configured")]
    MissingBase(&'static str),
    #[error("url generator: item {0} has no action url")]
    EmptyActionUrl(String),
}

/// 事件投递错误
#[derive(thiserror::Error, Debug)]
pub enum EventError {
    #[error("event stream: queue is full")]
    QueueFull,
    #[error("event stream: queue is closed")]
    Closed,
    #[error("event stream: encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 竞价源附带在 BidResponse 上的错误
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BidError {
    #[error("source: impression {0} has no target zone")]
    NoTarget(String),
    #[error("source: {0}")]
    Source(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config: I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("config: invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
