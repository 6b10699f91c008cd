// src/endpoints/dynamic/mod.rs

pub mod assets;
pub mod meta;
pub mod response;
pub mod tracker;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response as HttpResponse};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::error;

use crate::config::MetaConfig;
use crate::endpoints::{Endpoint, Payload};
use crate::error::RenderError;
use crate::model::{BidRequest, BidResponse, HttpContext, ResponseItem};
use crate::source::Source;
use crate::urlgen::UrlGenerator;

use self::assets::{AssetDedupPolicy, AssetDeduplicator};
use self::meta::MetaAssembler;
use self::response::{Item, Response};
use self::tracker::TrackerSynthesizer;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_JS: &str = "application/javascript";
const DEFAULT_CALLBACK: &str = "callback";

#[derive(Serialize)]
struct ItemDebug<'a> {
    http: &'a HttpContext,
    unit: &'a ResponseItem,
}

#[derive(Serialize)]
struct ResponseDebug<'a> {
    request_id: &'a str,
    auction_id: &'a str,
    robot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ErrorDocument<'a> {
    version: &'a str,
    error: String,
}

/// dynamic 协议：输出 JSON / JSONP 格式的全部获胜条目
pub struct DynamicEndpoint {
    url_gen: Arc<dyn UrlGenerator>,
    trackers: TrackerSynthesizer,
    assets: AssetDeduplicator,
    meta: MetaAssembler,
}

impl DynamicEndpoint {
    pub fn new(url_gen: Arc<dyn UrlGenerator>, dedup: AssetDedupPolicy, meta: MetaConfig) -> Self {
        Self {
            trackers: TrackerSynthesizer::new(url_gen.clone()),
            url_gen,
            assets: AssetDeduplicator::new(dedup),
            meta: MetaAssembler::new(meta),
        }
    }

    /// 渲染响应文档；任何错误都会使整个文档作废
    pub fn render(&self, response: &BidResponse) -> Result<Response, RenderError> {
        let request = &response.request;
        let mut resp = Response::new(self.trackers.custom_tracker(None, response));

        if !request.robot {
            response.validate()?;
            for ad in &response.ads {
                for item in ad.items() {
                    let rendered = self.render_item(item, response)?;
                    resp.group_or_create(ad.impression_id()).add_item(rendered);
                }
            }
        }

        // 没有条目的展示位补充自定义追踪
        for imp in &request.impressions {
            let group = resp.group_or_create(&imp.id);
            if group.items.is_empty() {
                group.custom_tracker = self.trackers.custom_tracker(Some(imp), response);
            }
        }

        if request.debug {
            resp.debug = Some(serde_json::to_value(ResponseDebug {
                request_id: &request.id,
                auction_id: &request.auction_id,
                robot: request.robot,
                error: response.error.as_ref().map(ToString::to_string),
            })?);
        }
        Ok(resp)
    }

    fn render_item(&self, item: &ResponseItem, response: &BidResponse) -> Result<Item, RenderError> {
        let url = if item.format.is_proxy() {
            String::new()
        } else {
            self.url_gen.click_url(item, response).unwrap_or_default()
        };

        let debug = if response.request.debug {
            Some(serde_json::to_value(ItemDebug {
                http: &response.request.http,
                unit: item,
            })?)
        } else {
            None
        };

        Ok(Item {
            id: item.id.clone(),
            kind: item.format.kind.name().to_string(),
            url,
            content: item.content.clone().unwrap_or_default(),
            content_url: item.content_url.clone().unwrap_or_default(),
            fields: no_empty_fields(&item.fields),
            assets: self.assets.process(&item.assets, self.url_gen.as_ref()),
            tracker: self.trackers.item_tracker(item, response),
            meta: self.meta.build(item, response),
            debug,
        })
    }
}

/// 去掉空字符串、空数组和 null，全部为空时返回 None
fn no_empty_fields(fields: &Map<String, Value>) -> Option<Map<String, Value>> {
    let cleaned: Map<String, Value> = fields
        .iter()
        .filter(|(_, v)| match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => true,
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// JSONP 回调名只允许标识符字符，否则使用默认值
fn callback_name(http: &HttpContext) -> &str {
    match http.query_param("callback") {
        Some(cb)
            if !cb.is_empty()
                && cb
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.') =>
        {
            cb
        }
        _ => DEFAULT_CALLBACK,
    }
}

/// `format=jsonp` 时包装为 `callback(...)`
pub fn encode(resp: &Response, http: &HttpContext) -> Result<Payload, RenderError> {
    let body = serde_json::to_vec(resp)?;
    if http.query_param("format") == Some("jsonp") {
        let callback = callback_name(http);
        let mut wrapped = Vec::with_capacity(body.len() + callback.len() + 2);
        wrapped.extend_from_slice(callback.as_bytes());
        wrapped.push(b'(');
        wrapped.extend_from_slice(&body);
        wrapped.push(b')');
        return Ok(Payload::new(StatusCode::OK, CONTENT_TYPE_JS, wrapped));
    }
    Ok(Payload::new(StatusCode::OK, CONTENT_TYPE_JSON, body))
}

/// 渲染失败时的通用错误文档，仍然是合法 JSON
pub fn error_payload(err: &RenderError) -> Payload {
    let body = serde_json::to_vec(&ErrorDocument {
        version: "1",
        error: err.to_string(),
    })
    .unwrap_or_else(|_| br#"{"version":"1","error":"internal error"}"#.to_vec());
    Payload::new(StatusCode::INTERNAL_SERVER_ERROR, CONTENT_TYPE_JSON, body)
}

#[async_trait]
impl Endpoint for DynamicEndpoint {
    fn codename(&self) -> &'static str {
        "dynamic"
    }

    async fn handle(&self, source: &dyn Source, request: BidRequest) -> HttpResponse {
        let request = Arc::new(request);
        // 机器人流量不参与竞价，只输出空组追踪
        let response = if request.robot {
            BidResponse::empty(request.clone())
        } else {
            source.bid(request.clone()).await
        };

        match self.render(&response).and_then(|doc| encode(&doc, &request.http)) {
            Ok(payload) => payload.into_response(),
            Err(err) => {
                error!(
                    error = %err,
                    request_id = %request.id,
                    auction_id = %request.auction_id,
                    "render dynamic response"
                );
                error_payload(&err).into_response()
            }
        }
    }
}
