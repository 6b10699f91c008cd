// src/endpoints/direct.rs

use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::endpoints::Endpoint;
use crate::error::RenderError;
use crate::events::EventStream;
use crate::model::{BidRequest, BidResponse, EventStatus, EventType, Format, FormatType};
use crate::source::Source;
use crate::urlgen::prepare_url;

const CHANNEL: &str = "direct";
const HEADER_ALTERNATIVE: &str = "x-status-alternative";
const HEADER_FAILOVER: &str = "x-status-failover";
const FAILOVER_NOTICE: &str = "Please add superfailover link";

/// noredirect 调试输出
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DebugResponse {
    pub id: String,
    pub zone_id: u64,
    pub impression_id: String,
    pub auction_id: String,
    pub is_alternative_link: bool,
    pub link: String,
    pub superfailover: String,
    pub error: Option<String>,
    pub is_empty: bool,
}

/// 竞价结果解析出的跳转目标
#[derive(Debug, Default)]
pub struct Resolution {
    pub id: String,
    pub zone_id: u64,
    pub impression_id: String,
    pub link: String,
    pub alternative: bool,
    pub error: Option<RenderError>,
}

/// 最终输出
#[derive(Debug)]
pub enum DirectReply {
    Trace(DebugResponse),
    Redirect { location: HeaderValue, alternative: bool },
    Notice,
    Failover(HeaderValue),
}

impl IntoResponse for DirectReply {
    fn into_response(self) -> Response {
        match self {
            DirectReply::Trace(debug) => match serde_json::to_vec(&debug) {
                Ok(body) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response(),
                Err(err) => {
                    error!(error = %err, "encode direct debug response");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
            DirectReply::Redirect { location, alternative } => {
                let mut resp = (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
                if alternative {
                    resp.headers_mut()
                        .insert(HEADER_ALTERNATIVE, HeaderValue::from_static("1"));
                }
                resp
            }
            DirectReply::Notice => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                FAILOVER_NOTICE,
            )
                .into_response(),
            DirectReply::Failover(location) => {
                let mut resp = (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
                resp.headers_mut()
                    .insert(HEADER_FAILOVER, HeaderValue::from_static("1"));
                resp
            }
        }
    }
}

/// direct 协议：竞价结果最多一个广告，解析为单个跳转链接
pub struct DirectEndpoint {
    formats: Vec<Format>,
    superfailover_url: String,
    events: Arc<dyn EventStream>,
}

impl DirectEndpoint {
    pub fn new(formats: Vec<Format>, superfailover_url: &str, events: Arc<dyn EventStream>) -> Self {
        Self {
            formats,
            superfailover_url: superfailover_url.to_string(),
            events,
        }
    }

    /// 展示位只接受 direct 格式，不限尺寸
    pub fn prepare(&self, mut request: BidRequest) -> BidRequest {
        request.update_impressions(|imp| {
            imp.width = None;
            imp.height = None;
            imp.format_types = vec![FormatType::Direct];
        });
        request.with_formats(self.formats.clone())
    }

    pub fn resolve(response: &BidResponse) -> Resolution {
        let mut res = Resolution::default();

        if response.is_empty() {
            if let Some(imp) = response.request.impressions.first() {
                res.impression_id = imp.id.clone();
                res.zone_id = imp.target_id();
                if let Some(link) = imp.alternative_ad_code(CHANNEL) {
                    res.link = link.to_string();
                    res.alternative = true;
                }
            }
            return res;
        }

        if let Err(err) = response.validate() {
            res.error = Some(err);
            return res;
        }
        let ad = &response.ads[0];
        if response.count() > 1 || ad.is_bundle() {
            res.error = Some(RenderError::MultipleDirectNotSupported);
            return res;
        }

        res.impression_id = ad.impression_id().to_string();
        res.zone_id = response
            .request
            .impression(&res.impression_id)
            .map(|imp| imp.target_id())
            .unwrap_or(0);

        let Some(item) = ad.items().first() else {
            return res;
        };
        res.id = item.ad_id.clone();
        if !item.is_direct() {
            res.error = Some(RenderError::InvalidResponseType);
            return res;
        }

        let link = prepare_url(&item.action_url, response, item);
        if HeaderValue::from_str(&link).is_err() {
            res.error = Some(RenderError::InvalidLink(link));
        } else {
            res.link = link;
        }
        res
    }

    /// 优先级：调试输出 > 广告 / 备用链接 > 提示文本 > superfailover
    pub fn dispatch(&self, response: &BidResponse, res: &Resolution) -> DirectReply {
        let request = &response.request;
        if request.is_no_redirect_trace() {
            return DirectReply::Trace(DebugResponse {
                id: res.id.clone(),
                zone_id: res.zone_id,
                impression_id: res.impression_id.clone(),
                auction_id: request.auction_id.clone(),
                is_alternative_link: res.alternative,
                link: res.link.clone(),
                superfailover: self.superfailover_url.clone(),
                error: res.error.as_ref().map(ToString::to_string),
                is_empty: response.is_empty(),
            });
        }

        if !res.link.is_empty() {
            match HeaderValue::from_str(&res.link) {
                Ok(location) => {
                    return DirectReply::Redirect {
                        location,
                        alternative: res.alternative,
                    }
                }
                Err(err) => error!(
                    error = %err,
                    request_id = %request.id,
                    link = %res.link,
                    "invalid direct link, using failover"
                ),
            }
        }

        match HeaderValue::from_str(&self.superfailover_url) {
            Ok(location) if !self.superfailover_url.is_empty() => DirectReply::Failover(location),
            _ => DirectReply::Notice,
        }
    }

    /// 投递 direct 事件；出错、无广告或调试请求时跳过
    fn send_view_event(&self, response: &BidResponse) {
        if response.error.is_some() || response.is_empty() {
            return;
        }
        let request = &response.request;
        if request.is_no_redirect_trace() {
            info!(request_id = %request.id, "skip event log");
            return;
        }
        let Some(item) = response.ads[0].items().first() else {
            return;
        };
        if let Err(err) = self
            .events
            .send(EventType::Direct, EventStatus::Success, response, item)
        {
            error!(error = %err, request_id = %request.id, "send direct event");
        }
    }
}

#[async_trait]
impl Endpoint for DirectEndpoint {
    fn codename(&self) -> &'static str {
        "direct"
    }

    fn requires_zone(&self) -> bool {
        false
    }

    async fn handle(&self, source: &dyn Source, request: BidRequest) -> Response {
        let request = Arc::new(self.prepare(request));
        let response = source.bid(request.clone()).await;
        let resolution = Self::resolve(&response);
        let reply = self.dispatch(&response, &resolution);

        match &resolution.error {
            Some(err) => error!(
                error = %err,
                request_id = %request.id,
                auction_id = %request.auction_id,
                "exec direct"
            ),
            None => self.send_view_event(&response),
        }
        reply.into_response()
    }
}
