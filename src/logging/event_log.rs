// src/logging/event_log.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{BidResponse, EventStatus, EventType, ResponseItem};

/// **追踪事件日志**
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub timestamp: String,     // 记录时间
    pub event: String,         // 事件类型，如 "direct"
    pub status: u8,            // 事件状态码
    pub request_id: String,    // 请求 ID
    pub auction_id: String,    // 竞价 ID
    pub impression_id: String, // 展示位 ID
    pub zone_id: u64,          // 广告位 ID
    pub bid_id: String,        // 响应条目 ID
    pub ad_id: String,         // 创意 ID
    pub format: String,        // 格式 codename
    pub ip: String,            // 客户端 IP
    pub user_agent: String,    // 客户端 UA
}

impl EventRecord {
    /// **根据竞价结果和条目创建事件**
    pub fn new(event: EventType, status: EventStatus, response: &BidResponse, item: &ResponseItem) -> Self {
        let request = &response.request;
        Self {
            timestamp: Utc::now().to_rfc3339(),
            event: event.code().to_string(),
            status: status.code(),
            request_id: request.id.clone(),
            auction_id: request.auction_id.clone(),
            impression_id: item.impression_id.clone(),
            zone_id: item.zone_id,
            bid_id: item.id.clone(),
            ad_id: item.ad_id.clone(),
            format: item.format.codename.clone(),
            ip: request.http.ip.clone(),
            user_agent: request.http.header("user-agent").unwrap_or_default().to_string(),
        }
    }
}
