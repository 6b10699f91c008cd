// src/model/events.rs

use serde::Serialize;

/// 追踪事件类型
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Impression,
    View,
    Click,
    Direct,
}

impl EventType {
    pub fn code(&self) -> &'static str {
        match self {
            EventType::Impression => "imp",
            EventType::View => "view",
            EventType::Click => "click",
            EventType::Direct => "direct",
        }
    }
}

/// 事件状态：Success 为真实广告，Custom 为空白占位追踪
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Custom,
}

impl EventStatus {
    pub fn code(&self) -> u8 {
        match self {
            EventStatus::Success => 0,
            EventStatus::Custom => 2,
        }
    }
}
