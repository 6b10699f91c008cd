// src/events.rs

use crate::error::EventError;
use crate::model::{BidResponse, EventStatus, EventType, ResponseItem};

/// 事件投递通道，调用方不等待结果，失败只记录日志
pub trait EventStream: Send + Sync {
    fn send(
        &self,
        event: EventType,
        status: EventStatus,
        response: &BidResponse,
        item: &ResponseItem,
    ) -> Result<(), EventError>;
}

/// 丢弃所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventStream;

impl EventStream for NoopEventStream {
    fn send(
        &self,
        _event: EventType,
        _status: EventStatus,
        _response: &BidResponse,
        _item: &ResponseItem,
    ) -> Result<(), EventError> {
        Ok(())
    }
}
