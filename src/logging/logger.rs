// src/logging/logger.rs

use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Duration};
use tracing::error;
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::EventError;
use crate::events::EventStream;
use crate::logging::event_log::EventRecord;
use crate::model::{BidResponse, EventStatus, EventType, ResponseItem};

/// 事件日志管理器：请求路径只做 try_send，后台任务批量落盘
#[derive(Clone)]
pub struct EventLogger {
    sender: Sender<String>,
}

impl EventLogger {
    /// 写入 `log_dir/events.json`，按小时滚动
    pub fn new(
        log_dir: &str,
        buffer_size: usize,
        batch_size: usize,
        flush_interval: u64,
    ) -> (Self, JoinHandle<()>) {
        let log_file = Arc::new(rolling::hourly(log_dir, "events.json"));
        Self::with_writer(log_file, buffer_size, batch_size, flush_interval)
    }

    pub fn with_writer<W>(
        writer: Arc<W>,
        buffer_size: usize,
        batch_size: usize,
        flush_interval: u64,
    ) -> (Self, JoinHandle<()>)
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let handle = tokio::spawn(Self::background_writer(
            writer,
            receiver,
            batch_size.max(1),
            flush_interval.max(1),
        ));
        (Self { sender }, handle)
    }

    /// 所有 sender 释放后刷出剩余数据并退出
    async fn background_writer<W>(
        writer: Arc<W>,
        mut receiver: Receiver<String>,
        batch_size: usize,
        flush_interval: u64,
    ) where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let mut buffer = Vec::with_capacity(batch_size);
        let mut interval = time::interval(Duration::from_millis(flush_interval));

        loop {
            tokio::select! {
                line = receiver.recv() => match line {
                    Some(line) => {
                        buffer.push(line);
                        if buffer.len() >= batch_size {
                            Self::write_to_disk(writer.clone(), &mut buffer).await;
                        }
                    }
                    None => {
                        if !buffer.is_empty() {
                            Self::write_to_disk(writer.clone(), &mut buffer).await;
                        }
                        break;
                    }
                },
                _ = interval.tick() => {
                    if !buffer.is_empty() {
                        Self::write_to_disk(writer.clone(), &mut buffer).await;
                    }
                }
            }
        }
    }

    async fn write_to_disk<W>(writer: Arc<W>, buffer: &mut Vec<String>)
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let content = std::mem::take(buffer).join("\n") + "\n";
        let result = task::spawn_blocking(move || {
            let mut out = writer.make_writer();
            out.write_all(content.as_bytes())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!(error = %err, "failed to write event log"),
            Err(err) => error!(error = %err, "event log writer task failed"),
        }
    }
}

impl EventStream for EventLogger {
    fn send(
        &self,
        event: EventType,
        status: EventStatus,
        response: &BidResponse,
        item: &ResponseItem,
    ) -> Result<(), EventError> {
        let line = serde_json::to_string(&EventRecord::new(event, status, response, item))?;
        self.sender.try_send(line).map_err(|err| match err {
            TrySendError::Full(_) => EventError::QueueFull,
            TrySendError::Closed(_) => EventError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BidRequest, Format, FormatType};
    use std::sync::Mutex;

    fn response() -> BidResponse {
        BidResponse::empty(Arc::new(BidRequest {
            id: "req-1".into(),
            auction_id: "auc-1".into(),
            ..Default::default()
        }))
    }

    fn item() -> ResponseItem {
        ResponseItem {
            id: "bid-1".into(),
            ad_id: "ad-1".into(),
            impression_id: "imp-1".into(),
            zone_id: 3,
            format: Format::new("dl", FormatType::Direct),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn flushes_pending_records_on_close() {
        let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
        let (logger, handle) = EventLogger::with_writer(sink.clone(), 16, 100, 60_000);

        logger
            .send(EventType::Direct, EventStatus::Success, &response(), &item())
            .unwrap();
        logger
            .send(EventType::View, EventStatus::Success, &response(), &item())
            .unwrap();
        drop(logger);
        handle.await.unwrap();

        let written = String::from_utf8(sink.lock().unwrap().clone()).unwrap();
        let records: Vec<EventRecord> = written
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event, "direct");
        assert_eq!(records[0].auction_id, "auc-1");
        assert_eq!(records[1].event, "view");
        assert_eq!(records[1].zone_id, 3);
    }

    #[tokio::test]
    async fn full_queue_is_reported() {
        let (sender, _receiver) = mpsc::channel(1);
        let logger = EventLogger { sender };
        logger
            .send(EventType::Direct, EventStatus::Success, &response(), &item())
            .unwrap();
        let err = logger
            .send(EventType::Direct, EventStatus::Success, &response(), &item())
            .unwrap_err();
        assert!(matches!(err, EventError::QueueFull));
    }
}
