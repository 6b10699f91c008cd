// src/endpoints/dynamic/tracker.rs

use std::sync::Arc;
use tracing::debug;

use crate::endpoints::dynamic::response::Tracker;
use crate::model::{BidResponse, EventStatus, EventType, Impression, ResponseItem};
use crate::urlgen::UrlGenerator;

/// 生成展示 / 可见 / 点击追踪像素
#[derive(Clone)]
pub struct TrackerSynthesizer {
    url_gen: Arc<dyn UrlGenerator>,
}

impl TrackerSynthesizer {
    pub fn new(url_gen: Arc<dyn UrlGenerator>) -> Self {
        Self { url_gen }
    }

    /// 没有条目时用空白条目（绑定展示位和第一个可用格式）生成像素，生成失败返回空串
    pub fn pixel_url(
        &self,
        event: EventType,
        status: EventStatus,
        impression: Option<&Impression>,
        item: Option<&ResponseItem>,
        response: &BidResponse,
        js: bool,
    ) -> String {
        let blank;
        let item = match item {
            Some(item) => item,
            None => {
                let format = response.request.formats.first().cloned().unwrap_or_default();
                blank = ResponseItem::blank(impression, format);
                &blank
            }
        };
        self.url_gen
            .pixel_url(event, status, item, response, js)
            .unwrap_or_else(|err| {
                debug!(error = %err, request_id = %response.request.id, "pixel url generation failed");
                String::new()
            })
    }

    /// 空组 / 顶层使用的自定义追踪块
    pub fn custom_tracker(&self, impression: Option<&Impression>, response: &BidResponse) -> Tracker {
        let pixel = |event| self.pixel_url(event, EventStatus::Custom, impression, None, response, false);
        Tracker {
            impressions: vec![pixel(EventType::Impression)],
            views: vec![pixel(EventType::View)],
            clicks: vec![pixel(EventType::Click)],
        }
    }

    /// 真实条目的追踪块：第三方点击链接直接使用，第三方展示 / 可见链接追加在自有像素之后
    pub fn item_tracker(&self, item: &ResponseItem, response: &BidResponse) -> Tracker {
        let pixel = |event| self.pixel_url(event, EventStatus::Success, None, Some(item), response, false);
        let mut tracker = Tracker {
            impressions: vec![pixel(EventType::Impression)],
            views: vec![pixel(EventType::View)],
            clicks: item.click_trackers.clone(),
        };
        tracker.views.extend(item.view_trackers.iter().cloned());
        tracker.impressions.extend(item.impression_trackers.iter().cloned());
        tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BidRequest, Format, FormatType, Zone};
    use crate::urlgen::TemplateUrlGenerator;

    fn synthesizer(tracker_base: &str) -> TrackerSynthesizer {
        TrackerSynthesizer::new(Arc::new(TemplateUrlGenerator::new(tracker_base, "//c", "", "")))
    }

    fn response(formats: Vec<Format>) -> BidResponse {
        BidResponse::empty(Arc::new(BidRequest {
            auction_id: "auc-1".into(),
            formats,
            ..Default::default()
        }))
    }

    #[test]
    fn blank_item_uses_impression_and_first_format() {
        let zone = Arc::new(Zone {
            id: 9,
            ..Default::default()
        });
        let imp = Impression::new("imp-3", Some(zone));
        let resp = response(vec![Format::new("native", FormatType::Native), Format::new("dl", FormatType::Direct)]);

        let url = synthesizer("//t").pixel_url(EventType::View, EventStatus::Custom, Some(&imp), None, &resp, false);
        assert!(url.contains("imp=imp-3"));
        assert!(url.contains("z=9"));
        assert!(url.contains("f=native"));
    }

    #[test]
    fn blank_item_without_impression_or_formats() {
        let url = synthesizer("//t").pixel_url(EventType::Click, EventStatus::Custom, None, None, &response(vec![]), false);
        assert!(url.starts_with("//t/t/px.gif?"));
        assert!(url.contains("z=0"));
        assert!(url.contains("f=&"));
    }

    #[test]
    fn custom_tracker_populates_all_events() {
        let tracker = synthesizer("//t").custom_tracker(None, &response(vec![]));
        assert_eq!(tracker.impressions.len(), 1);
        assert_eq!(tracker.views.len(), 1);
        assert_eq!(tracker.clicks.len(), 1);
        assert!(tracker.clicks[0].contains("e=click"));
    }

    #[test]
    fn generator_errors_are_swallowed() {
        let url = synthesizer("").pixel_url(EventType::View, EventStatus::Custom, None, None, &response(vec![]), false);
        assert_eq!(url, "");
    }

    #[test]
    fn third_party_links_are_merged() {
        let item = ResponseItem {
            id: "bid-1".into(),
            impression_id: "imp-1".into(),
            click_trackers: vec!["https://3p/click".into()],
            view_trackers: vec!["https://3p/view".into()],
            impression_trackers: vec!["https://3p/imp".into()],
            ..Default::default()
        };
        let tracker = synthesizer("//t").item_tracker(&item, &response(vec![]));
        assert_eq!(tracker.clicks, vec!["https://3p/click".to_string()]);
        assert_eq!(tracker.views.len(), 2);
        assert!(tracker.views[0].contains("e=view"));
        assert_eq!(tracker.views[1], "https://3p/view");
        assert_eq!(tracker.impressions[1], "https://3p/imp");
    }
}
