// src/endpoints/dynamic/meta.rs

use std::collections::BTreeMap;

use crate::config::MetaConfig;
use crate::endpoints::dynamic::response::{MetaInfo, MetaLink};
use crate::model::{BidResponse, ResponseItem};
use crate::urlgen::prepare_url;

#[derive(Debug, Clone, Default)]
pub struct MetaAssembler {
    config: MetaConfig,
}

impl MetaAssembler {
    pub fn new(config: MetaConfig) -> Self {
        Self { config }
    }

    /// 链接和广告主都为空时返回 None
    pub fn build(&self, item: &ResponseItem, response: &BidResponse) -> Option<MetaInfo> {
        let entries = [
            ("report", "Report this Ad", &self.config.report_url),
            ("about", "About this Ad", &self.config.about_url),
            ("hide", "Hide this Ad", &self.config.hide_url),
        ];
        let links: BTreeMap<String, MetaLink> = entries
            .iter()
            .filter(|(_, _, url)| !url.is_empty())
            .map(|(key, title, url)| {
                (
                    key.to_string(),
                    MetaLink {
                        title: title.to_string(),
                        url: prepare_url(url, response, item),
                    },
                )
            })
            .collect();

        let meta = MetaInfo {
            advertiser: item.advertiser.clone().filter(|a| !a.is_empty()),
            links,
        };
        (!meta.is_empty()).then_some(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BidRequest;
    use std::sync::Arc;

    fn response() -> BidResponse {
        BidResponse::empty(Arc::new(BidRequest::default()))
    }

    #[test]
    fn nothing_configured_yields_none() {
        let item = ResponseItem::default();
        assert!(MetaAssembler::default().build(&item, &response()).is_none());
    }

    #[test]
    fn only_non_empty_urls_are_included() {
        let assembler = MetaAssembler::new(MetaConfig {
            report_url: "https://ads.example/report?ad={adid}".into(),
            about_url: String::new(),
            hide_url: "https://ads.example/hide".into(),
        });
        let item = ResponseItem {
            ad_id: "ad-5".into(),
            advertiser: Some("Example Shop".into()),
            ..Default::default()
        };
        let meta = assembler.build(&item, &response()).unwrap();
        assert_eq!(meta.advertiser.as_deref(), Some("Example Shop"));
        assert_eq!(meta.links.len(), 2);
        assert_eq!(meta.links["report"].url, "https://ads.example/report?ad=ad-5");
        assert_eq!(meta.links["report"].title, "Report this Ad");
        assert!(!meta.links.contains_key("about"));
    }
}
