// src/bidding/engine.rs

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bidding::catalog::Creative;
use crate::error::BidError;
use crate::model::{Ad, BidRequest, BidResponse, Format, Impression};
use crate::source::Source;

/// 基于本地创意库的演示竞价源：每个展示位在可投放创意中随机选择一个
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    creatives: Vec<Creative>,
}

impl CatalogSource {
    pub fn new(creatives: Vec<Creative>) -> Self {
        Self { creatives }
    }

    /// 列出展示位可投放的创意及其格式
    fn candidates<'a>(
        &'a self,
        request: &'a BidRequest,
        impression: &'a Impression,
    ) -> Vec<(&'a Creative, &'a Format)> {
        self.creatives
            .iter()
            .filter_map(|creative| {
                request
                    .formats
                    .iter()
                    .find(|f| f.codename == creative.format)
                    .map(|format| (creative, format))
            })
            .filter(|(_, format)| impression.allows(format))
            .collect()
    }

    fn run_auction<R: Rng + ?Sized>(&self, request: &BidRequest, rng: &mut R) -> Vec<Ad> {
        request
            .impressions
            .iter()
            .filter_map(|imp| {
                let candidates = self.candidates(request, imp);
                let (creative, format) = candidates.choose(rng)?;
                debug!(
                    request_id = %request.id,
                    impression_id = %imp.id,
                    ad_id = %creative.id,
                    candidates = candidates.len(),
                    "creative selected"
                );
                let bid_id = Uuid::new_v4().to_string();
                Some(Ad::Item(creative.to_item(&bid_id, imp, format)))
            })
            .collect()
    }
}

#[async_trait]
impl Source for CatalogSource {
    async fn bid(&self, request: Arc<BidRequest>) -> BidResponse {
        // 创意库按广告位投放，未知广告位不参与竞价
        if let Some(imp) = request.impressions.iter().find(|imp| imp.target.is_none()) {
            let error = BidError::NoTarget(imp.id.clone());
            warn!(request_id = %request.id, error = %error, "auction skipped");
            return BidResponse::with_error(request, error);
        }

        let ads = self.run_auction(&request, &mut rand::thread_rng());
        info!(
            request_id = %request.id,
            auction_id = %request.auction_id,
            impressions = request.impressions.len(),
            filled = ads.len(),
            "auction finished"
        );
        BidResponse::new(request, ads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FormatType, Zone};

    fn creative(id: &str, format: &str) -> Creative {
        Creative {
            id: id.into(),
            format: format.into(),
            action_url: format!("https://adv.example/{}", id),
            ..Default::default()
        }
    }

    fn request(format_types: Vec<FormatType>) -> Arc<BidRequest> {
        let zone = Arc::new(Zone {
            id: 7,
            ..Default::default()
        });
        let mut imp = Impression::new("imp-1", Some(zone.clone()));
        imp.format_types = format_types;
        Arc::new(BidRequest {
            id: "req-1".into(),
            impressions: vec![imp, Impression::new("imp-2", Some(zone))],
            formats: vec![
                Format::new("dl", FormatType::Direct),
                Format::new("banner", FormatType::Banner),
            ],
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn fills_every_impression_with_a_matching_creative() {
        let source = CatalogSource::new(vec![creative("a", "dl"), creative("b", "banner")]);
        let response = source.bid(request(vec![FormatType::Direct])).await;

        assert_eq!(response.count(), 2);
        let first = &response.ads[0].items()[0];
        assert_eq!(first.ad_id, "a");
        assert_eq!(first.zone_id, 7);
        assert!(first.is_direct());
        assert_eq!(response.ads[1].impression_id(), "imp-2");
    }

    #[tokio::test]
    async fn unknown_formats_leave_impressions_unfilled() {
        let source = CatalogSource::new(vec![creative("a", "missing")]);
        let response = source.bid(request(Vec::new())).await;
        assert!(response.is_empty());
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn impression_without_zone_is_a_source_error() {
        let source = CatalogSource::new(vec![creative("a", "dl")]);
        let request = Arc::new(BidRequest {
            impressions: vec![Impression::new("imp-1", None)],
            formats: vec![Format::new("dl", FormatType::Direct)],
            ..Default::default()
        });
        let response = source.bid(request).await;
        assert!(response.is_empty());
        assert_eq!(response.error, Some(BidError::NoTarget("imp-1".into())));
    }
}
