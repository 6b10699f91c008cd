// src/endpoints/dynamic/assets.rs

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::endpoints::dynamic::response::{Asset, AssetThumb};
use crate::model;
use crate::urlgen::UrlGenerator;

/// 同名素材的去重策略
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetDedupPolicy {
    /// 保留第一个
    FirstWins,
    /// 后出现的覆盖之前的
    #[default]
    LastWins,
    /// 每次重复以 50% 概率覆盖
    Random,
}

impl AssetDedupPolicy {
    fn replaces<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self {
            AssetDedupPolicy::FirstWins => false,
            AssetDedupPolicy::LastWins => true,
            AssetDedupPolicy::Random => rng.gen_bool(0.5),
        }
    }
}

/// 按名称去重并重写素材路径（CDN）
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetDeduplicator {
    policy: AssetDedupPolicy,
}

impl AssetDeduplicator {
    pub fn new(policy: AssetDedupPolicy) -> Self {
        Self { policy }
    }

    pub fn process(&self, assets: &[model::Asset], url_gen: &dyn UrlGenerator) -> Vec<Asset> {
        self.process_with(assets, url_gen, &mut rand::thread_rng())
    }

    pub fn process_with<R: Rng + ?Sized>(
        &self,
        assets: &[model::Asset],
        url_gen: &dyn UrlGenerator,
        rng: &mut R,
    ) -> Vec<Asset> {
        let mut result: Vec<Asset> = Vec::with_capacity(assets.len());
        let mut processed: HashMap<&str, usize> = HashMap::with_capacity(assets.len());

        for source in assets {
            match processed.get(source.name.as_str()) {
                None => {
                    processed.insert(&source.name, result.len());
                    result.push(rewrite(source, url_gen));
                }
                Some(&idx) => {
                    if self.policy.replaces(rng) {
                        result[idx] = rewrite(source, url_gen);
                    }
                }
            }
        }
        result
    }
}

fn rewrite(asset: &model::Asset, url_gen: &dyn UrlGenerator) -> Asset {
    Asset {
        name: asset.name.clone(),
        path: url_gen.cdn_url(&asset.path),
        kind: asset.kind.code().to_string(),
        width: asset.width,
        height: asset.height,
        thumbs: asset
            .thumbs
            .iter()
            .map(|th| AssetThumb {
                path: url_gen.cdn_url(&th.path),
                kind: th.kind.code().to_string(),
                width: th.width,
                height: th.height,
            })
            .collect(),
    }
}
