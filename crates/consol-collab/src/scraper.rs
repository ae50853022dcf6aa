//! Content scraping contract and batch fan-out.
//!
//! ```text
//! terms ──spawn──▶ JoinSet ──▶ (term, items) ──▶ BatchResults
//!                    │
//!                    └── failed / panicked task ──▶ failed_terms
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::Result;

/// Engagement of one piece of content.
///
/// Placeholder figures a scraper makes up when the platform exposes no
/// metrics are always `Synthetic`, so they never pass for measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "origem", content = "valor")]
pub enum Engagement {
    #[serde(rename = "medido")]
    Measured(f64),
    #[serde(rename = "sintetico")]
    Synthetic(f64),
}

impl Engagement {
    pub fn value(self) -> f64 {
        match self {
            Engagement::Measured(v) | Engagement::Synthetic(v) => v,
        }
    }

    pub fn is_measured(self) -> bool {
        matches!(self, Engagement::Measured(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub image_url: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "plataforma")]
    pub platform: String,
    pub engagement: Engagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformLimits {
    pub platforms: Vec<String>,
    /// Item budget per search term, split evenly across platforms.
    pub max_items: usize,
}

impl PlatformLimits {
    pub fn per_platform(&self) -> usize {
        match self.platforms.len() {
            0 => 0,
            n => self.max_items / n,
        }
    }
}

impl Default for PlatformLimits {
    fn default() -> Self {
        Self {
            platforms: ["instagram", "facebook", "youtube", "tiktok"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_items: 50,
        }
    }
}

#[async_trait]
pub trait ContentScraper: Send + Sync {
    async fn search(&self, term: &str, limits: &PlatformLimits) -> Result<Vec<ContentItem>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResults {
    pub items_by_term: BTreeMap<String, Vec<ContentItem>>,
    pub failed_terms: Vec<String>,
}

impl BatchResults {
    pub fn total_items(&self) -> usize {
        self.items_by_term.values().map(Vec::len).sum()
    }
}

/// Search every distinct term concurrently, one task per term.
///
/// A term whose task errors or panics lands in `failed_terms`; the others
/// are unaffected.
pub async fn scrape_batch(
    scraper: Arc<dyn ContentScraper>,
    terms: &[String],
    limits: &PlatformLimits,
) -> BatchResults {
    let distinct: BTreeSet<&String> = terms.iter().collect();
    let mut tasks = JoinSet::new();

    for term in &distinct {
        let scraper = Arc::clone(&scraper);
        let term = (*term).clone();
        let limits = limits.clone();
        tasks.spawn(async move {
            let result = scraper.search(&term, &limits).await;
            (term, result)
        });
    }

    let mut results = BatchResults::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((term, Ok(items))) => {
                results.items_by_term.insert(term, items);
            }
            Ok((term, Err(e))) => warn!(term = %term, error = %e, "content search failed"),
            Err(e) => warn!(error = %e, "content search task aborted"),
        }
    }

    results.failed_terms = distinct
        .into_iter()
        .filter(|term| !results.items_by_term.contains_key(*term))
        .cloned()
        .collect();

    info!(
        searched = results.items_by_term.len(),
        failed = results.failed_terms.len(),
        items = results.total_items(),
        "content batch finished"
    );
    results
}
