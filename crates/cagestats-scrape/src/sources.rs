//! Capability interfaces the pipeline drives.
//!
//! Each upstream source sits behind one of these traits so the
//! orchestration logic can be exercised against mocks. The pipeline
//! treats every implementation as a black box: what a hint or key means
//! is a contract between the sources, not something it inspects.

use async_trait::async_trait;

use cagestats::models::{Fighter, QuotaPartition, RankedDivision};

/// Yields the ordered divisions with their ranked entries. The one
/// source whose failure aborts a run.
#[async_trait]
pub trait RankingSource: Send + Sync {
    async fn ranked_divisions(&self) -> anyhow::Result<Vec<RankedDivision>>;
}

/// Turns a ranking-table hint into a profile key, or `None` when every
/// resolution path has failed. Implementations log their own failures;
/// the pipeline only decides to drop.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    async fn resolve(&self, hint: &str) -> Option<String>;
}

/// Primary resolution path: the fighter's encyclopedia profile page.
#[async_trait]
pub trait ProfilePath: Send + Sync {
    async fn profile_key(&self, hint: &str) -> anyhow::Result<String>;
}

/// Secondary resolution path: a name-based external search.
#[async_trait]
pub trait SearchPath: Send + Sync {
    async fn search_key(&self, name: &str) -> anyhow::Result<String>;
}

/// Fetches and parses one fighter profile. A single attempt; the
/// pipeline owns the retry loop and the per-attempt timeout.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, key: &str) -> anyhow::Result<Fighter>;
}

/// Looks up related fight videos for a fighter, at most five.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn fighter_videos(
        &self,
        name: &str,
        partition: QuotaPartition,
    ) -> anyhow::Result<Vec<String>>;
}
