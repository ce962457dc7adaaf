//! Error taxonomy for the scrape pipeline.
//!
//! Two tiers: `PipelineError` aborts a whole run, `FighterError` drops a
//! single fighter and lets the rest of the batch continue. Missing fields
//! and failed enrichment lookups are not errors at all; the affected
//! fields keep their defaults.

use thiserror::Error;

/// Fatal failures. A run that hits one of these produces no output and
/// leaves the previously published file in place.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The ranking tables could not be retrieved or located. There is no
    /// fallback for the ranking page itself.
    #[error("ranking tables unavailable: {0}")]
    Rankings(#[source] anyhow::Error),

    #[error("failed to serialize rankings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to publish rankings: {0}")]
    Publish(#[from] std::io::Error),
}

/// Per-fighter failures. Logged with stage context, then swallowed at the
/// task boundary; the fighter is dropped from its division.
#[derive(Debug, Error)]
pub enum FighterError {
    #[error("no profile key resolved for hint {hint:?}")]
    Unresolved { hint: String },

    #[error("profile fetch gave up after {attempts} attempts")]
    FetchExhausted {
        attempts: u32,
        #[source]
        last: anyhow::Error,
    },
}
