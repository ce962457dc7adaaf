//! Scrape pipeline for ranked fighter statistics.
//!
//! Four data sources feed one orchestrator:
//!
//! - [`rankings::WikipediaRankings`] discovers the ranked fighters per
//!   division from the encyclopedia ranking page,
//! - [`resolver::FallbackResolver`] turns each ranking-table hint into a
//!   Sherdog profile key (article infobox first, name search second),
//! - [`sherdog::SherdogProfiles`] fetches and parses profile pages,
//! - [`youtube::YoutubeVideos`] attaches up to five fight videos.
//!
//! [`pipeline::Pipeline`] drives them with bounded per-division
//! concurrency and per-fighter failure isolation.

pub mod google;
pub mod http;
pub mod pipeline;
pub mod rankings;
pub mod resolver;
pub mod sherdog;
pub mod sources;
pub mod youtube;

pub use http::HttpClient;
pub use pipeline::{Pipeline, PipelineOptions};
