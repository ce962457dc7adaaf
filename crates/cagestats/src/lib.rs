//! Core types for the cagestats ranking aggregator.
//!
//! This crate holds the data model shared by the scrape pipeline, the
//! read-only server, and the CLI, together with configuration loading
//! and the published-file persistence layer.

pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::{Config, Credentials, Settings};
pub use error::{FighterError, PipelineError};
