//! CLI commands: wiring settings into the pipeline, server, and scheduler.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use tracing::warn;

use cagestats::config::Settings;
use cagestats::storage;
use cagestats_scrape::google::GoogleSearch;
use cagestats_scrape::pipeline::{Pipeline, PipelineOptions};
use cagestats_scrape::rankings::WikipediaRankings;
use cagestats_scrape::resolver::{FallbackResolver, WikipediaProfilePath};
use cagestats_scrape::sherdog::SherdogProfiles;
use cagestats_scrape::sources::{SearchPath, VideoSource};
use cagestats_scrape::youtube::{NoVideos, YoutubeVideos};
use cagestats_scrape::HttpClient;

/// Run one scrape and publish the result.
pub async fn cmd_scrape(settings: &Settings) -> anyhow::Result<()> {
    let path = run_scrape(settings).await?;
    println!(
        "{} rankings published to {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}

/// Serve the published file, read-only.
pub async fn cmd_serve(settings: Settings, listen: SocketAddr) -> anyhow::Result<()> {
    println!("{} serving on http://{}", style("→").cyan(), listen);
    cagestats_server::serve(Arc::new(settings), listen).await
}

/// Serve while the scheduler scrapes once a day.
pub async fn cmd_run(settings: Settings, listen: SocketAddr) -> anyhow::Result<()> {
    let settings = Arc::new(settings);

    let schedule_settings = settings.clone();
    tokio::spawn(async move {
        scheduler_loop(schedule_settings).await;
    });

    println!(
        "{} serving on http://{} with a daily scrape at {:02}:00 UTC",
        style("→").cyan(),
        listen,
        settings.scrape_hour_utc
    );
    cagestats_server::serve(settings, listen).await
}

async fn scheduler_loop(settings: Arc<Settings>) {
    crate::scheduler::run_daily(settings.scrape_hour_utc, || {
        let settings = settings.clone();
        async move { run_scrape(&settings).await.map(|_| ()) }
    })
    .await;
}

/// Build the pipeline from settings and run it once. A failed run
/// changes nothing on disk; the previously published file stays
/// authoritative.
pub(crate) async fn run_scrape(settings: &Settings) -> anyhow::Result<PathBuf> {
    let pipeline = build_pipeline(settings)?;
    let divisions = pipeline.run().await?;
    let json = serde_json::to_string_pretty(&divisions)?;
    let path = storage::publish(settings, &json)?;
    Ok(path)
}

/// Construct the HTTP client once and hand it to every source.
fn build_pipeline(settings: &Settings) -> anyhow::Result<Pipeline> {
    let http = HttpClient::new(
        &settings.user_agent,
        Duration::from_secs(settings.request_timeout),
    )?;

    let rankings = WikipediaRankings::new(http.clone());

    let search: Option<Arc<dyn SearchPath>> = match (
        settings.credentials.google_api_key.clone(),
        settings.credentials.google_engine_id.clone(),
    ) {
        (Some(key), Some(engine_id)) => {
            Some(Arc::new(GoogleSearch::new(http.clone(), key, engine_id)))
        }
        _ => {
            warn!("search credentials not configured; profile resolution has no fallback path");
            None
        }
    };
    let resolver = FallbackResolver::new(
        Arc::new(WikipediaProfilePath::new(http.clone())),
        search,
    );

    let profiles = SherdogProfiles::new(http.clone());

    let videos: Arc<dyn VideoSource> = match (
        settings.credentials.youtube_api_key_primary.clone(),
        settings.credentials.youtube_api_key_secondary.clone(),
    ) {
        (Some(primary), Some(secondary)) => {
            Arc::new(YoutubeVideos::new(http, primary, secondary))
        }
        _ => {
            warn!("video credentials not configured; fighters will be published without videos");
            Arc::new(NoVideos)
        }
    };

    let options = PipelineOptions {
        division_concurrency: settings.division_concurrency,
        fetch_retries: settings.fetch_retries,
        fetch_timeout: Duration::from_secs(settings.request_timeout),
        retry_delay: Duration::from_millis(settings.retry_delay_ms),
    };

    Ok(Pipeline::new(
        Arc::new(rankings),
        Arc::new(resolver),
        Arc::new(profiles),
        videos,
        options,
    ))
}
