//! The scrape orchestration pipeline.
//!
//! One run walks every division the ranking source declares, resolves
//! each ranked fighter to a profile key, fetches and parses the profile
//! under a retry ceiling, attaches videos, and reassembles the results
//! in rank order. Divisions are processed sequentially in source order;
//! fighters within a division run concurrently behind a per-division
//! semaphore so the upstream sites never see more than a bounded number
//! of in-flight requests.
//!
//! Failure handling is strictly tiered: only a ranking-source failure
//! aborts the run. Everything after that is per-fighter. A fighter
//! whose resolution or fetch fails is logged and dropped, and a failed
//! video lookup just leaves the fighter without videos.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use cagestats::error::{FighterError, PipelineError};
use cagestats::models::{Division, Fighter, QuotaPartition, RankEntry, RankedDivision};

use crate::sources::{ProfileResolver, ProfileSource, RankingSource, VideoSource};

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Max concurrent per-fighter pipelines within one division. Tune
    /// down to 1 when the upstream sources start throttling.
    pub division_concurrency: usize,
    /// Profile-fetch attempts before the fighter is dropped.
    pub fetch_retries: u32,
    /// Per-attempt budget covering the fetch and the parse.
    pub fetch_timeout: Duration,
    /// Pause between profile-fetch attempts.
    pub retry_delay: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            division_concurrency: 16,
            fetch_retries: 3,
            fetch_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Drives the four data sources through one full scrape.
pub struct Pipeline {
    rankings: Arc<dyn RankingSource>,
    resolver: Arc<dyn ProfileResolver>,
    profiles: Arc<dyn ProfileSource>,
    videos: Arc<dyn VideoSource>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        rankings: Arc<dyn RankingSource>,
        resolver: Arc<dyn ProfileResolver>,
        profiles: Arc<dyn ProfileSource>,
        videos: Arc<dyn VideoSource>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            rankings,
            resolver,
            profiles,
            videos,
            options,
        }
    }

    /// Run one full scrape. Returns the divisions in the ranking
    /// source's order, each with its fighters sorted ascending by rank.
    pub async fn run(&self) -> Result<Vec<Division>, PipelineError> {
        let divisions = self
            .rankings
            .ranked_divisions()
            .await
            .map_err(PipelineError::Rankings)?;

        let total = divisions.len();
        info!(divisions = total, "ranking tables retrieved");

        let mut out = Vec::with_capacity(total);
        for (index, division) in divisions.into_iter().enumerate() {
            let partition = QuotaPartition::for_division(index, total);
            let fighters = self.scrape_division(&division, partition).await;
            info!(
                division = %division.name,
                kept = fighters.len(),
                ranked = division.entries.len(),
                "division scraped"
            );
            out.push(Division {
                weight_class: division.name,
                fighters,
            });
        }

        Ok(out)
    }

    /// Scrape every ranked fighter in one division. Tasks are spawned
    /// up front and gated by the division's semaphore, so at most
    /// `division_concurrency` fighters are in flight at once. The
    /// permit is a guard held for the task's whole body, so it is
    /// released on every exit path.
    ///
    /// Completion order is nondeterministic; rank order is restored by
    /// a stable sort at the end, so rank ties keep completion order.
    async fn scrape_division(
        &self,
        division: &RankedDivision,
        partition: QuotaPartition,
    ) -> Vec<Fighter> {
        let semaphore = Arc::new(Semaphore::new(self.options.division_concurrency));
        let mut tasks = JoinSet::new();

        for entry in division.entries.iter().cloned() {
            let semaphore = semaphore.clone();
            let resolver = self.resolver.clone();
            let profiles = self.profiles.clone();
            let videos = self.videos.clone();
            let options = self.options.clone();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("division semaphore is never closed");
                scrape_fighter(entry, partition, resolver, profiles, videos, &options).await
            });
        }

        let mut fighters = Vec::with_capacity(division.entries.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(fighter)) => fighters.push(fighter),
                Ok(None) => {}
                Err(err) => warn!(error = %err, "fighter task panicked"),
            }
        }

        fighters.sort_by_key(|f| f.ranking);
        fighters
    }
}

/// One fighter's unit of work: resolve, fetch with retries, enrich.
/// Every failure is logged with its stage and swallowed here; `None`
/// means the fighter is dropped from the division.
async fn scrape_fighter(
    entry: RankEntry,
    partition: QuotaPartition,
    resolver: Arc<dyn ProfileResolver>,
    profiles: Arc<dyn ProfileSource>,
    videos: Arc<dyn VideoSource>,
    options: &PipelineOptions,
) -> Option<Fighter> {
    let Some(key) = resolver.resolve(&entry.hint).await else {
        let err = FighterError::Unresolved {
            hint: entry.hint.clone(),
        };
        warn!(hint = %entry.hint, stage = "resolve", "dropping fighter: {err}");
        return None;
    };

    let mut fighter = match fetch_with_retries(profiles.as_ref(), &key, options).await {
        Ok(fighter) => fighter,
        Err(err) => {
            warn!(key = %key, stage = "fetch", error = %format!("{err:#}"), "dropping fighter");
            return None;
        }
    };
    fighter.ranking = entry.rank.0;

    // Videos are best effort: failures and nameless fighters both end
    // up with an empty list.
    if let Some(name) = fighter.name.clone() {
        match videos.fighter_videos(&name, partition).await {
            Ok(links) => fighter.youtube_videos = links,
            Err(err) => {
                warn!(key = %key, stage = "videos", error = %format!("{err:#}"), "keeping fighter without videos");
            }
        }
    } else {
        debug!(key = %key, "no display name; skipping video lookup");
    }

    Some(fighter)
}

/// Bounded retry loop around a profile fetch. Each attempt runs under
/// its own timeout; a timed-out attempt is abandoned and counted
/// against the ceiling, and the loop pauses between attempts.
pub(crate) async fn fetch_with_retries(
    profiles: &dyn ProfileSource,
    key: &str,
    options: &PipelineOptions,
) -> Result<Fighter, FighterError> {
    let attempts = options.fetch_retries.max(1);
    let mut last: Option<anyhow::Error> = None;

    for attempt in 1..=attempts {
        match tokio::time::timeout(options.fetch_timeout, profiles.fetch_profile(key)).await {
            Ok(Ok(fighter)) => return Ok(fighter),
            Ok(Err(err)) => {
                debug!(key, attempt, error = %format!("{err:#}"), "profile fetch attempt failed");
                last = Some(err);
            }
            Err(_) => {
                debug!(key, attempt, timeout = ?options.fetch_timeout, "profile fetch attempt timed out");
                last = Some(anyhow::anyhow!(
                    "attempt timed out after {:?}",
                    options.fetch_timeout
                ));
            }
        }

        if attempt < attempts {
            tokio::time::sleep(options.retry_delay).await;
        }
    }

    Err(FighterError::FetchExhausted {
        attempts,
        last: last.unwrap_or_else(|| anyhow::anyhow!("no attempts made")),
    })
}
