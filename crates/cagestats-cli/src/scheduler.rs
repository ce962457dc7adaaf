//! Daily scrape scheduling.
//!
//! No cron dependency: the next run boundary is computed with chrono and
//! slept through with tokio. A failed run is logged and the loop keeps
//! going; the previously published file stays authoritative until the
//! next successful run.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use tracing::{error, info};

/// Run `job` once a day at `hour` UTC, forever.
pub async fn run_daily<F, Fut>(hour: u32, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    loop {
        let wait = until_next_run(Utc::now(), hour);
        info!(
            minutes = wait.as_secs() / 60,
            "next scheduled scrape"
        );
        tokio::time::sleep(wait).await;

        match job().await {
            Ok(()) => info!("scheduled scrape completed"),
            Err(err) => {
                error!(
                    error = %format!("{err:#}"),
                    "scheduled scrape failed; previously published rankings remain in place"
                );
            }
        }
    }
}

/// Time until the next `hour`:00 UTC boundary, strictly in the future.
fn until_next_run(now: DateTime<Utc>, hour: u32) -> Duration {
    let target_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date_naive().and_time(target_time).and_utc();
    if next <= now {
        next = next + chrono::Duration::days(1);
    }
    (next - now).to_std().unwrap_or(Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn boundary_later_today_is_used() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 3, 30, 0).unwrap();
        let wait = until_next_run(now, 4);
        assert_eq!(wait, Duration::from_secs(30 * 60));
    }

    #[test]
    fn boundary_already_passed_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 5, 0, 0).unwrap();
        let wait = until_next_run(now, 4);
        assert_eq!(wait, Duration::from_secs(23 * 60 * 60));
    }

    #[test]
    fn exactly_on_the_boundary_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 4, 0, 0).unwrap();
        let wait = until_next_run(now, 4);
        assert_eq!(wait, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn out_of_range_hour_falls_back_to_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let wait = until_next_run(now, 99);
        assert_eq!(wait, Duration::from_secs(12 * 60 * 60));
    }
}
