//! End-to-end pipeline test: mock sources in, published JSON shape out.

use std::sync::Arc;

use async_trait::async_trait;

use cagestats::models::{Fight, Fighter, QuotaPartition, Rank, RankEntry, RankedDivision};
use cagestats_scrape::pipeline::{Pipeline, PipelineOptions};
use cagestats_scrape::sources::{ProfileResolver, ProfileSource, RankingSource, VideoSource};

struct TwoDivisions;

#[async_trait]
impl RankingSource for TwoDivisions {
    async fn ranked_divisions(&self) -> anyhow::Result<Vec<RankedDivision>> {
        Ok(vec![
            RankedDivision {
                name: "Heavyweight".into(),
                entries: vec![
                    RankEntry {
                        rank: Rank(5),
                        hint: "/wiki/Contender".into(),
                    },
                    RankEntry {
                        rank: Rank::CHAMPION,
                        hint: "/wiki/Champ".into(),
                    },
                ],
            },
            RankedDivision {
                name: "Flyweight".into(),
                entries: vec![RankEntry {
                    rank: Rank::INTERIM_CHAMPION,
                    hint: "/wiki/Interim".into(),
                }],
            },
        ])
    }
}

struct StripWiki;

#[async_trait]
impl ProfileResolver for StripWiki {
    async fn resolve(&self, hint: &str) -> Option<String> {
        Some(hint.trim_start_matches("/wiki/").to_string())
    }
}

struct CannedProfiles;

#[async_trait]
impl ProfileSource for CannedProfiles {
    async fn fetch_profile(&self, key: &str) -> anyhow::Result<Fighter> {
        Ok(Fighter {
            name: Some(key.to_string()),
            country: Some("United States".into()),
            age: Some(30),
            wins: 20,
            win_ko: 10,
            losses: 2,
            fight_history: vec![Fight {
                result: "win".into(),
                opponent: "Somebody".into(),
                event_name: "Event 1".into(),
                date: "01-01-2024".into(),
                method: "Decision (Unanimous)".into(),
                round: Some(3),
                time: "5:00".into(),
            }],
            ..Fighter::default()
        })
    }
}

struct OneVideo;

#[async_trait]
impl VideoSource for OneVideo {
    async fn fighter_videos(
        &self,
        name: &str,
        _partition: QuotaPartition,
    ) -> anyhow::Result<Vec<String>> {
        Ok(vec![format!("https://www.youtube.com/watch?v={name}")])
    }
}

#[tokio::test]
async fn published_json_has_the_stable_shape() {
    let pipeline = Pipeline::new(
        Arc::new(TwoDivisions),
        Arc::new(StripWiki),
        Arc::new(CannedProfiles),
        Arc::new(OneVideo),
        PipelineOptions::default(),
    );

    let divisions = pipeline.run().await.unwrap();
    let value = serde_json::to_value(&divisions).unwrap();

    let root = value.as_array().unwrap();
    assert_eq!(root.len(), 2);
    assert_eq!(root[0]["weightClass"], "Heavyweight");
    assert_eq!(root[1]["weightClass"], "Flyweight");

    // Champion first despite appearing second in the ranking entries.
    let heavyweights = root[0]["fighters"].as_array().unwrap();
    assert_eq!(heavyweights[0]["ranking"], 0);
    assert_eq!(heavyweights[0]["name"], "Champ");
    assert_eq!(heavyweights[1]["ranking"], 5);

    let champ = &heavyweights[0];
    assert_eq!(champ["wins"], 20);
    assert_eq!(champ["winKo"], 10);
    assert_eq!(champ["noContest"], 0);
    assert_eq!(
        champ["youtubeVideos"][0],
        "https://www.youtube.com/watch?v=Champ"
    );

    let fight = &champ["fightHistory"][0];
    assert_eq!(fight["eventName"], "Event 1");
    assert_eq!(fight["round"], 3);
    assert_eq!(fight["date"], "01-01-2024");
}

#[tokio::test]
async fn rerunning_against_unchanged_sources_is_idempotent() {
    let pipeline = Pipeline::new(
        Arc::new(TwoDivisions),
        Arc::new(StripWiki),
        Arc::new(CannedProfiles),
        Arc::new(OneVideo),
        PipelineOptions::default(),
    );

    let mut first = pipeline.run().await.unwrap();
    let mut second = pipeline.run().await.unwrap();

    // Video lists are time-sensitive upstream and excluded from the
    // equality contract.
    for division in first.iter_mut().chain(second.iter_mut()) {
        for fighter in &mut division.fighters {
            fighter.youtube_videos.clear();
        }
    }
    assert_eq!(first, second);
}
